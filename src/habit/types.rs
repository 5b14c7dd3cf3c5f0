//! Core habit type definitions.
//!
//! Defines [`Frequency`] (the three recurrence rules), [`Habit`] (the root
//! aggregate with its streak state), and the child records [`HabitLog`],
//! [`HabitReminder`], and [`StreakResetEntry`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Recurrence rule for a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Due every calendar day.
    Daily,
    /// Due on the ISO weekdays (Mon=1..Sun=7) in the habit's weekly day-set.
    Weekly,
    /// Due on the days-of-month in the habit's monthly day-set.
    Monthly,
}

impl Frequency {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("unknown frequency: {s}")),
        }
    }
}

/// A recurring habit, matching the `habits` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    /// Owning user. Ownership is checked on completion recording.
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    /// Active recurrence rule; only the matching day-set is meaningful.
    pub frequency: Frequency,
    /// Comma-separated ISO weekday numbers, e.g. `"1,3,5"`.
    pub weekly_days: Option<String>,
    /// Comma-separated days of month, e.g. `"1,15,28"`.
    pub monthly_days: Option<String>,
    /// Length of the current unbroken run of completed occurrences.
    pub current_streak: i64,
    /// Highest streak ever reached; raised when the current streak is
    /// about to be reset or exceeds it.
    pub best_streak: i64,
    /// Date of the most recent completion, if any. Changes only together
    /// with `current_streak`.
    pub last_completed_date: Option<NaiveDate>,
    /// Watermark: last date the missed-occurrence check ran for this habit.
    pub last_checked_date: Option<NaiveDate>,
    /// Soft-delete gate; inactive habits are skipped by scheduling and checks.
    pub is_active: bool,
    /// Terminal "habit mastered" marker, set explicitly.
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// The day-set belonging to the active frequency, if any.
    pub fn active_day_set(&self) -> Option<&str> {
        match self.frequency {
            Frequency::Daily => None,
            Frequency::Weekly => self.weekly_days.as_deref(),
            Frequency::Monthly => self.monthly_days.as_deref(),
        }
    }
}

/// An immutable record that a habit's occurrence on `logged_date` was
/// completed. Unique per `(habit_id, logged_date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: i64,
    pub habit_id: i64,
    pub user_id: i64,
    pub comment: Option<String>,
    /// The logical occurrence date the completion applies to.
    pub logged_date: NaiveDate,
    /// Wall-clock time the completion was recorded (distinct from the
    /// occurrence date).
    pub logged_at: DateTime<Utc>,
}

/// A per-(habit, date) notification record. Flipped to completed when a
/// matching log appears, back to incomplete when the occurrence is later
/// judged missed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitReminder {
    pub id: i64,
    pub habit_id: i64,
    pub user_id: i64,
    pub reminder_date: NaiveDate,
    pub is_completed: bool,
    pub sent_at: DateTime<Utc>,
}

/// A staged "occurrence `reset_date` was missed" fact. Created
/// unprocessed, processed exactly once, never reopened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakResetEntry {
    pub id: i64,
    pub habit_id: i64,
    pub user_id: i64,
    pub reset_date: NaiveDate,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    /// Streak value snapshotted at processing time, for audit.
    pub previous_streak: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Parse a comma-separated day-set. Malformed tokens are skipped silently
/// so a single bad token never blocks evaluation.
pub fn parse_day_set(days: &str) -> Vec<u32> {
    days.split(',')
        .filter_map(|tok| tok.trim().parse::<u32>().ok())
        .collect()
}

/// Format a day-set as the stored comma-separated form, e.g. `"1,3,5"`.
pub fn format_day_set(days: &[u32]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
