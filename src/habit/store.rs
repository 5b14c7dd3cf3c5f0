//! Persistence layer — rusqlite CRUD for habits, logs, reminders, and the
//! streak reset queue.
//!
//! Dates are stored as `YYYY-MM-DD` text, timestamps as RFC 3339 text.
//! Streak fields (`current_streak`, `best_streak`, `last_completed_date`)
//! are only ever written together, through [`update_streak_state`].

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::habit::error::{HabitError, Result};
use crate::habit::types::{
    format_day_set, Frequency, Habit, HabitLog, HabitReminder, StreakResetEntry,
};

const HABIT_COLS: &str = "id, user_id, name, description, goal, frequency, weekly_days, \
     monthly_days, current_streak, best_streak, last_completed_date, last_checked_date, \
     is_active, is_completed, created_at, updated_at, completed_at";

const LOG_COLS: &str = "id, habit_id, user_id, comment, logged_date, logged_at";

const REMINDER_COLS: &str = "id, habit_id, user_id, reminder_date, is_completed, sent_at";

const ENTRY_COLS: &str =
    "id, habit_id, user_id, reset_date, processed, processed_at, previous_streak, created_at";

fn parse_date(idx: usize, s: String) -> rusqlite::Result<NaiveDate> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let frequency: String = row.get(5)?;
    let frequency = frequency
        .parse::<Frequency>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;
    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        goal: row.get(4)?,
        frequency,
        weekly_days: row.get(6)?,
        monthly_days: row.get(7)?,
        current_streak: row.get(8)?,
        best_streak: row.get(9)?,
        last_completed_date: row
            .get::<_, Option<String>>(10)?
            .map(|s| parse_date(10, s))
            .transpose()?,
        last_checked_date: row
            .get::<_, Option<String>>(11)?
            .map(|s| parse_date(11, s))
            .transpose()?,
        is_active: row.get(12)?,
        is_completed: row.get(13)?,
        created_at: parse_timestamp(14, row.get(14)?)?,
        updated_at: parse_timestamp(15, row.get(15)?)?,
        completed_at: row
            .get::<_, Option<String>>(16)?
            .map(|s| parse_timestamp(16, s))
            .transpose()?,
    })
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<HabitLog> {
    Ok(HabitLog {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        user_id: row.get(2)?,
        comment: row.get(3)?,
        logged_date: parse_date(4, row.get(4)?)?,
        logged_at: parse_timestamp(5, row.get(5)?)?,
    })
}

fn reminder_from_row(row: &Row<'_>) -> rusqlite::Result<HabitReminder> {
    Ok(HabitReminder {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        user_id: row.get(2)?,
        reminder_date: parse_date(3, row.get(3)?)?,
        is_completed: row.get(4)?,
        sent_at: parse_timestamp(5, row.get(5)?)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<StreakResetEntry> {
    Ok(StreakResetEntry {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        user_id: row.get(2)?,
        reset_date: parse_date(3, row.get(3)?)?,
        processed: row.get(4)?,
        processed_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_timestamp(5, s))
            .transpose()?,
        previous_streak: row.get(6)?,
        created_at: parse_timestamp(7, row.get(7)?)?,
    })
}

// ---------------------------------------------------------------------------
// Habits

/// Create a new habit: active, zero streaks, no day-sets yet.
pub fn create_habit(
    conn: &Connection,
    user_id: i64,
    name: &str,
    frequency: Frequency,
    description: Option<&str>,
    goal: Option<&str>,
) -> Result<Habit> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO habits (user_id, name, description, goal, frequency, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![user_id, name, description, goal, frequency.as_str(), now],
    )?;
    get_habit(conn, conn.last_insert_rowid())
}

/// Fetch a habit by id.
pub fn get_habit(conn: &Connection, habit_id: i64) -> Result<Habit> {
    conn.query_row(
        &format!("SELECT {HABIT_COLS} FROM habits WHERE id = ?1"),
        params![habit_id],
        habit_from_row,
    )
    .optional()?
    .ok_or(HabitError::NotFound(habit_id))
}

/// All habits owned by a user, optionally restricted to active ones.
pub fn list_habits(conn: &Connection, user_id: i64, active_only: bool) -> Result<Vec<Habit>> {
    let sql = if active_only {
        format!("SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 AND is_active = 1 ORDER BY id")
    } else {
        format!("SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 ORDER BY id")
    };
    let mut stmt = conn.prepare(&sql)?;
    let habits = stmt
        .query_map(params![user_id], habit_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(habits)
}

/// All active habits across users — the detector's work list.
pub fn all_active_habits(conn: &Connection) -> Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLS} FROM habits WHERE is_active = 1 ORDER BY id"
    ))?;
    let habits = stmt
        .query_map([], habit_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(habits)
}

/// Soft-delete gate: activate or deactivate a habit.
pub fn set_active(conn: &Connection, habit_id: i64, active: bool) -> Result<Habit> {
    let rows = conn.execute(
        "UPDATE habits SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
        params![active, Utc::now().to_rfc3339(), habit_id],
    )?;
    if rows == 0 {
        return Err(HabitError::NotFound(habit_id));
    }
    get_habit(conn, habit_id)
}

/// Mark a habit as mastered. Terminal and explicit, never auto-derived.
pub fn mark_mastered(conn: &Connection, habit_id: i64) -> Result<Habit> {
    let now = Utc::now().to_rfc3339();
    let rows = conn.execute(
        "UPDATE habits SET is_completed = 1, completed_at = ?1, updated_at = ?1 WHERE id = ?2",
        params![now, habit_id],
    )?;
    if rows == 0 {
        return Err(HabitError::NotFound(habit_id));
    }
    get_habit(conn, habit_id)
}

/// Set the weekly day-set. Fails unless the habit is weekly.
pub fn set_weekly_days(conn: &Connection, habit_id: i64, days: &[u32]) -> Result<Habit> {
    let habit = get_habit(conn, habit_id)?;
    if habit.frequency != Frequency::Weekly {
        return Err(HabitError::InvalidRecurrence {
            habit_id,
            expected: Frequency::Weekly,
        });
    }
    conn.execute(
        "UPDATE habits SET weekly_days = ?1, updated_at = ?2 WHERE id = ?3",
        params![format_day_set(days), Utc::now().to_rfc3339(), habit_id],
    )?;
    get_habit(conn, habit_id)
}

/// Set the monthly day-set. Fails unless the habit is monthly.
pub fn set_monthly_days(conn: &Connection, habit_id: i64, days: &[u32]) -> Result<Habit> {
    let habit = get_habit(conn, habit_id)?;
    if habit.frequency != Frequency::Monthly {
        return Err(HabitError::InvalidRecurrence {
            habit_id,
            expected: Frequency::Monthly,
        });
    }
    conn.execute(
        "UPDATE habits SET monthly_days = ?1, updated_at = ?2 WHERE id = ?3",
        params![format_day_set(days), Utc::now().to_rfc3339(), habit_id],
    )?;
    get_habit(conn, habit_id)
}

/// Write a habit's streak fields in one statement.
///
/// `current_streak` and `last_completed_date` must move together; this is
/// the only place either of them is written.
pub fn update_streak_state(
    conn: &Connection,
    habit_id: i64,
    current_streak: i64,
    best_streak: i64,
    last_completed_date: Option<NaiveDate>,
) -> Result<()> {
    conn.execute(
        "UPDATE habits SET current_streak = ?1, best_streak = ?2, last_completed_date = ?3, \
         updated_at = ?4 WHERE id = ?5",
        params![
            current_streak,
            best_streak,
            last_completed_date.map(|d| d.to_string()),
            Utc::now().to_rfc3339(),
            habit_id
        ],
    )?;
    Ok(())
}

/// Advance the detector watermark.
pub fn update_last_checked(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<()> {
    conn.execute(
        "UPDATE habits SET last_checked_date = ?1, updated_at = ?2 WHERE id = ?3",
        params![date.to_string(), Utc::now().to_rfc3339(), habit_id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Logs

pub fn insert_log(
    conn: &Connection,
    habit_id: i64,
    user_id: i64,
    logged_date: NaiveDate,
    comment: Option<&str>,
) -> Result<HabitLog> {
    conn.execute(
        "INSERT INTO habit_logs (habit_id, user_id, comment, logged_date, logged_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            habit_id,
            user_id,
            comment,
            logged_date.to_string(),
            Utc::now().to_rfc3339()
        ],
    )?;
    let id = conn.last_insert_rowid();
    Ok(conn.query_row(
        &format!("SELECT {LOG_COLS} FROM habit_logs WHERE id = ?1"),
        params![id],
        log_from_row,
    )?)
}

pub fn get_log_by_date(
    conn: &Connection,
    habit_id: i64,
    date: NaiveDate,
) -> Result<Option<HabitLog>> {
    Ok(conn
        .query_row(
            &format!("SELECT {LOG_COLS} FROM habit_logs WHERE habit_id = ?1 AND logged_date = ?2"),
            params![habit_id, date.to_string()],
            log_from_row,
        )
        .optional()?)
}

pub fn logs_for_habit(conn: &Connection, habit_id: i64) -> Result<Vec<HabitLog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLS} FROM habit_logs WHERE habit_id = ?1 ORDER BY logged_date DESC"
    ))?;
    let logs = stmt
        .query_map(params![habit_id], log_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(logs)
}

pub fn logs_in_range(
    conn: &Connection,
    habit_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<HabitLog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLS} FROM habit_logs \
         WHERE habit_id = ?1 AND logged_date >= ?2 AND logged_date <= ?3 \
         ORDER BY logged_date"
    ))?;
    let logs = stmt
        .query_map(
            params![habit_id, from.to_string(), to.to_string()],
            log_from_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(logs)
}

pub fn count_logs_in_range(
    conn: &Connection,
    habit_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM habit_logs \
         WHERE habit_id = ?1 AND logged_date >= ?2 AND logged_date <= ?3",
        params![habit_id, from.to_string(), to.to_string()],
        |row| row.get(0),
    )?)
}

// ---------------------------------------------------------------------------
// Reminders

pub fn insert_reminder(
    conn: &Connection,
    habit_id: i64,
    user_id: i64,
    reminder_date: NaiveDate,
) -> Result<HabitReminder> {
    conn.execute(
        "INSERT INTO habit_reminders (habit_id, user_id, reminder_date, sent_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            habit_id,
            user_id,
            reminder_date.to_string(),
            Utc::now().to_rfc3339()
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_reminder(conn, id)
}

pub fn get_reminder(conn: &Connection, reminder_id: i64) -> Result<HabitReminder> {
    conn.query_row(
        &format!("SELECT {REMINDER_COLS} FROM habit_reminders WHERE id = ?1"),
        params![reminder_id],
        reminder_from_row,
    )
    .optional()?
    .ok_or(HabitError::ReminderNotFound(reminder_id))
}

pub fn get_reminder_by_date(
    conn: &Connection,
    habit_id: i64,
    date: NaiveDate,
) -> Result<Option<HabitReminder>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {REMINDER_COLS} FROM habit_reminders \
                 WHERE habit_id = ?1 AND reminder_date = ?2"
            ),
            params![habit_id, date.to_string()],
            reminder_from_row,
        )
        .optional()?)
}

pub fn reminders_for_user_date(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> Result<Vec<HabitReminder>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REMINDER_COLS} FROM habit_reminders \
         WHERE user_id = ?1 AND reminder_date = ?2 ORDER BY habit_id"
    ))?;
    let reminders = stmt
        .query_map(params![user_id, date.to_string()], reminder_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(reminders)
}

pub fn set_reminder_completed(
    conn: &Connection,
    reminder_id: i64,
    completed: bool,
) -> Result<HabitReminder> {
    let rows = conn.execute(
        "UPDATE habit_reminders SET is_completed = ?1 WHERE id = ?2",
        params![completed, reminder_id],
    )?;
    if rows == 0 {
        return Err(HabitError::ReminderNotFound(reminder_id));
    }
    get_reminder(conn, reminder_id)
}

// ---------------------------------------------------------------------------
// Streak reset queue

pub fn insert_reset_entry(
    conn: &Connection,
    habit_id: i64,
    user_id: i64,
    reset_date: NaiveDate,
) -> Result<StreakResetEntry> {
    conn.execute(
        "INSERT INTO streak_reset_queue (habit_id, user_id, reset_date, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            habit_id,
            user_id,
            reset_date.to_string(),
            Utc::now().to_rfc3339()
        ],
    )?;
    let id = conn.last_insert_rowid();
    Ok(conn.query_row(
        &format!("SELECT {ENTRY_COLS} FROM streak_reset_queue WHERE id = ?1"),
        params![id],
        entry_from_row,
    )?)
}

pub fn get_reset_entry(conn: &Connection, entry_id: i64) -> Result<Option<StreakResetEntry>> {
    Ok(conn
        .query_row(
            &format!("SELECT {ENTRY_COLS} FROM streak_reset_queue WHERE id = ?1"),
            params![entry_id],
            entry_from_row,
        )
        .optional()?)
}

pub fn reset_entry_by_date(
    conn: &Connection,
    habit_id: i64,
    date: NaiveDate,
) -> Result<Option<StreakResetEntry>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {ENTRY_COLS} FROM streak_reset_queue \
                 WHERE habit_id = ?1 AND reset_date = ?2"
            ),
            params![habit_id, date.to_string()],
            entry_from_row,
        )
        .optional()?)
}

/// All unprocessed entries, oldest first.
pub fn unprocessed_entries(conn: &Connection) -> Result<Vec<StreakResetEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLS} FROM streak_reset_queue WHERE processed = 0 ORDER BY created_at, id"
    ))?;
    let entries = stmt
        .query_map([], entry_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Mark an entry processed, snapshotting the streak it is about to erase.
pub fn mark_entry_processed(
    conn: &Connection,
    entry_id: i64,
    previous_streak: i64,
    processed_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "UPDATE streak_reset_queue \
         SET processed = 1, processed_at = ?1, previous_streak = ?2 WHERE id = ?3",
        params![processed_at.to_rfc3339(), previous_streak, entry_id],
    )?;
    Ok(())
}

/// Remove a still-pending entry for an occurrence that turned out to be
/// fulfilled. Processed entries are audit records and are never touched.
pub fn delete_pending_entry(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM streak_reset_queue \
         WHERE habit_id = ?1 AND reset_date = ?2 AND processed = 0",
        params![habit_id, date.to_string()],
    )?)
}
