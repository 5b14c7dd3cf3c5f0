//! Completion recording — the write path that logs an occurrence and moves
//! the streak.
//!
//! [`record_completion`] is the single entry point. The log insert and the
//! streak update run in one transaction; reminder reconciliation and reset
//! queue cleanup are best-effort side effects that never fail the
//! operation.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::habit::error::{HabitError, Result};
use crate::habit::schedule;
use crate::habit::store;
use crate::habit::types::{Habit, HabitLog};

/// Record that `habit_id`'s occurrence on `date` was completed.
///
/// Idempotent per calendar day: if a log already exists for
/// `(habit_id, date)` it is returned unchanged and the streak does not
/// move. The acting user must own the habit.
pub fn record_completion(
    conn: &mut Connection,
    habit_id: i64,
    user_id: i64,
    date: NaiveDate,
    comment: Option<&str>,
) -> Result<HabitLog> {
    let tx = conn.transaction()?;

    let habit = store::get_habit(&tx, habit_id)?;
    if habit.user_id != user_id {
        return Err(HabitError::Unauthorized { habit_id, user_id });
    }

    // Already logged today — completion is idempotent per day, not per call
    if let Some(existing) = store::get_log_by_date(&tx, habit_id, date)? {
        tx.commit()?;
        return Ok(existing);
    }

    let log = store::insert_log(&tx, habit_id, user_id, date, comment)?;

    let (current, best) = next_streak(&habit, date);
    store::update_streak_state(&tx, habit_id, current, best, Some(date))?;

    // Secondary effects: reported but never escalated
    match store::get_reminder_by_date(&tx, habit_id, date) {
        Ok(Some(reminder)) => {
            if let Err(e) = store::set_reminder_completed(&tx, reminder.id, true) {
                tracing::warn!(habit_id, %date, error = %e, "failed to complete reminder");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(habit_id, %date, error = %e, "failed to look up reminder"),
    }
    if let Err(e) = store::delete_pending_entry(&tx, habit_id, date) {
        tracing::warn!(habit_id, %date, error = %e, "failed to clear pending reset entry");
    }

    tx.commit()?;
    tracing::debug!(habit_id, %date, streak = current, "completion recorded");
    Ok(log)
}

/// Compute the streak state that completing `date` leads to.
///
/// The streak is judged broken only when more than one due occurrence
/// falls in `(last_completed, date]`. When `date` itself is due that
/// means any missed prior occurrence breaks it; when `date` is not due,
/// a single missed occurrence slips through and the streak continues
/// until the overnight detector resets it. That asymmetry is inherited
/// behavior, kept on purpose.
fn next_streak(habit: &Habit, date: NaiveDate) -> (i64, i64) {
    let last = match habit.last_completed_date {
        Some(last) => last,
        None => return (1, habit.best_streak.max(1)),
    };

    let window_start = last.succ_opt().expect("date out of range");
    let due = schedule::due_between(habit, window_start, date);

    if due.len() > 1 {
        // Broken: bank the old run, start over at 1
        (1, habit.best_streak.max(habit.current_streak))
    } else {
        let current = habit.current_streak + 1;
        (current, habit.best_streak.max(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::habit::types::Frequency;

    fn daily_habit(current: i64, best: i64, last: Option<&str>) -> Habit {
        let now = Utc::now();
        Habit {
            id: 1,
            user_id: 1,
            name: "test".into(),
            description: None,
            goal: None,
            frequency: Frequency::Daily,
            weekly_days: None,
            monthly_days: None,
            current_streak: current,
            best_streak: best,
            last_completed_date: last.map(|s| s.parse().unwrap()),
            last_checked_date: None,
            is_active: true,
            is_completed: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn first_completion_starts_streak_at_one() {
        let habit = daily_habit(0, 0, None);
        assert_eq!(next_streak(&habit, d("2026-08-26")), (1, 1));
    }

    #[test]
    fn consecutive_day_continues_streak() {
        let habit = daily_habit(5, 5, Some("2026-08-25"));
        assert_eq!(next_streak(&habit, d("2026-08-26")), (6, 6));
    }

    #[test]
    fn best_streak_only_raised_when_exceeded() {
        let habit = daily_habit(2, 9, Some("2026-08-25"));
        assert_eq!(next_streak(&habit, d("2026-08-26")), (3, 9));
    }

    #[test]
    fn two_missed_days_break_streak() {
        // last completed 3 days ago: the 24th and 25th were both missed
        let habit = daily_habit(5, 5, Some("2026-08-23"));
        assert_eq!(next_streak(&habit, d("2026-08-26")), (1, 5));
    }

    #[test]
    fn one_missed_daily_occurrence_breaks_on_a_due_day() {
        // Missed 2026-08-25, completing the 26th: the gap holds two due
        // occurrences (the missed day plus today), so the streak breaks.
        let habit = daily_habit(5, 5, Some("2026-08-24"));
        assert_eq!(next_streak(&habit, d("2026-08-26")), (1, 5));
    }

    #[test]
    fn single_missed_occurrence_is_forgiven() {
        // Deliberate asymmetry inherited from the original engine: the
        // break rule counts due days in (last, today] and fires only above
        // one. Completing on a NON-due day after exactly one missed due
        // occurrence leaves a single due day in the window, so the streak
        // continues instead of breaking. Preserved, not corrected.
        let habit = Habit {
            frequency: Frequency::Weekly,
            weekly_days: Some("1".into()), // Mondays only
            ..daily_habit(5, 5, Some("2026-08-10"))
        };
        // Missed Monday 2026-08-17; logging Tuesday the 18th still continues
        let due = schedule::due_between(&habit, d("2026-08-11"), d("2026-08-18"));
        assert_eq!(due, vec![d("2026-08-17")]);
        assert_eq!(next_streak(&habit, d("2026-08-18")), (6, 6));
    }

    #[test]
    fn weekly_gap_with_only_todays_occurrence_continues() {
        let habit = Habit {
            frequency: Frequency::Weekly,
            weekly_days: Some("1".into()), // Mondays only
            ..daily_habit(3, 3, Some("2026-08-17"))
        };
        // Next Monday, a week later: the only due day in the gap is today
        assert_eq!(next_streak(&habit, d("2026-08-24")), (4, 4));
    }
}
