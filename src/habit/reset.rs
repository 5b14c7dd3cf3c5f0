//! Missed-occurrence detection and deferred streak resets.
//!
//! [`check_habit`] walks the due days a habit has not been judged yet and
//! stages a reset entry for every one that lacks a completion log, then
//! advances the habit's watermark. [`drain`] later consumes the staged
//! entries: snapshot the streak for audit, zero it, and flip the matching
//! reminder back to incomplete. Both passes are idempotent — the watermark
//! guards re-checks within a day, the `processed` flag guards re-drains.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;

use crate::habit::error::Result;
use crate::habit::schedule;
use crate::habit::store;
use crate::habit::types::StreakResetEntry;

/// Scan one habit for missed occurrences since its watermark and stage
/// reset entries for them. Returns the number of entries staged.
///
/// Intended to run once per habit per day. Skips inactive habits, habits
/// never completed, and habits already checked today. Today's own
/// occurrence is never judged missed — if it is still outstanding it gets
/// picked up by tomorrow's run. The watermark advances to `today` even
/// when nothing was staged.
pub fn check_habit(
    conn: &Connection,
    habit_id: i64,
    today: NaiveDate,
    max_scan_days: i64,
) -> Result<usize> {
    let habit = store::get_habit(conn, habit_id)?;

    if !habit.is_active {
        return Ok(0);
    }
    // Nothing to break before the first completion
    let last_completed = match habit.last_completed_date {
        Some(d) => d,
        None => return Ok(0),
    };
    // Already checked today
    if habit.last_checked_date == Some(today) {
        return Ok(0);
    }

    let watermark = match habit.last_checked_date {
        Some(checked) => checked.max(last_completed),
        None => last_completed,
    };
    let mut window_start = watermark.succ_opt().expect("date out of range");

    // Bound the day-by-day walk for long-dormant habits
    let floor = today - Duration::days(max_scan_days);
    if window_start < floor {
        tracing::warn!(habit_id, %window_start, %floor, "clamping reset scan window");
        window_start = floor;
    }

    let mut staged = 0;
    for due_day in schedule::due_between(&habit, window_start, today) {
        if due_day == today {
            continue;
        }
        match missed(conn, habit_id, due_day) {
            Ok(false) => {}
            Ok(true) => match store::insert_reset_entry(conn, habit_id, habit.user_id, due_day) {
                Ok(_) => staged += 1,
                Err(e) => {
                    tracing::warn!(habit_id, date = %due_day, error = %e, "failed to stage reset entry");
                }
            },
            Err(e) => {
                tracing::warn!(habit_id, date = %due_day, error = %e, "failed to judge occurrence");
            }
        }
    }

    // Must advance even when zero entries were staged: this is the
    // idempotence guard for the next run.
    store::update_last_checked(conn, habit_id, today)?;
    tracing::debug!(habit_id, %today, staged, "habit checked");
    Ok(staged)
}

/// A due day is missed when it has no log and no entry already staged.
fn missed(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<bool> {
    if store::get_log_by_date(conn, habit_id, date)?.is_some() {
        return Ok(false);
    }
    if store::reset_entry_by_date(conn, habit_id, date)?.is_some() {
        return Ok(false);
    }
    Ok(true)
}

/// Run [`check_habit`] over every active habit. A failure on one habit is
/// logged and does not stop the sweep. Returns total entries staged.
pub fn check_all(conn: &Connection, today: NaiveDate, max_scan_days: i64) -> Result<usize> {
    let habits = store::all_active_habits(conn)?;
    let mut staged = 0;
    for habit in &habits {
        match check_habit(conn, habit.id, today, max_scan_days) {
            Ok(n) => staged += n,
            Err(e) => tracing::warn!(habit_id = habit.id, error = %e, "streak check failed"),
        }
    }
    tracing::info!(habits = habits.len(), staged, "streak check sweep complete");
    Ok(staged)
}

/// Drain the reset queue: process every currently unprocessed entry.
///
/// Entries are independent; one failing entry is logged and left
/// unprocessed for the next run. Returns the number processed.
pub fn drain(conn: &mut Connection, now: DateTime<Utc>) -> Result<usize> {
    let entries = store::unprocessed_entries(conn)?;
    let mut processed = 0;
    for entry in entries {
        match process_entry(conn, &entry, now) {
            Ok(true) => processed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(entry_id = entry.id, error = %e, "failed to process reset entry");
            }
        }
    }
    tracing::info!(processed, "reset queue drained");
    Ok(processed)
}

/// Process one entry atomically: audit snapshot, streak zeroed, entry
/// marked processed, reminder flipped incomplete (best-effort).
fn process_entry(conn: &mut Connection, entry: &StreakResetEntry, now: DateTime<Utc>) -> Result<bool> {
    let tx = conn.transaction()?;

    // Re-check under the transaction so an entry selected by two
    // overlapping drains can only zero the streak once.
    let current = match store::get_reset_entry(&tx, entry.id)? {
        Some(e) if !e.processed => e,
        _ => return Ok(false),
    };

    let habit = store::get_habit(&tx, current.habit_id)?;

    store::mark_entry_processed(&tx, current.id, habit.current_streak, now)?;
    store::update_streak_state(
        &tx,
        habit.id,
        0,
        habit.best_streak.max(habit.current_streak),
        habit.last_completed_date,
    )?;

    // Best-effort: the missed occurrence's reminder goes back to incomplete
    match store::get_reminder_by_date(&tx, habit.id, current.reset_date) {
        Ok(Some(reminder)) => {
            if let Err(e) = store::set_reminder_completed(&tx, reminder.id, false) {
                tracing::warn!(entry_id = current.id, error = %e, "failed to flip reminder");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(entry_id = current.id, error = %e, "failed to look up reminder"),
    }

    tx.commit()?;
    tracing::debug!(
        entry_id = current.id,
        habit_id = habit.id,
        previous_streak = habit.current_streak,
        "streak reset"
    );
    Ok(true)
}
