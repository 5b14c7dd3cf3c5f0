//! Reminder generation and reconciliation.
//!
//! Reminders are created proactively for scheduled occurrences and carry a
//! completion flag that the completion and reset paths flip. Only the
//! decision to create/mark them lives here; delivery is someone else's
//! problem.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::habit::error::Result;
use crate::habit::schedule;
use crate::habit::store;
use crate::habit::types::HabitReminder;

/// Ensure every active habit of `user_id` that is due on `date` has a
/// reminder. Returns existing plus newly created reminders.
///
/// A create failure for one habit is logged and skipped; the rest of the
/// habits still get theirs.
pub fn generate_for_date(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> Result<Vec<HabitReminder>> {
    let mut reminders = store::reminders_for_user_date(conn, user_id, date)?;
    let covered: Vec<i64> = reminders.iter().map(|r| r.habit_id).collect();

    for habit in store::list_habits(conn, user_id, true)? {
        if covered.contains(&habit.id) {
            continue;
        }
        if !schedule::is_due(&habit, date) {
            continue;
        }
        match store::insert_reminder(conn, habit.id, user_id, date) {
            Ok(reminder) => reminders.push(reminder),
            Err(e) => {
                tracing::warn!(habit_id = habit.id, %date, error = %e, "failed to create reminder");
            }
        }
    }

    Ok(reminders)
}

/// Flip a reminder to completed.
pub fn mark_completed(conn: &Connection, reminder_id: i64) -> Result<HabitReminder> {
    store::set_reminder_completed(conn, reminder_id, true)
}

/// Flip a reminder back to incomplete.
pub fn mark_incomplete(conn: &Connection, reminder_id: i64) -> Result<HabitReminder> {
    store::set_reminder_completed(conn, reminder_id, false)
}
