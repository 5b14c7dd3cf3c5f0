//! Completion-rate reporting over a date range.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::habit::error::Result;
use crate::habit::schedule;
use crate::habit::store;

/// Percentage of scheduled occurrences in `[from, to]` that were logged.
/// Returns 0 when nothing was scheduled in the range.
pub fn completion_rate(
    conn: &Connection,
    habit_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<f64> {
    let habit = store::get_habit(conn, habit_id)?;

    let scheduled = schedule::due_between(&habit, from, to);
    if scheduled.is_empty() {
        return Ok(0.0);
    }

    let completed = store::count_logs_in_range(conn, habit_id, from, to)?;
    Ok(completed as f64 / scheduled.len() as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::habit::complete::record_completion;
    use crate::habit::types::Frequency;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rate_over_daily_range() {
        let mut conn = db::open_memory_database().unwrap();
        let habit = store::create_habit(&conn, 1, "read", Frequency::Daily, None, None).unwrap();

        record_completion(&mut conn, habit.id, 1, d("2026-08-20"), None).unwrap();
        record_completion(&mut conn, habit.id, 1, d("2026-08-21"), None).unwrap();

        // 4 scheduled days, 2 logged
        let rate = completion_rate(&conn, habit.id, d("2026-08-20"), d("2026-08-23")).unwrap();
        assert!((rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_is_zero_when_nothing_scheduled() {
        let conn = db::open_memory_database().unwrap();
        let habit = store::create_habit(&conn, 1, "gym", Frequency::Weekly, None, None).unwrap();
        // no day-set: never due
        let rate = completion_rate(&conn, habit.id, d("2026-08-01"), d("2026-08-31")).unwrap();
        assert_eq!(rate, 0.0);
    }
}
