#![allow(dead_code)]

use cadence::db;
use cadence::habit::store;
use cadence::habit::types::{Frequency, Habit};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Parse a `YYYY-MM-DD` literal.
pub fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Create a daily habit owned by user 1.
pub fn daily_habit(conn: &Connection, name: &str) -> Habit {
    store::create_habit(conn, 1, name, Frequency::Daily, None, None).unwrap()
}

/// Create a weekly habit owned by user 1 with the given ISO weekdays.
pub fn weekly_habit(conn: &Connection, name: &str, days: &[u32]) -> Habit {
    let habit = store::create_habit(conn, 1, name, Frequency::Weekly, None, None).unwrap();
    store::set_weekly_days(conn, habit.id, days).unwrap()
}

/// Create a monthly habit owned by user 1 with the given days of month.
pub fn monthly_habit(conn: &Connection, name: &str, days: &[u32]) -> Habit {
    let habit = store::create_habit(conn, 1, name, Frequency::Monthly, None, None).unwrap();
    store::set_monthly_days(conn, habit.id, days).unwrap()
}
