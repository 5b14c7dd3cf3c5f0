//! SQL DDL for all cadence tables.
//!
//! Defines the `habits`, `habit_logs`, `habit_reminders`,
//! `streak_reset_queue`, and `schema_meta` tables. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for cadence's core tables.
const SCHEMA_SQL: &str = r#"
-- Root aggregate: one row per recurring habit
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    goal TEXT,
    frequency TEXT NOT NULL CHECK(frequency IN ('daily','weekly','monthly')),
    weekly_days TEXT,
    monthly_days TEXT,
    current_streak INTEGER NOT NULL DEFAULT 0 CHECK(current_streak >= 0),
    best_streak INTEGER NOT NULL DEFAULT 0 CHECK(best_streak >= 0),
    last_completed_date TEXT,
    last_checked_date TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
CREATE INDEX IF NOT EXISTS idx_habits_active ON habits(is_active);

-- Immutable completion records, one per habit per calendar day
CREATE TABLE IF NOT EXISTS habit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL,
    comment TEXT,
    logged_date TEXT NOT NULL,
    logged_at TEXT NOT NULL,
    UNIQUE(habit_id, logged_date)
);

CREATE INDEX IF NOT EXISTS idx_logs_habit ON habit_logs(habit_id);
CREATE INDEX IF NOT EXISTS idx_logs_date ON habit_logs(logged_date);

-- One reminder per habit per scheduled date
CREATE TABLE IF NOT EXISTS habit_reminders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL,
    reminder_date TEXT NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0,
    sent_at TEXT NOT NULL,
    UNIQUE(habit_id, reminder_date)
);

CREATE INDEX IF NOT EXISTS idx_reminders_user_date ON habit_reminders(user_id, reminder_date);

-- Staged "this occurrence was missed" facts, processed exactly once
CREATE TABLE IF NOT EXISTS streak_reset_queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL,
    reset_date TEXT NOT NULL,
    processed INTEGER NOT NULL DEFAULT 0,
    processed_at TEXT,
    previous_streak INTEGER,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_queue_habit_date ON streak_reset_queue(habit_id, reset_date);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"habits".to_string()));
        assert!(tables.contains(&"habit_logs".to_string()));
        assert!(tables.contains(&"habit_reminders".to_string()));
        assert!(tables.contains(&"streak_reset_queue".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn duplicate_log_for_same_day_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO habits (user_id, name, frequency, created_at, updated_at) \
             VALUES (1, 'read', 'daily', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO habit_logs (habit_id, user_id, logged_date, logged_at) \
             VALUES (1, 1, '2026-01-02', '2026-01-02T08:00:00Z')",
            [],
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO habit_logs (habit_id, user_id, logged_date, logged_at) \
             VALUES (1, 1, '2026-01-02', '2026-01-02T09:00:00Z')",
            [],
        );
        assert!(dup.is_err());
    }
}
