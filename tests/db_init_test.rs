use cadence::db;

#[test]
fn open_database_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("habits.db");

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists());

    // WAL mode is on
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    // Foreign keys are on
    let fk: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn reopen_preserves_data_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("habits.db");

    {
        let conn = db::open_database(&db_path).unwrap();
        conn.execute(
            "INSERT INTO habits (user_id, name, frequency, created_at, updated_at) \
             VALUES (1, 'persisted', 'daily', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
    }

    let conn = db::open_database(&db_path).unwrap();
    let name: String = conn
        .query_row("SELECT name FROM habits WHERE user_id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "persisted");
    assert_eq!(
        db::migrations::get_schema_version(&conn).unwrap(),
        db::migrations::CURRENT_SCHEMA_VERSION
    );
}
