mod helpers;

use cadence::habit::{remind, store, HabitError};
use helpers::{d, daily_habit, test_db, weekly_habit};

#[test]
fn at_most_one_reminder_per_habit_and_date() {
    let conn = test_db();
    let habit = daily_habit(&conn, "read");

    remind::generate_for_date(&conn, 1, d("2026-08-26")).unwrap();
    remind::generate_for_date(&conn, 1, d("2026-08-26")).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM habit_reminders WHERE habit_id = ?1",
            [habit.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);

    // A different date gets its own reminder
    remind::generate_for_date(&conn, 1, d("2026-08-27")).unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM habit_reminders WHERE habit_id = ?1",
            [habit.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn reminders_respect_the_schedule() {
    let conn = test_db();
    let gym = weekly_habit(&conn, "gym", &[3]); // Wednesdays

    // Wednesday 2026-08-26
    let wed = remind::generate_for_date(&conn, 1, d("2026-08-26")).unwrap();
    assert_eq!(wed.len(), 1);
    assert_eq!(wed[0].habit_id, gym.id);

    // Thursday: nothing due
    let thu = remind::generate_for_date(&conn, 1, d("2026-08-27")).unwrap();
    assert!(thu.is_empty());
}

#[test]
fn mark_completed_and_incomplete_flip_the_flag() {
    let conn = test_db();
    let habit = daily_habit(&conn, "read");
    let reminder = store::insert_reminder(&conn, habit.id, 1, d("2026-08-26")).unwrap();
    assert!(!reminder.is_completed);

    let reminder = remind::mark_completed(&conn, reminder.id).unwrap();
    assert!(reminder.is_completed);

    let reminder = remind::mark_incomplete(&conn, reminder.id).unwrap();
    assert!(!reminder.is_completed);
}

#[test]
fn marking_a_missing_reminder_is_not_found() {
    let conn = test_db();
    match remind::mark_completed(&conn, 404) {
        Err(HabitError::ReminderNotFound(404)) => {}
        other => panic!("expected ReminderNotFound, got {other:?}"),
    }
}
