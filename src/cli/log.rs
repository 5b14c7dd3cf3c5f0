//! Completion logging and due-today queries.

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::CadenceConfig;
use crate::habit::stats::completion_rate;
use crate::habit::{complete, schedule, store};

pub fn log(
    config: &CadenceConfig,
    habit_id: i64,
    user_id: i64,
    date: NaiveDate,
    comment: Option<&str>,
) -> Result<()> {
    let mut conn = super::open(config)?;
    let entry = complete::record_completion(&mut conn, habit_id, user_id, date, comment)?;
    let habit = store::get_habit(&conn, habit_id)?;
    println!(
        "Logged \"{}\" for {} — streak {} (best {})",
        habit.name, entry.logged_date, habit.current_streak, habit.best_streak
    );
    Ok(())
}

/// Show which of the user's active habits are due on `date`.
pub fn due(config: &CadenceConfig, user_id: i64, date: NaiveDate) -> Result<()> {
    let conn = super::open(config)?;
    let habits = store::list_habits(&conn, user_id, true)?;

    let mut any = false;
    for habit in &habits {
        if !schedule::is_due(habit, date) {
            continue;
        }
        any = true;
        let done = store::get_log_by_date(&conn, habit.id, date)?.is_some();
        println!(
            "  #{:<4} {:<24} {}",
            habit.id,
            habit.name,
            if done { "done" } else { "due" }
        );
    }
    if !any {
        println!("Nothing due on {date}.");
    }
    Ok(())
}

pub fn stats(config: &CadenceConfig, habit_id: i64, from: NaiveDate, to: NaiveDate) -> Result<()> {
    let conn = super::open(config)?;
    let habit = store::get_habit(&conn, habit_id)?;
    let rate = completion_rate(&conn, habit_id, from, to)?;
    let logs = store::logs_in_range(&conn, habit_id, from, to)?;

    println!("Habit #{} \"{}\"", habit.id, habit.name);
    println!("{}", "=".repeat(40));
    println!("  Range:            {from} .. {to}");
    println!("  Completions:      {}", logs.len());
    println!("  Completion rate:  {rate:.1}%");
    println!("  Current streak:   {}", habit.current_streak);
    println!("  Best streak:      {}", habit.best_streak);
    Ok(())
}
