//! Habit management commands: add, list, days, pause, resume, master.

use anyhow::Result;

use crate::config::CadenceConfig;
use crate::habit::store;
use crate::habit::types::{Frequency, Habit};

pub fn add(
    config: &CadenceConfig,
    user_id: i64,
    name: &str,
    frequency: Frequency,
    description: Option<&str>,
    goal: Option<&str>,
) -> Result<()> {
    let conn = super::open(config)?;
    let habit = store::create_habit(&conn, user_id, name, frequency, description, goal)?;
    println!("Added habit #{} \"{}\" ({})", habit.id, habit.name, habit.frequency);
    if habit.frequency != Frequency::Daily {
        println!("Set its schedule with: cadence days {} <days>", habit.id);
    }
    Ok(())
}

pub fn list(config: &CadenceConfig, user_id: i64, include_inactive: bool, json: bool) -> Result<()> {
    let conn = super::open(config)?;
    let habits = store::list_habits(&conn, user_id, !include_inactive)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&habits)?);
        return Ok(());
    }

    if habits.is_empty() {
        println!("No habits yet. Create one with: cadence add <name>");
        return Ok(());
    }

    println!("{:<5} {:<24} {:<9} {:<12} {:>7} {:>6}", "id", "name", "freq", "days", "streak", "best");
    println!("{}", "-".repeat(68));
    for habit in &habits {
        println!(
            "{:<5} {:<24} {:<9} {:<12} {:>7} {:>6}{}{}",
            habit.id,
            habit.name,
            habit.frequency,
            habit.active_day_set().unwrap_or("-"),
            habit.current_streak,
            habit.best_streak,
            if habit.is_active { "" } else { "  (paused)" },
            if habit.is_completed { "  (mastered)" } else { "" },
        );
    }
    Ok(())
}

pub fn days(config: &CadenceConfig, habit_id: i64, days: &[u32]) -> Result<()> {
    let conn = super::open(config)?;
    let habit = store::get_habit(&conn, habit_id)?;
    let habit = match habit.frequency {
        Frequency::Weekly => store::set_weekly_days(&conn, habit_id, days)?,
        Frequency::Monthly => store::set_monthly_days(&conn, habit_id, days)?,
        Frequency::Daily => {
            anyhow::bail!("habit #{habit_id} is daily — it has no day-set")
        }
    };
    print_schedule(&habit);
    Ok(())
}

fn print_schedule(habit: &Habit) {
    println!(
        "Habit #{} \"{}\" is now {} on days {}",
        habit.id,
        habit.name,
        habit.frequency,
        habit.active_day_set().unwrap_or("-"),
    );
}

pub fn set_active(config: &CadenceConfig, habit_id: i64, active: bool) -> Result<()> {
    let conn = super::open(config)?;
    let habit = store::set_active(&conn, habit_id, active)?;
    println!(
        "Habit #{} \"{}\" {}",
        habit.id,
        habit.name,
        if active { "resumed" } else { "paused" }
    );
    Ok(())
}

pub fn master(config: &CadenceConfig, habit_id: i64) -> Result<()> {
    let conn = super::open(config)?;
    let habit = store::mark_mastered(&conn, habit_id)?;
    println!("Habit #{} \"{}\" marked as mastered", habit.id, habit.name);
    Ok(())
}
