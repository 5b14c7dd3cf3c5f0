//! Periodic maintenance commands: the nightly check, the queue drain, and
//! reminder generation. These are what a cron job (or a curious user)
//! invokes.

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::config::CadenceConfig;
use crate::habit::{remind, reset};

pub fn check(config: &CadenceConfig, habit_id: Option<i64>, today: NaiveDate) -> Result<()> {
    let conn = super::open(config)?;
    let max_scan = config.engine.max_scan_days;

    let staged = match habit_id {
        Some(id) => reset::check_habit(&conn, id, today, max_scan)?,
        None => reset::check_all(&conn, today, max_scan)?,
    };
    println!("Staged {staged} missed occurrence(s) for reset.");
    Ok(())
}

pub fn drain(config: &CadenceConfig) -> Result<()> {
    let mut conn = super::open(config)?;
    let processed = reset::drain(&mut conn, Utc::now())?;
    println!("Processed {processed} reset entr(ies).");
    Ok(())
}

pub fn remind(config: &CadenceConfig, user_id: i64, date: NaiveDate) -> Result<()> {
    let conn = super::open(config)?;
    let reminders = remind::generate_for_date(&conn, user_id, date)?;

    if reminders.is_empty() {
        println!("Nothing scheduled for {date}.");
        return Ok(());
    }
    println!("Reminders for {date}:");
    for reminder in &reminders {
        println!(
            "  habit #{:<4} {}",
            reminder.habit_id,
            if reminder.is_completed { "done" } else { "pending" }
        );
    }
    Ok(())
}
