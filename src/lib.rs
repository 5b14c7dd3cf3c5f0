//! Personal habit tracker — recurrence scheduling, streaks, and missed-day
//! reconciliation, backed by SQLite.
//!
//! Cadence tracks recurring habits under one of three recurrence rules and
//! keeps each habit's streak honest after the fact:
//!
//! | Rule | Due when |
//! |------|----------|
//! | **Daily** | every day |
//! | **Weekly** | ISO weekday (Mon=1..Sun=7) is in the habit's day-set |
//! | **Monthly** | day-of-month is in the habit's day-set |
//!
//! Completions are logged at most once per calendar day and move the streak
//! forward. A nightly check walks the days since each habit was last seen,
//! stages every missed occurrence into a reset queue, and a later drain
//! pass zeroes the streak (snapshotting the old value for audit) and flips
//! the matching reminder back to incomplete.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, and migrations
//! - [`habit`] — Core engine: scheduling, completion logging, streak resets,
//!   reminders, and stats

pub mod cli;
pub mod config;
pub mod db;
pub mod habit;
