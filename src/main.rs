use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cadence::cli;
use cadence::config::CadenceConfig;
use cadence::habit::types::Frequency;

#[derive(Parser)]
#[command(name = "cadence", version, about = "Personal habit tracker with streaks")]
struct Cli {
    /// Act as this user id (defaults to app.default_user from config)
    #[arg(long, global = true)]
    user: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new habit
    Add {
        name: String,
        /// daily, weekly, or monthly
        #[arg(short, long, default_value = "daily")]
        frequency: Frequency,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        goal: Option<String>,
    },
    /// List habits
    List {
        /// Include paused habits
        #[arg(long)]
        all: bool,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Set the day-set of a weekly or monthly habit, e.g. `days 3 1,3,5`
    Days {
        habit_id: i64,
        #[arg(value_delimiter = ',')]
        days: Vec<u32>,
    },
    /// Record a completion for a habit
    Log {
        habit_id: i64,
        /// Occurrence date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Show which habits are due on a date
    Due {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Scan for missed occurrences and stage streak resets
    Check {
        /// Check a single habit instead of all active ones
        #[arg(long)]
        habit: Option<i64>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Process all staged streak resets
    Drain,
    /// Generate today's reminders
    Remind {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Pause a habit (excluded from scheduling and checks)
    Pause { habit_id: i64 },
    /// Resume a paused habit
    Resume { habit_id: i64 },
    /// Mark a habit as mastered
    Master { habit_id: i64 },
    /// Completion stats over a date range
    Stats {
        habit_id: i64,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config (for log level, db path, default user)
    let config = CadenceConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.app.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let user = args.user.unwrap_or(config.app.default_user);
    let today = Local::now().date_naive();

    match args.command {
        Command::Add {
            name,
            frequency,
            description,
            goal,
        } => cli::habit::add(
            &config,
            user,
            &name,
            frequency,
            description.as_deref(),
            goal.as_deref(),
        )?,
        Command::List { all, json } => cli::habit::list(&config, user, all, json)?,
        Command::Days { habit_id, days } => cli::habit::days(&config, habit_id, &days)?,
        Command::Log {
            habit_id,
            date,
            comment,
        } => cli::log::log(
            &config,
            habit_id,
            user,
            date.unwrap_or(today),
            comment.as_deref(),
        )?,
        Command::Due { date } => cli::log::due(&config, user, date.unwrap_or(today))?,
        Command::Check { habit, date } => cli::tick::check(&config, habit, date.unwrap_or(today))?,
        Command::Drain => cli::tick::drain(&config)?,
        Command::Remind { date } => cli::tick::remind(&config, user, date.unwrap_or(today))?,
        Command::Pause { habit_id } => cli::habit::set_active(&config, habit_id, false)?,
        Command::Resume { habit_id } => cli::habit::set_active(&config, habit_id, true)?,
        Command::Master { habit_id } => cli::habit::master(&config, habit_id)?,
        Command::Stats { habit_id, from, to } => {
            cli::log::stats(&config, habit_id, from, to.unwrap_or(today))?
        }
    }

    Ok(())
}
