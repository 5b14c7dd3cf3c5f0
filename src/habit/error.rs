//! Error taxonomy for habit engine operations.

use crate::habit::types::Frequency;
use thiserror::Error;

/// Errors surfaced to callers of the habit engine.
///
/// Failures in secondary side effects (reminder reconciliation, queue
/// cleanup, per-entry drain failures) are logged and recovered locally,
/// never raised through this type.
#[derive(Debug, Error)]
pub enum HabitError {
    #[error("habit not found: {0}")]
    NotFound(i64),

    #[error("reminder not found: {0}")]
    ReminderNotFound(i64),

    #[error("user {user_id} does not own habit {habit_id}")]
    Unauthorized { habit_id: i64, user_id: i64 },

    #[error("habit {habit_id} is not {expected}")]
    InvalidRecurrence { habit_id: i64, expected: Frequency },

    #[error("storage error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, HabitError>;
