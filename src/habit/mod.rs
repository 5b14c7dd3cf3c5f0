pub mod complete;
pub mod error;
pub mod remind;
pub mod reset;
pub mod schedule;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{HabitError, Result};
