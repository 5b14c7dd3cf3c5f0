pub mod habit;
pub mod log;
pub mod tick;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::CadenceConfig;
use crate::db;

/// Open the configured database for a CLI command.
pub fn open(config: &CadenceConfig) -> Result<Connection> {
    db::open_database(config.resolved_db_path())
}
