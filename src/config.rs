use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CadenceConfig {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// User id assumed by CLI commands when `--user` is not given.
    pub default_user: i64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on the missed-occurrence scan window, in days.
    /// Keeps the day-by-day walk finite for long-dormant habits.
    pub max_scan_days: i64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            storage: StorageConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            default_user: 1,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_cadence_dir()
            .join("habits.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_scan_days: 366 }
    }
}

/// Returns `~/.cadence/`
pub fn default_cadence_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".cadence")
}

/// Returns the default config file path: `~/.cadence/config.toml`
pub fn default_config_path() -> PathBuf {
    default_cadence_dir().join("config.toml")
}

impl CadenceConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CadenceConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (CADENCE_DB, CADENCE_USER, CADENCE_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CADENCE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("CADENCE_USER") {
            if let Ok(id) = val.parse() {
                self.app.default_user = id;
            }
        }
        if let Ok(val) = std::env::var("CADENCE_LOG_LEVEL") {
            self.app.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
