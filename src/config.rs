//! Application configuration
//!
//! Resolution order:
//! - Built-in defaults
//! - Optional JSON file at `<config_dir>/spotbook/config.json`
//! - `SPOTBOOK_*` environment variables

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, Level};

use crate::db;

pub const ENV_DB_PATH: &str = "SPOTBOOK_DB_PATH";
pub const ENV_CACHE_SECS: &str = "SPOTBOOK_CACHE_SECS";
pub const ENV_LOG: &str = "SPOTBOOK_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Page sizes per view and viewport class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    pub sessions_compact: usize,
    pub sessions_wide: usize,
    pub booking_months: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            sessions_compact: 3,
            sessions_wide: 6,
            booking_months: 3,
        }
    }
}

impl PageSizes {
    /// Session list page size for a viewport
    pub fn sessions(&self, wide: bool) -> usize {
        if wide {
            self.sessions_wide
        } else {
            self.sessions_compact
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Cache staleness window in seconds
    pub cache_duration_secs: u64,
    pub log_level: String,
    pub page_sizes: PageSizes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: db::default_db_path(),
            cache_duration_secs: 300,
            log_level: "info".to_string(),
            page_sizes: PageSizes::default(),
        }
    }
}

/// Default location of the optional config file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotbook")
        .join("config.json")
}

impl AppConfig {
    /// Load from the default file (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_config_path();
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config file; absent keys keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_CACHE_SECS) {
            self.cache_duration_secs = val.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_CACHE_SECS,
                value: val.clone(),
            })?;
        }
        if let Some(val) = lookup(ENV_LOG) {
            self.log_level = val;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.max_log_level()?;

        let sizes = &self.page_sizes;
        if [sizes.sessions_compact, sizes.sessions_wide, sizes.booking_months].contains(&0) {
            return Err(ConfigError::Invalid("page sizes must be at least 1".into()));
        }
        Ok(())
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }

    /// `log_level` as a tracing level
    pub fn max_log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level: {}", self.log_level)))
    }
}
