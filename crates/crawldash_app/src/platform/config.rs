//! Driver configuration, read from a RON file.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```ron
//! (
//!     base_url: "http://crawler.internal:4000",
//!     search_debounce_ms: 150,
//!     log_destination: Both,
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crawldash_client::{ServiceSettings, DEFAULT_BASE_URL};
use crawldash_core::PollSettings;
use crawldash_logging::LogDestination;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "CRAWLDASH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub base_url: String,
    pub list_poll_interval_ms: u64,
    pub detail_poll_interval_ms: u64,
    pub search_debounce_ms: u64,
    pub tick_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_destination: LogTarget,
    pub log_level: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_poll_interval_ms: 5_000,
            detail_poll_interval_ms: 2_000,
            search_debounce_ms: 300,
            tick_interval_ms: 100,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            log_destination: LogTarget::Terminal,
            log_level: "info".to_string(),
        }
    }
}

impl DashConfig {
    /// Loads the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("list_poll_interval_ms", self.list_poll_interval_ms),
            ("detail_poll_interval_ms", self.detail_poll_interval_ms),
            ("tick_interval_ms", self.tick_interval_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ];
        if let Some(&(field, _)) = intervals.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroInterval { field });
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            list_interval: Duration::from_millis(self.list_poll_interval_ms),
            detail_interval: Duration::from_millis(self.detail_poll_interval_ms),
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// First CLI argument, else `$CRAWLDASH_CONFIG`.
pub fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}
