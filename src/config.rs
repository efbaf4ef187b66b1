//! Configuration management
//!
//! Resolves the storage directory and parses the optional TOML settings file
//! kept beside the credential store.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOGIN_ATTEMPTS, DEFAULT_REFRESH_SECS, LOGIN_ATTEMPTS_MAX, LOGIN_ATTEMPTS_MIN,
    REFRESH_SECS_MAX, REFRESH_SECS_MIN, STORAGE_DIR_ENV, STORAGE_DIR_NAME,
};
use crate::models::{Column, SortOrder};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Note: bounds must match REFRESH_SECS_MIN/MAX in constants.rs
    #[error("invalid refresh interval: {0}. Must be between 1 and 3600 seconds")]
    InvalidInterval(u64),
    /// Note: bounds must match LOGIN_ATTEMPTS_MIN/MAX in constants.rs
    #[error("invalid login attempt limit: {0}. Must be between 1 and 10")]
    InvalidAttempts(u32),
    #[error("cannot determine the home directory; set OMADA_MONITOR_HOME or pass --config-dir")]
    NoHomeDir,
}

/// Settings file contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub monitor: MonitorSettings,
    pub login: LoginSettings,
}

/// Table refresh and ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorSettings {
    /// Refresh period in seconds (1-3600)
    pub refresh_interval: u64,
    pub sort_column: Column,
    pub descending: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_SECS,
            sort_column: Column::Uptime,
            descending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoginSettings {
    /// Interactive attempts before giving up (1-10)
    pub max_attempts: u32,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_LOGIN_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Reads `config.toml` from the storage directory; defaults when absent
    pub fn load_or_default(storage_dir: &Path) -> Result<Self, ConfigError> {
        let path = storage_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_interval(self.monitor.refresh_interval)?;
        let attempts = self.login.max_attempts;
        if !(LOGIN_ATTEMPTS_MIN..=LOGIN_ATTEMPTS_MAX).contains(&attempts) {
            return Err(ConfigError::InvalidAttempts(attempts));
        }
        Ok(())
    }

    pub fn refresh_duration(&self) -> Duration {
        Duration::from_secs(self.monitor.refresh_interval)
    }

    pub fn sort_order(&self) -> SortOrder {
        if self.monitor.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

pub fn validate_interval(seconds: u64) -> Result<(), ConfigError> {
    if (REFRESH_SECS_MIN..=REFRESH_SECS_MAX).contains(&seconds) {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterval(seconds))
    }
}

/// Storage directory: explicit override, then the environment, then `~/.omada-monitor`
pub fn resolve_storage_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(STORAGE_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}
