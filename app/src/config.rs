//! Configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TASKDECK_DATA_DIR` | No | `~/.taskdeck` | Data directory (state, logs) |
//! | `TASKDECK_TICK_SECS` | No | 60 | Seconds between due-date scans |
//!
//! User-facing toggles (notification channels, hint dismissal) are not
//! configuration; they live in persisted storage and are managed by the
//! [`settings`](crate::settings) module.

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

use crate::notifier::DEFAULT_TICK_SECS;

/// Default data directory name relative to home.
const DEFAULT_DATA_DIR: &str = ".taskdeck";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for Taskdeck.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the key-value store and log file.
    pub data_dir: PathBuf,

    /// Seconds between due-date scans.
    pub tick_secs: u64,
}

impl Config {
    /// Creates a `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `TASKDECK_TICK_SECS` is set but is not a
    /// positive integer, or if the home directory cannot be determined
    /// (needed for the default data directory).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Optional: TASKDECK_DATA_DIR (default: ~/.taskdeck)
        let data_dir = match env::var("TASKDECK_DATA_DIR") {
            Ok(val) => PathBuf::from(val),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                base_dirs.home_dir().join(DEFAULT_DATA_DIR)
            }
        };

        // Optional: TASKDECK_TICK_SECS (default: 60, must be > 0)
        let tick_secs = match env::var("TASKDECK_TICK_SECS") {
            Ok(val) => {
                let secs = val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: "TASKDECK_TICK_SECS".to_string(),
                    message: format!("expected positive integer, got '{val}'"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "TASKDECK_TICK_SECS".to_string(),
                        message: "tick interval must be at least 1 second".to_string(),
                    });
                }
                secs
            }
            Err(_) => DEFAULT_TICK_SECS,
        };

        Ok(Self {
            data_dir,
            tick_secs,
        })
    }
}
