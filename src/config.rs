//! Configuration module for Turnchime.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TURNCHIME_PAGE_FILE` | Yes | - | Path to the rendered page snapshot HTML file |
//! | `TURNCHIME_PAGE_URL` | Yes | - | URL of the page the snapshot was rendered from |
//! | `TURNCHIME_SETTINGS_PATH` | No | `~/.turnchime/settings.json` | Settings file |
//! | `TURNCHIME_NOTIFY_URL` | No | - | Notification endpoint (log-only when unset) |
//! | `TURNCHIME_DEBOUNCE_MS` | No | 500 | Quiet period after a mutation (>= 1) |
//! | `TURNCHIME_POLL_INTERVAL_SECS` | No | 3 | Fallback poll interval (>= 1) |
//!
//! # Example
//!
//! ```no_run
//! use turnchime::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Watching: {}", config.page_file.display());
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;

use crate::observer::{DEFAULT_DEBOUNCE_MS, DEFAULT_POLL_INTERVAL_SECS};

/// Default settings file location relative to home.
const DEFAULT_SETTINGS_PATH: &str = ".turnchime/settings.json";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for the Turnchime engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the rendered page snapshot file the watcher observes.
    pub page_file: PathBuf,

    /// URL of the watched page, used to classify it for exclusion.
    pub page_url: String,

    /// Path to the JSON settings file.
    pub settings_path: PathBuf,

    /// Optional notification endpoint. When `None`, outcomes are only logged.
    pub notify_url: Option<String>,

    /// Quiet period after a significant mutation before a check runs.
    pub debounce: Duration,

    /// Interval of the fallback poll.
    pub poll_interval: Duration,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `TURNCHIME_PAGE_FILE` or `TURNCHIME_PAGE_URL` is not set
    /// - A duration variable is set but is not a positive integer
    /// - The home directory cannot be determined (needed for the default
    ///   settings path)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Required: TURNCHIME_PAGE_FILE
        let page_file = env::var("TURNCHIME_PAGE_FILE")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingEnvVar("TURNCHIME_PAGE_FILE".to_string()))?;

        // Required: TURNCHIME_PAGE_URL
        let page_url = env::var("TURNCHIME_PAGE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("TURNCHIME_PAGE_URL".to_string()))?;

        // Optional: TURNCHIME_SETTINGS_PATH (default: ~/.turnchime/settings.json)
        let settings_path = match env::var("TURNCHIME_SETTINGS_PATH") {
            Ok(val) => PathBuf::from(val),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                base_dirs.home_dir().join(DEFAULT_SETTINGS_PATH)
            }
        };

        // Optional: TURNCHIME_NOTIFY_URL (default: log-only)
        let notify_url = env::var("TURNCHIME_NOTIFY_URL").ok();

        // Optional: TURNCHIME_DEBOUNCE_MS (default: 500, must be >= 1)
        let debounce_ms = parse_positive("TURNCHIME_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;

        // Optional: TURNCHIME_POLL_INTERVAL_SECS (default: 3, must be >= 1)
        let poll_secs = parse_positive("TURNCHIME_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

        Ok(Self {
            page_file,
            page_url,
            settings_path,
            notify_url,
            debounce: Duration::from_millis(debounce_ms),
            poll_interval: Duration::from_secs(poll_secs),
        })
    }
}

/// Parses an optional positive-integer variable, falling back to `default`.
fn parse_positive(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(val) => {
            let parsed = val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected positive integer, got '{val}'"),
            })?;
            if parsed == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "value must be at least 1".to_string(),
                });
            }
            Ok(parsed)
        }
        Err(_) => Ok(default),
    }
}
