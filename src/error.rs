//! Error types for the Turnchime engine.
//!
//! This module defines the top-level error type aggregating the failure
//! modes of the individual subsystems, providing structured error handling
//! with clear, human-readable messages.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dom::DomError;
use crate::notifier::NotifierError;
use crate::settings::SettingsError;
use crate::watcher::WatcherError;

/// Errors that can occur during engine operations.
///
/// This is the primary error type for the crate, encompassing all possible
/// failure modes.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document snapshot or selector error.
    #[error("document error: {0}")]
    Dom(#[from] DomError),

    /// Settings loading error.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// File watching error.
    #[error("file watch error: {0}")]
    Watch(#[from] WatcherError),

    /// Notification delivery error.
    #[error("notification error: {0}")]
    Notify(#[from] NotifierError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MonitorError>;
