//! Notification settings supplied by the external settings collaborator.
//!
//! The engine never persists settings itself; it reads whatever snapshot the
//! provider returns and re-fetches when the provider signals a change. The
//! shipped [`FileSettingsProvider`] reads a JSON file; a missing file yields
//! the defaults, so a fresh install works without any setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default sound reference played on success.
const DEFAULT_SUCCESS_SOUND: &str = "sounds/success1.mp3";

/// Default sound reference played on error.
const DEFAULT_ERROR_SOUND: &str = "sounds/error1.mp3";

/// Default playback volume.
const DEFAULT_VOLUME: f32 = 0.7;

/// Errors that can occur while fetching settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON.
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A project bookmark carried through to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProject {
    /// Human-readable project name.
    #[serde(default)]
    pub name: String,

    /// Project page URL.
    #[serde(default)]
    pub url: String,
}

/// Immutable notification settings snapshot.
///
/// Field names serialize to camelCase to match the settings file written by
/// the external settings UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Sound reference to play on success.
    pub success_sound: String,

    /// Sound reference to play on error.
    pub error_sound: String,

    /// Playback volume in `[0, 1]`.
    pub volume: f32,

    /// Whether the collaborator should play audio at all.
    pub audio_enabled: bool,

    /// Bookmarked projects, in user-defined order.
    pub favorite_projects: Vec<FavoriteProject>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            success_sound: DEFAULT_SUCCESS_SOUND.to_string(),
            error_sound: DEFAULT_ERROR_SOUND.to_string(),
            volume: DEFAULT_VOLUME,
            audio_enabled: true,
            favorite_projects: Vec::new(),
        }
    }
}

impl Settings {
    /// Clamps the volume into `[0, 1]`, leaving other fields untouched.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.volume = self.volume.clamp(0.0, 1.0);
        self
    }
}

/// Source of settings snapshots.
///
/// The session fetches a snapshot at start and re-fetches whenever the
/// observer reports a settings change. A fetch failure must not stop the
/// session; callers keep the last-known snapshot.
pub trait SettingsProvider {
    /// Returns the current settings snapshot.
    fn get(&self) -> Result<Settings, SettingsError>;
}

/// Settings provider backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSettingsProvider {
    path: PathBuf,
}

impl FileSettingsProvider {
    /// Creates a provider reading from the given path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path this provider reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for FileSettingsProvider {
    fn get(&self) -> Result<Settings, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file missing, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Settings = serde_json::from_str(&contents)?;
        Ok(settings.normalized())
    }
}
