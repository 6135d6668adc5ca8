//! Settings domain types and validation.
//!
//! Quality preferences and worker limits. Persistence lives behind the
//! `SettingsRepository` port; see `settings_file` for the JSON file store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of entries requested per search bucket.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Upper bound accepted for `max_workers`.
pub const MAX_WORKERS_LIMIT: usize = 64;

/// Preferred audio quality for track and album retrieval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioQuality {
    Normal,
    High,
    #[default]
    HiFi,
    Master,
    Max,
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Preferred resolution for video retrieval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoQuality {
    P240,
    P360,
    P480,
    P720,
    #[default]
    P1080,
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Application settings.
///
/// Optional fields fall back to defaults at the point of use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory the retrieval collaborator writes into.
    pub download_path: Option<String>,

    pub audio_quality: AudioQuality,

    pub video_quality: VideoQuality,

    /// Worker pool bound; `None` means one slot per CPU.
    pub max_workers: Option<usize>,

    /// Entries requested per search bucket (1-300).
    pub search_limit: Option<u32>,
}

impl Settings {
    /// Effective search limit (with default fallback).
    #[must_use]
    pub const fn effective_search_limit(&self) -> u32 {
        match self.search_limit {
            Some(limit) => limit,
            None => DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Merge a partial update, only touching fields that are `Some`.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(ref path) = update.download_path {
            self.download_path.clone_from(path);
        }
        if let Some(quality) = update.audio_quality {
            self.audio_quality = quality;
        }
        if let Some(quality) = update.video_quality {
            self.video_quality = quality;
        }
        if let Some(workers) = update.max_workers {
            self.max_workers = workers;
        }
        if let Some(limit) = update.search_limit {
            self.search_limit = limit;
        }
    }
}

/// Partial settings update.
///
/// Nullable fields are `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset to default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub download_path: Option<Option<String>>,
    pub audio_quality: Option<AudioQuality>,
    pub video_quality: Option<VideoQuality>,
    pub max_workers: Option<Option<usize>>,
    pub search_limit: Option<Option<u32>>,
}

/// Settings validation and storage errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Max workers must be between 1 and {MAX_WORKERS_LIMIT}, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Search limit must be between 1 and 300, got {0}")]
    InvalidSearchLimit(u32),

    #[error("Download path cannot be empty")]
    EmptyDownloadPath,

    #[error("Cannot determine config directory")]
    NoConfigDir,

    #[error("Failed to access settings file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Settings file {path} is malformed: {reason}")]
    Malformed { path: String, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(workers) = settings.max_workers {
        if !(1..=MAX_WORKERS_LIMIT).contains(&workers) {
            return Err(SettingsError::InvalidWorkerCount(workers));
        }
    }

    if let Some(limit) = settings.search_limit {
        if !(1..=300).contains(&limit) {
            return Err(SettingsError::InvalidSearchLimit(limit));
        }
    }

    if settings
        .download_path
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyDownloadPath);
    }

    Ok(())
}
