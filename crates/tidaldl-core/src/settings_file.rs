//! JSON file settings store.
//!
//! Settings live in `settings.json` inside the config directory. The
//! directory is `$TIDALDL_CONFIG_DIR` when set, otherwise the platform
//! config dir joined with `tidaldl`.

use std::env;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ports::SettingsRepository;
use crate::settings::{Settings, SettingsError, validate_settings};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TIDALDL_CONFIG_DIR";

const SETTINGS_FILE_NAME: &str = "settings.json";

/// Resolve the config directory.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("tidaldl"))
        .ok_or(SettingsError::NoConfigDir)
}

/// Settings repository backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (see [`config_dir`]).
    pub fn at_default_location() -> Result<Self, SettingsError> {
        Ok(Self::new(config_dir()?.join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: &std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<Settings, SettingsError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(self.io_error(&e)),
        };

        let settings: Settings =
            serde_json::from_str(&raw).map_err(|e| SettingsError::Malformed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        validate_settings(settings)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(&e))?;
        }

        let json = serde_json::to_string_pretty(settings).map_err(|e| SettingsError::Malformed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(&e))?;

        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AudioQuality, VideoQuality};
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(dir.path().join("settings.json"));
        assert_eq!(repo.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn save_then_load_keeps_quality_preferences() {
        let dir = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(dir.path().join("nested").join("settings.json"));

        let settings = Settings {
            audio_quality: AudioQuality::Master,
            video_quality: VideoQuality::P720,
            max_workers: Some(3),
            ..Default::default()
        };
        repo.save(&settings).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonSettingsRepository::new(&path).load().await.unwrap_err();
        assert!(matches!(err, SettingsError::Malformed { .. }));
    }

    #[tokio::test]
    async fn invalid_settings_are_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let repo = JsonSettingsRepository::new(&path);

        let settings = Settings {
            max_workers: Some(0),
            ..Default::default()
        };
        assert!(repo.save(&settings).await.is_err());
        assert!(!path.exists());
    }
}
