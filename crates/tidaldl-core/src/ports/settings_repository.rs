//! Settings persistence port.

use async_trait::async_trait;

use crate::settings::{Settings, SettingsError};

/// Port for loading and saving user settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load settings; a missing store yields defaults.
    async fn load(&self) -> Result<Settings, SettingsError>;

    /// Persist the full settings document.
    async fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}
