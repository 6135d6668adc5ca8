//! Hand-written port fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tidaldl_core::{
    CatalogItem, CatalogPort, CatalogResult, ItemKind, ParsedReference, PlaylistSummary,
    RetrievalError, RetrievalPort, SearchPage, Settings, SettingsError, SettingsRepository, Track,
};

pub const WAIT: Duration = Duration::from_secs(5);

pub fn track(title: &str) -> Track {
    Track {
        id: format!("t-{}", title.to_lowercase()),
        title: title.to_string(),
        artists: vec!["Test Artist".to_string()],
        audio_quality: "LOSSLESS".to_string(),
        duration_secs: 200,
    }
}

pub fn track_item(title: &str) -> CatalogItem {
    CatalogItem::Track(track(title))
}

/// Catalog backed by in-memory tables.
#[derive(Default)]
pub struct FakeCatalog {
    pub page: SearchPage,
    /// Searches for these texts stall before answering.
    pub slow_searches: HashMap<String, Duration>,
    pub references: HashMap<String, ParsedReference>,
    pub entities: HashMap<(ItemKind, String), CatalogItem>,
    pub playlists: Vec<PlaylistSummary>,
    pub playlist_tracks: HashMap<String, Vec<Track>>,
}

impl FakeCatalog {
    pub fn with_tracks(titles: &[&str]) -> Self {
        Self {
            page: SearchPage {
                tracks: titles.iter().copied().map(track).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn search(&self, text: &str, _kind: ItemKind, limit: u32) -> CatalogResult<SearchPage> {
        if let Some(delay) = self.slow_searches.get(text) {
            tokio::time::sleep(*delay).await;
        }
        let mut page = self.page.clone();
        page.tracks.truncate(limit as usize);
        Ok(page)
    }

    async fn parse_reference(&self, reference: &str) -> CatalogResult<Option<ParsedReference>> {
        Ok(self.references.get(reference).cloned())
    }

    async fn lookup(&self, kind: ItemKind, id: &str) -> CatalogResult<Option<CatalogItem>> {
        Ok(self.entities.get(&(kind, id.to_string())).cloned())
    }

    async fn list_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>> {
        Ok(self.playlists.clone())
    }

    async fn list_playlist_tracks(&self, playlist_id: &str) -> CatalogResult<Vec<Track>> {
        Ok(self.playlist_tracks.get(playlist_id).cloned().unwrap_or_default())
    }
}

/// Retrieval that fails, panics or stalls on scripted item names and
/// records every call.
#[derive(Default)]
pub struct ScriptedRetrieval {
    failures: HashMap<String, String>,
    panics: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(ItemKind, String)>>,
}

impl ScriptedRetrieval {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fail(mut self, name: &str, message: &str) -> Self {
        self.failures.insert(name.to_string(), message.to_string());
        self
    }

    #[must_use]
    pub fn panic_on(mut self, name: &str) -> Self {
        self.panics.insert(name.to_string());
        self
    }

    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Items retrieved so far, in call order.
    pub fn calls(&self) -> Vec<(ItemKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrievalPort for ScriptedRetrieval {
    async fn retrieve(&self, kind: ItemKind, item: &CatalogItem) -> Result<(), RetrievalError> {
        let name = item.display_name().to_string();
        self.calls.lock().unwrap().push((kind, name.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panics.contains(&name) {
            panic!("retrieval of {name} crashed");
        }
        match self.failures.get(&name) {
            Some(message) => Err(RetrievalError::new(message.clone())),
            None => Ok(()),
        }
    }
}

/// Settings store kept in memory.
#[derive(Default)]
pub struct MemorySettings {
    settings: Mutex<Settings>,
    saves: Mutex<usize>,
}

impl MemorySettings {
    pub fn with(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            saves: Mutex::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn stored(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }
}

#[async_trait]
impl SettingsRepository for MemorySettings {
    async fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.stored())
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.settings.lock().unwrap() = settings.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
