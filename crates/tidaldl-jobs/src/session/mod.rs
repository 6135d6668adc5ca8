//! Interactive session.
//!
//! The single consumer context: owns the current result and selected kind,
//! submits jobs, and turns completion events into surface updates. Busy
//! state lives here and is driven only by consumed `BatchDone` events.
//! Catalog lookups run on their own tasks; their replies are applied when
//! [`Session::next_event`] hands them out.

mod busy;
mod lookup;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use tidaldl_core::{
    AudioQuality, CatalogError, CatalogPort, CompletionEvent, ItemKind, JobId,
    JsonSettingsRepository, PlaylistSummary, ResolveError, RetrievalPort, SearchResult, Selection,
    Settings, SettingsError, SettingsRepository, SettingsUpdate, SubmitError, VideoQuality,
};

use crate::channel::{CompletionReceiver, completion_channel};
use crate::config::PoolConfig;
use crate::orchestrator::{JobHandle, JobOrchestrator, OrchestratorDeps, build_orchestrator};
use crate::playlist::PlaylistBrowser;
use crate::pool::WorkerPool;
use crate::resolver::SearchResolver;

pub use busy::BusyTracker;
pub use lookup::{LookupId, ResultsUpdate};

use lookup::{LookupBody, LookupReceiver, LookupReply, LookupSender, spawn_lookup};

/// Trigger caption while no batch is in flight.
pub const TRIGGER_IDLE_LABEL: &str = "Download";
/// Trigger caption while at least one batch is in flight.
pub const TRIGGER_BUSY_LABEL: &str = "DOWNLOADING...";

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Unknown playlist '{id}'")]
    UnknownPlaylist { id: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Dependencies for starting a [`Session`].
pub struct SessionDeps<C, R, S>
where
    C: CatalogPort + 'static,
    R: RetrievalPort + 'static,
    S: SettingsRepository + 'static,
{
    pub catalog: Arc<C>,
    pub retrieval: Arc<R>,
    pub settings_repo: Arc<S>,
}

impl<C, R> SessionDeps<C, R, JsonSettingsRepository>
where
    C: CatalogPort + 'static,
    R: RetrievalPort + 'static,
{
    /// Use the settings file in the default config directory.
    pub fn with_default_settings(catalog: Arc<C>, retrieval: Arc<R>) -> Result<Self, SessionError> {
        Ok(Self {
            catalog,
            retrieval,
            settings_repo: Arc::new(JsonSettingsRepository::at_default_location()?),
        })
    }
}

/// What the surface should show after consuming one completion event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceUpdate {
    pub event: CompletionEvent,
    /// Line for the log pane, if the event has one.
    pub log_line: Option<String>,
    /// Whether the download trigger is enabled after this event.
    pub trigger_enabled: bool,
}

/// One update handed out by [`Session::next_event`].
#[derive(Debug)]
pub enum SessionUpdate {
    /// A completion event was applied.
    Completion(SurfaceUpdate),
    /// A search or playlist expansion finished.
    Results(ResultsUpdate),
    /// The playlist tree finished loading.
    Playlists {
        lookup: LookupId,
        result: Result<Vec<PlaylistSummary>, CatalogError>,
    },
}

impl SessionUpdate {
    /// The completion update, if this is one.
    pub const fn completion(&self) -> Option<&SurfaceUpdate> {
        match self {
            Self::Completion(update) => Some(update),
            _ => None,
        }
    }
}

/// The interactive consumer.
pub struct Session {
    resolver: SearchResolver,
    orchestrator: JobOrchestrator,
    browser: Arc<PlaylistBrowser>,
    events: CompletionReceiver,
    lookups_tx: LookupSender,
    lookups_rx: LookupReceiver,
    next_lookup: u64,
    /// Latest lookup allowed to replace the current result.
    latest_results: Option<LookupId>,
    busy: BusyTracker,
    current: SearchResult,
    selected_kind: ItemKind,
    settings: Settings,
    settings_repo: Arc<dyn SettingsRepository>,
}

impl Session {
    /// Load settings, start the worker pool and wire every component.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start<C, R, S>(deps: SessionDeps<C, R, S>) -> Result<Self, SessionError>
    where
        C: CatalogPort + 'static,
        R: RetrievalPort + 'static,
        S: SettingsRepository + 'static,
    {
        let settings = deps.settings_repo.load().await?;
        let pool = WorkerPool::new(PoolConfig::from_settings(&settings));
        let (sender, events) = completion_channel();
        let (lookups_tx, lookups_rx) = mpsc::unbounded_channel();

        let orchestrator = build_orchestrator(OrchestratorDeps {
            retrieval: deps.retrieval,
            emitter: Arc::new(sender),
            pool,
        });
        let catalog: Arc<dyn CatalogPort> = deps.catalog;
        let resolver = SearchResolver::new(Arc::clone(&catalog))
            .with_search_limit(settings.effective_search_limit());

        tracing::info!(
            target: "tidaldl.jobs",
            max_workers = orchestrator.pool().max_concurrency(),
            audio_quality = %settings.audio_quality,
            video_quality = %settings.video_quality,
            "Session started"
        );

        Ok(Self {
            resolver,
            orchestrator,
            browser: Arc::new(PlaylistBrowser::new(catalog)),
            events,
            lookups_tx,
            lookups_rx,
            next_lookup: 1,
            latest_results: None,
            busy: BusyTracker::new(),
            current: SearchResult::empty(ItemKind::default()),
            selected_kind: ItemKind::default(),
            settings,
            settings_repo: deps.settings_repo,
        })
    }

    pub const fn current(&self) -> &SearchResult {
        &self.current
    }

    pub const fn selected_kind(&self) -> ItemKind {
        self.selected_kind
    }

    /// Kind used by the next keyword search.
    pub fn set_kind(&mut self, kind: ItemKind) {
        self.selected_kind = kind;
    }

    /// Start resolving a query on its own task.
    ///
    /// The reply arrives through [`Session::next_event`] as a
    /// [`SessionUpdate::Results`]. A direct reference switches the selected
    /// kind to the resolved one. An empty result clears the current result;
    /// any other error keeps it.
    pub fn search(&mut self, query: &str) -> LookupId {
        let lookup = self.begin_results();
        let resolver = self.resolver.clone();
        let kind = self.selected_kind;
        let query = query.to_string();
        spawn_lookup(&self.lookups_tx, lookup, async move {
            LookupBody::Results {
                kind,
                result: resolver.resolve(&query, kind).await.map_err(SessionError::from),
            }
        });
        lookup
    }

    /// Submit the selected rows of the current result as one batch.
    pub fn download(&mut self, selection: &Selection) -> Result<JobHandle, SessionError> {
        let handle = self.orchestrator.submit(selection, &self.current)?;
        self.busy.begin(handle.id());
        Ok(handle)
    }

    /// Start loading the top-level playlist nodes.
    pub fn load_playlists(&mut self) -> LookupId {
        let lookup = self.next_lookup_id();
        let browser = Arc::clone(&self.browser);
        spawn_lookup(&self.lookups_tx, lookup, async move {
            LookupBody::Playlists(browser.list_playlists().await)
        });
        lookup
    }

    /// Start reloading the playlist tree from the catalog.
    pub fn refresh_playlists(&mut self) -> LookupId {
        let lookup = self.next_lookup_id();
        let browser = Arc::clone(&self.browser);
        spawn_lookup(&self.lookups_tx, lookup, async move {
            LookupBody::Playlists(browser.refresh().await)
        });
        lookup
    }

    /// Start loading a playlist's tracks to show as the current result.
    pub fn show_playlist(&mut self, playlist_id: &str) -> LookupId {
        let lookup = self.begin_results();
        let browser = Arc::clone(&self.browser);
        let playlist_id = playlist_id.to_string();
        spawn_lookup(&self.lookups_tx, lookup, async move {
            LookupBody::Results {
                kind: ItemKind::Track,
                result: browser.list_tracks(&playlist_id).await.map_err(SessionError::from),
            }
        });
        lookup
    }

    /// Submit a whole playlist from the tree as a batch of one.
    pub async fn download_playlist(&mut self, playlist_id: &str) -> Result<JobHandle, SessionError> {
        let summary = self
            .browser
            .summary(playlist_id)
            .await
            .ok_or_else(|| SessionError::UnknownPlaylist {
                id: playlist_id.to_string(),
            })?;
        let handle = self.orchestrator.submit_single(summary.to_item());
        self.busy.begin(handle.id());
        Ok(handle)
    }

    fn next_lookup_id(&mut self) -> LookupId {
        let lookup = LookupId::new(self.next_lookup);
        self.next_lookup += 1;
        lookup
    }

    fn begin_results(&mut self) -> LookupId {
        let lookup = self.next_lookup_id();
        self.latest_results = Some(lookup);
        lookup
    }

    /// Wait for the next completion event or lookup reply and apply it.
    ///
    /// `None` only once the completion stream has ended.
    pub async fn next_event(&mut self) -> Option<SessionUpdate> {
        tokio::select! {
            Some(reply) = self.lookups_rx.recv() => Some(self.apply_lookup(reply)),
            event = self.events.recv() => {
                event.map(|event| SessionUpdate::Completion(self.apply(event)))
            }
        }
    }

    /// Apply the next update if one is already waiting.
    pub fn try_next_event(&mut self) -> Option<SessionUpdate> {
        if let Ok(reply) = self.lookups_rx.try_recv() {
            return Some(self.apply_lookup(reply));
        }
        let event = self.events.try_recv()?;
        Some(SessionUpdate::Completion(self.apply(event)))
    }

    fn apply_lookup(&mut self, reply: LookupReply) -> SessionUpdate {
        let LookupReply { lookup, body } = reply;
        match body {
            LookupBody::Results { kind, result } => {
                SessionUpdate::Results(self.apply_results(lookup, kind, result))
            }
            LookupBody::Playlists(result) => {
                if let Err(e) = &result {
                    tracing::warn!(target: "tidaldl.jobs", %lookup, error = %e, "Playlist load failed");
                }
                SessionUpdate::Playlists { lookup, result }
            }
        }
    }

    fn apply_results(
        &mut self,
        lookup: LookupId,
        kind: ItemKind,
        result: Result<SearchResult, SessionError>,
    ) -> ResultsUpdate {
        let applied = self.latest_results == Some(lookup);
        let outcome = match result {
            Ok(found) => {
                let rows = found.len();
                if applied {
                    self.selected_kind = found.kind();
                    self.current = found;
                }
                Ok(rows)
            }
            Err(e) => {
                if applied && matches!(e, SessionError::Resolve(ResolveError::EmptyResult { .. })) {
                    self.current = SearchResult::empty(kind);
                }
                tracing::info!(target: "tidaldl.jobs", %lookup, error = %e, "Search reported");
                Err(e)
            }
        };
        if !applied {
            tracing::debug!(target: "tidaldl.jobs", %lookup, "Superseded lookup not applied");
        }
        ResultsUpdate {
            lookup,
            applied,
            outcome,
        }
    }

    fn apply(&mut self, event: CompletionEvent) -> SurfaceUpdate {
        let log_line = event.log_line();
        if let Some(line) = &log_line {
            tracing::info!(target: "tidaldl.jobs", job_id = %event.job_id(), "{line}");
        }

        if let CompletionEvent::BatchDone { job_id, .. } = event {
            self.finish_job(job_id);
        }

        SurfaceUpdate {
            event,
            log_line,
            trigger_enabled: !self.busy.is_busy(),
        }
    }

    fn finish_job(&mut self, job_id: JobId) {
        if !self.busy.finish(job_id) {
            tracing::debug!(target: "tidaldl.jobs", %job_id, "BatchDone for untracked job");
            return;
        }
        if !self.busy.is_busy() {
            tracing::info!(target: "tidaldl.jobs", "All downloads complete");
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Jobs whose `BatchDone` has not been consumed yet.
    pub fn in_flight(&self) -> usize {
        self.busy.count()
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.busy.is_busy() {
            TRIGGER_BUSY_LABEL
        } else {
            TRIGGER_IDLE_LABEL
        }
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persist a new audio quality preference.
    pub async fn set_audio_quality(&mut self, quality: AudioQuality) -> Result<(), SessionError> {
        self.update_settings(SettingsUpdate {
            audio_quality: Some(quality),
            ..Default::default()
        })
        .await
    }

    /// Persist a new video quality preference.
    pub async fn set_video_quality(&mut self, quality: VideoQuality) -> Result<(), SessionError> {
        self.update_settings(SettingsUpdate {
            video_quality: Some(quality),
            ..Default::default()
        })
        .await
    }

    async fn update_settings(&mut self, update: SettingsUpdate) -> Result<(), SessionError> {
        let mut updated = self.settings.clone();
        updated.merge(&update);
        self.settings_repo.save(&updated).await?;
        self.settings = updated;
        Ok(())
    }
}
