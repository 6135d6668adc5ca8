//! Core domain types and ports for tidaldl.
//!
//! - `domain` - catalog items, kinds, search results, selections
//! - `jobs` - job identifiers, completion events, error taxonomy
//! - `ports` - catalog, retrieval, completion emitter and settings traits
//! - `settings` / `settings_file` - user preferences and their JSON store

pub mod domain;
pub mod jobs;
pub mod ports;
pub mod settings;
pub mod settings_file;

// Re-export commonly used types for convenience
pub use domain::{
    Album, Artist, CatalogItem, DisplayRow, ItemKind, Playlist, PlaylistSummary, SearchResult,
    Selection, Track, UnknownKind, Video,
};
pub use jobs::{
    CompletionEvent, ItemOutcome, JobError, JobId, JobState, PoolTaskFault, ResolveError,
    SubmitError,
};
pub use ports::{
    CatalogError, CatalogPort, CatalogResult, CompletionEmitterPort, NoopCompletionEmitter,
    ParsedReference, RecordingCompletionEmitter, ReferenceTarget, RetrievalError, RetrievalPort,
    SearchPage, SettingsRepository,
};
pub use settings::{
    AudioQuality, DEFAULT_SEARCH_LIMIT, Settings, SettingsError, SettingsUpdate, VideoQuality,
    validate_settings,
};
pub use settings_file::{CONFIG_DIR_ENV, JsonSettingsRepository, config_dir};
