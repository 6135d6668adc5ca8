//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the orchestration layer expects from the
//! outside world. They contain no transport details and use only domain types.

pub mod catalog;
pub mod completion_emitter;
pub mod retrieval;
pub mod settings_repository;

pub use catalog::{
    CatalogError, CatalogPort, CatalogResult, ParsedReference, ReferenceTarget, SearchPage,
};
pub use completion_emitter::{
    CompletionEmitterPort, NoopCompletionEmitter, RecordingCompletionEmitter,
};
pub use retrieval::{RetrievalError, RetrievalPort};
pub use settings_repository::SettingsRepository;
