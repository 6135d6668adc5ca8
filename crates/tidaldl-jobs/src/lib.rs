//! Background job orchestration for tidaldl.
//!
//! - `resolver` - query to search result (direct references and keyword search)
//! - `orchestrator` - selection to batch job, batch execution
//! - `pool` - bounded worker slots with FIFO overflow
//! - `channel` - completion events from slots to the interactive consumer
//! - `playlist` - lazily populated playlist tree
//! - `session` - the interactive consumer tying it together

// Re-export core types for convenience
pub use tidaldl_core::{
    CatalogItem, CatalogPort, CompletionEmitterPort, CompletionEvent, ItemKind, ItemOutcome,
    JobError, JobId, JobState, PoolTaskFault, ResolveError, RetrievalError, RetrievalPort,
    SearchResult, Selection, SubmitError,
};

mod channel;
mod config;
mod orchestrator;
mod playlist;
mod pool;
mod resolver;
mod session;
mod telemetry;

pub use channel::{CompletionReceiver, CompletionSender, completion_channel};
pub use config::{MAX_WORKERS_ENV, PoolConfig};
pub use orchestrator::{JobHandle, JobOrchestrator, OrchestratorDeps, build_orchestrator};
pub use playlist::PlaylistBrowser;
pub use pool::{FaultHook, WorkerPool};
pub use resolver::{SearchResolver, extract_items, is_direct_reference};
pub use session::{
    BusyTracker, LookupId, ResultsUpdate, Session, SessionDeps, SessionError, SessionUpdate,
    SurfaceUpdate, TRIGGER_BUSY_LABEL, TRIGGER_IDLE_LABEL,
};
pub use telemetry::init_tracing;
