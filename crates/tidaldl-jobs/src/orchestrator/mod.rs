//! Job orchestration.
//!
//! Turns a selection into one batch job, hands it to the worker pool and
//! returns immediately. Outcomes flow back only through the completion
//! emitter; the caller never waits on a job.
//!
//! # Design
//!
//! - Job ids come from a monotonic counter owned by the orchestrator
//! - Items are copied out of the search result at submission, so a later
//!   search never affects a running batch
//! - Each job carries a `watch` channel for its lifecycle state
//! - Per-item outcomes stay with the job; handles can only read them

mod batch;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use tidaldl_core::{
    CatalogItem, CompletionEmitterPort, ItemKind, ItemOutcome, JobId, JobState, RetrievalPort,
    SearchResult, Selection, SubmitError,
};

use crate::pool::WorkerPool;

use batch::{BatchDeps, BatchJob, BatchProgress, report_fault, run_batch};

/// Dependencies for building a [`JobOrchestrator`].
pub struct OrchestratorDeps<R, E>
where
    R: RetrievalPort + 'static,
    E: CompletionEmitterPort + 'static,
{
    /// Port performing the actual media retrieval.
    pub retrieval: Arc<R>,
    /// Port receiving completion events (usually a `CompletionSender`).
    pub emitter: Arc<E>,
    /// Pool the batches run on.
    pub pool: WorkerPool,
}

/// Build an orchestrator from its dependencies.
pub fn build_orchestrator<R, E>(deps: OrchestratorDeps<R, E>) -> JobOrchestrator
where
    R: RetrievalPort + 'static,
    E: CompletionEmitterPort + 'static,
{
    JobOrchestrator::new(deps.retrieval, deps.emitter, deps.pool)
}

/// Handle to a submitted job.
///
/// Dropping the handle does not affect the job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: JobId,
    kind: ItemKind,
    item_count: usize,
    state_rx: watch::Receiver<JobState>,
    progress: Arc<BatchProgress>,
}

impl JobHandle {
    pub const fn id(&self) -> JobId {
        self.id
    }

    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        *self.state_rx.borrow()
    }

    /// Outcomes of the items finished so far, in item order.
    pub fn outcomes(&self) -> Vec<ItemOutcome> {
        self.progress.outcomes()
    }

    /// Wait until the job has emitted its `BatchDone`.
    pub async fn completed(&mut self) {
        // The sender lives in the batch task; if it is gone the job is over either way.
        let _ = self
            .state_rx
            .wait_for(|state| *state == JobState::Completed)
            .await;
    }
}

/// Submits batches to the worker pool.
pub struct JobOrchestrator {
    pool: WorkerPool,
    retrieval: Arc<dyn RetrievalPort>,
    emitter: Arc<dyn CompletionEmitterPort>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for JobOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobOrchestrator")
            .field("pool", &self.pool)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl JobOrchestrator {
    pub fn new(
        retrieval: Arc<dyn RetrievalPort>,
        emitter: Arc<dyn CompletionEmitterPort>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            pool,
            retrieval,
            emitter,
            next_id: AtomicU64::new(1),
        }
    }

    pub const fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Submit the selected rows of a result as one batch.
    ///
    /// # Errors
    ///
    /// `EmptySelection` when nothing is selected, `IndexOutOfRange` when a
    /// selected row is not part of `result`. No job is created in either case.
    pub fn submit(
        &self,
        selection: &Selection,
        result: &SearchResult,
    ) -> Result<JobHandle, SubmitError> {
        if selection.is_empty() {
            return Err(SubmitError::EmptySelection);
        }
        let items = selection
            .snapshot(result)
            .map_err(|index| SubmitError::IndexOutOfRange {
                index,
                len: result.len(),
            })?;
        self.submit_items(result.kind(), items)
    }

    /// Submit already-resolved items as one batch.
    ///
    /// # Errors
    ///
    /// `EmptySelection` when `items` is empty.
    pub fn submit_items(
        &self,
        kind: ItemKind,
        items: Vec<CatalogItem>,
    ) -> Result<JobHandle, SubmitError> {
        if items.is_empty() {
            return Err(SubmitError::EmptySelection);
        }
        Ok(self.spawn_job(kind, items))
    }

    /// Submit one item on its own (the playlist tree path).
    pub fn submit_single(&self, item: CatalogItem) -> JobHandle {
        self.spawn_job(item.kind(), vec![item])
    }

    fn spawn_job(&self, kind: ItemKind, items: Vec<CatalogItem>) -> JobHandle {
        let id = JobId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (state_tx, state_rx) = watch::channel(JobState::Queued);
        let item_count = items.len();

        let job = BatchJob {
            id,
            kind,
            items,
            state_tx: Arc::new(state_tx),
        };
        let deps = BatchDeps {
            retrieval: Arc::clone(&self.retrieval),
            emitter: Arc::clone(&self.emitter),
        };
        let progress = Arc::new(BatchProgress::default());

        let fault_job = job.clone();
        let fault_emitter = Arc::clone(&self.emitter);
        let fault_progress = Arc::clone(&progress);
        let handle_progress = Arc::clone(&progress);

        self.pool.execute_with_fault_hook(
            async move {
                run_batch(job, deps, progress).await;
            },
            move |fault| {
                report_fault(&fault_job, fault_emitter.as_ref(), &fault_progress, &fault);
            },
        );

        tracing::info!(target: "tidaldl.jobs", job_id = %id, %kind, items = item_count, "Job submitted");

        JobHandle {
            id,
            kind,
            item_count,
            state_rx,
            progress: handle_progress,
        }
    }
}
