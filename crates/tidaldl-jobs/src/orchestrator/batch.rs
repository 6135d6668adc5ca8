//! Batch execution on a worker slot.
//!
//! The batch operates on value types and cloned `Arc` ports, with no access
//! to the orchestrator. Items run strictly one after another; each retrieval
//! call is isolated so a failure or panic becomes that item's outcome and
//! the loop moves on. Outcomes are kept in item order in the batch's
//! [`BatchProgress`], which only the batch and its fault hook write to.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use tokio::sync::watch;

use tidaldl_core::{
    CatalogItem, CompletionEmitterPort, CompletionEvent, ItemKind, ItemOutcome, JobError, JobId,
    JobState, PoolTaskFault, RetrievalPort,
};

/// Ports a batch needs while it runs.
#[derive(Clone)]
pub struct BatchDeps {
    pub retrieval: Arc<dyn RetrievalPort>,
    pub emitter: Arc<dyn CompletionEmitterPort>,
}

/// One submitted batch: a snapshot of the selected items plus its state.
#[derive(Clone)]
pub struct BatchJob {
    pub id: JobId,
    pub kind: ItemKind,
    pub items: Vec<CatalogItem>,
    pub state_tx: Arc<watch::Sender<JobState>>,
}

/// Per-item outcomes of one batch, shared with its fault hook.
#[derive(Debug, Default)]
pub struct BatchProgress {
    outcomes: Mutex<Vec<ItemOutcome>>,
    done_emitted: AtomicBool,
}

impl BatchProgress {
    fn lock(&self) -> MutexGuard<'_, Vec<ItemOutcome>> {
        // Nothing panics while holding the lock; a poisoned list is still whole.
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, outcome: ItemOutcome) {
        self.lock().push(outcome);
    }

    fn processed(&self) -> usize {
        self.lock().len()
    }

    fn counts(&self) -> (u32, u32) {
        let outcomes = self.lock();
        let succeeded = outcomes.iter().filter(|outcome| outcome.succeeded).count();
        (saturate(succeeded), saturate(outcomes.len() - succeeded))
    }

    /// Outcomes recorded so far, in item order.
    pub fn outcomes(&self) -> Vec<ItemOutcome> {
        self.lock().clone()
    }

    /// Claim the right to emit `BatchDone`. True exactly once.
    fn claim_done(&self) -> bool {
        !self.done_emitted.swap(true, Ordering::SeqCst)
    }
}

fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Counts reported with `BatchDone`, plus the outcomes behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: u32,
    pub failed: u32,
    pub outcomes: Vec<ItemOutcome>,
}

/// Run a batch to completion.
///
/// Emits one `ItemFinished` per item as soon as it is known, then exactly
/// one `BatchDone`, then marks the job completed.
pub async fn run_batch(job: BatchJob, deps: BatchDeps, progress: Arc<BatchProgress>) -> BatchSummary {
    let BatchJob {
        id,
        kind,
        items,
        state_tx,
    } = job;

    state_tx.send_replace(JobState::Running);
    tracing::debug!(target: "tidaldl.jobs", job_id = %id, %kind, items = items.len(), "Batch started");

    for item in items {
        let outcome = retrieve_one(id, kind, item, deps.retrieval.as_ref()).await;
        let event = CompletionEvent::item_finished(id, &outcome);
        progress.record(outcome);
        deps.emitter.emit(event);
    }

    finish(id, &progress, deps.emitter.as_ref(), &state_tx)
}

async fn retrieve_one(
    id: JobId,
    kind: ItemKind,
    item: CatalogItem,
    retrieval: &dyn RetrievalPort,
) -> ItemOutcome {
    let name = item.display_name().to_string();
    tracing::debug!(target: "tidaldl.jobs", job_id = %id, item = %name, "Retrieving item");

    let result = AssertUnwindSafe(retrieval.retrieve(kind, &item))
        .catch_unwind()
        .await;

    let error = match result {
        Ok(Ok(())) => return ItemOutcome::success(item),
        Ok(Err(e)) => JobError::retrieval_failed(&name, e.message),
        Err(payload) => {
            JobError::retrieval_failed(&name, PoolTaskFault::from_panic(payload.as_ref()).message)
        }
    };

    tracing::warn!(target: "tidaldl.jobs", job_id = %id, item = %name, error = %error, "Item failed");
    ItemOutcome::failure(item, error.to_string())
}

/// Report every item the batch never reached as failed, then close it.
///
/// Runs from the pool's fault hook when the batch task itself panicked.
pub fn report_fault(
    job: &BatchJob,
    emitter: &dyn CompletionEmitterPort,
    progress: &BatchProgress,
    fault: &PoolTaskFault,
) {
    let start = progress.processed();
    tracing::error!(
        target: "tidaldl.jobs",
        job_id = %job.id,
        remaining = job.items.len().saturating_sub(start),
        error = %fault,
        "Batch faulted"
    );

    for item in job.items.iter().skip(start) {
        let error = JobError::retrieval_failed(item.display_name(), fault.message.clone());
        let outcome = ItemOutcome::failure(item.clone(), error.to_string());
        let event = CompletionEvent::item_finished(job.id, &outcome);
        progress.record(outcome);
        emitter.emit(event);
    }

    finish(job.id, progress, emitter, &job.state_tx);
}

fn finish(
    id: JobId,
    progress: &BatchProgress,
    emitter: &dyn CompletionEmitterPort,
    state_tx: &watch::Sender<JobState>,
) -> BatchSummary {
    let (succeeded, failed) = progress.counts();
    if progress.claim_done() {
        emitter.emit(CompletionEvent::batch_done(id, succeeded, failed));
        tracing::info!(target: "tidaldl.jobs", job_id = %id, succeeded, failed, "Batch complete");
    }
    state_tx.send_replace(JobState::Completed);
    BatchSummary {
        succeeded,
        failed,
        outcomes: progress.outcomes(),
    }
}
