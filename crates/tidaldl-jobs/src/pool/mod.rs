//! Bounded background worker pool.
//!
//! # Concurrency Model
//!
//! - `execute` pushes onto an unbounded channel: O(1), never blocks, never
//!   runs the task on the caller
//! - A single dispatcher drains the channel in submission order and waits
//!   for a semaphore permit before spawning each task, so overflow is FIFO
//! - Each task runs in its own tokio task holding one permit (one slot)
//! - Panics are caught at the slot boundary and handed to the task's fault
//!   hook; the dispatcher and other slots are unaffected

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::FutureExt;
use tokio::sync::{Semaphore, mpsc};

use tidaldl_core::PoolTaskFault;

use crate::config::PoolConfig;

type BoxTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Callback invoked on a worker slot when its task panics.
pub type FaultHook = Box<dyn FnOnce(PoolTaskFault) + Send + 'static>;

/// A task waiting for a slot.
struct PoolTask {
    seq: u64,
    future: BoxTask,
    on_fault: Option<FaultHook>,
}

/// Counters shared between the pool handle, the dispatcher and the slots.
struct PoolState {
    slots: Arc<Semaphore>,
    max_concurrency: usize,
    queued: AtomicUsize,
    active: AtomicUsize,
    next_seq: AtomicU64,
}

/// Bounded pool of background execution slots.
///
/// Cloning the pool yields another handle onto the same slots. The
/// dispatcher stops once every handle is dropped and the backlog is empty.
#[derive(Clone)]
pub struct WorkerPool {
    tx: mpsc::UnboundedSender<PoolTask>,
    state: Arc<PoolState>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_concurrency", &self.state.max_concurrency)
            .field("active", &self.active())
            .field("queued", &self.queued())
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool and start its dispatcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: PoolConfig) -> Self {
        let max_concurrency = config.max_concurrency.max(1);
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(PoolState {
            slots: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            queued: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            next_seq: AtomicU64::new(0),
        });

        tokio::spawn(run_dispatcher(rx, Arc::clone(&state)));

        tracing::info!(
            target: "tidaldl.pool",
            max_concurrency,
            "Multithreading with maximum {max_concurrency} slots"
        );

        Self { tx, state }
    }

    /// Schedule a task on the next free slot.
    pub fn execute<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.enqueue(Box::pin(task), None);
    }

    /// Schedule a task with a hook that runs if the task panics.
    pub fn execute_with_fault_hook<F, H>(&self, task: F, on_fault: H)
    where
        F: Future<Output = ()> + Send + 'static,
        H: FnOnce(PoolTaskFault) + Send + 'static,
    {
        self.enqueue(Box::pin(task), Some(Box::new(on_fault)));
    }

    fn enqueue(&self, future: BoxTask, on_fault: Option<FaultHook>) {
        let seq = self.state.next_seq.fetch_add(1, Ordering::Relaxed);
        self.state.queued.fetch_add(1, Ordering::SeqCst);

        if let Err(mpsc::error::SendError(task)) = self.tx.send(PoolTask {
            seq,
            future,
            on_fault,
        }) {
            // Dispatcher is gone (runtime shutting down): report instead of dropping silently.
            self.state.queued.fetch_sub(1, Ordering::SeqCst);
            tracing::error!(target: "tidaldl.pool", seq, "Worker pool dispatcher stopped; task rejected");
            if let Some(hook) = task.on_fault {
                hook(PoolTaskFault::new("worker pool is shut down"));
            }
            return;
        }

        tracing::trace!(target: "tidaldl.pool", seq, "Task queued");
    }

    /// Configured slot count.
    pub fn max_concurrency(&self) -> usize {
        self.state.max_concurrency
    }

    /// Tasks currently occupying a slot.
    pub fn active(&self) -> usize {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Tasks waiting for a slot.
    pub fn queued(&self) -> usize {
        self.state.queued.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        self.active() == 0 && self.queued() == 0
    }
}

/// Drain submitted tasks in order, one permit per task.
async fn run_dispatcher(mut rx: mpsc::UnboundedReceiver<PoolTask>, state: Arc<PoolState>) {
    while let Some(task) = rx.recv().await {
        let Ok(permit) = Arc::clone(&state.slots).acquire_owned().await else {
            tracing::error!(target: "tidaldl.pool", "Slot semaphore closed; dispatcher exiting");
            break;
        };

        state.queued.fetch_sub(1, Ordering::SeqCst);
        state.active.fetch_add(1, Ordering::SeqCst);

        let PoolTask {
            seq,
            future,
            on_fault,
        } = task;
        let slot_state = Arc::clone(&state);

        tokio::spawn(async move {
            let _permit = permit;
            tracing::trace!(target: "tidaldl.pool", seq, "Task started");

            let outcome = AssertUnwindSafe(future).catch_unwind().await;
            slot_state.active.fetch_sub(1, Ordering::SeqCst);

            if let Err(payload) = outcome {
                let fault = PoolTaskFault::from_panic(payload.as_ref());
                tracing::error!(
                    target: "tidaldl.pool",
                    seq,
                    error = %fault,
                    "Worker task panicked"
                );
                if let Some(hook) = on_fault {
                    hook(fault);
                }
            }
        });
    }

    tracing::debug!(target: "tidaldl.pool", "Worker pool dispatcher stopped");
}
