//! Completion event emitter port.
//!
//! This port abstracts event delivery so the orchestrator can report item
//! and batch completion without knowing the channel behind it.

use std::sync::{Arc, Mutex};

use crate::jobs::CompletionEvent;

/// Port for emitting completion events from worker slots.
///
/// Implementations must be callable from any slot concurrently and must
/// not block.
pub trait CompletionEmitterPort: Send + Sync {
    /// Emit a completion event.
    fn emit(&self, event: CompletionEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn CompletionEmitterPort>;
}

/// A no-op emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopCompletionEmitter;

impl NoopCompletionEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CompletionEmitterPort for NoopCompletionEmitter {
    fn emit(&self, _event: CompletionEvent) {}

    fn clone_box(&self) -> Box<dyn CompletionEmitterPort> {
        Box::new(self.clone())
    }
}

/// Emitter that records every event in memory.
///
/// Useful for asserting exact event sequences without a consumer loop.
#[derive(Debug, Clone, Default)]
pub struct RecordingCompletionEmitter {
    events: Arc<Mutex<Vec<CompletionEvent>>>,
}

impl RecordingCompletionEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far, in emission order.
    pub fn events(&self) -> Vec<CompletionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl CompletionEmitterPort for RecordingCompletionEmitter {
    fn emit(&self, event: CompletionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn clone_box(&self) -> Box<dyn CompletionEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobId;

    #[test]
    fn test_noop_emitter() {
        let emitter: Arc<dyn CompletionEmitterPort> = Arc::new(NoopCompletionEmitter::new());
        emitter.emit(CompletionEvent::batch_done(JobId::new(1), 0, 0));
        let _boxed = emitter.clone_box();
    }

    #[test]
    fn recording_emitter_shares_log_across_clones() {
        let emitter = RecordingCompletionEmitter::new();
        let boxed = emitter.clone_box();
        boxed.emit(CompletionEvent::batch_done(JobId::new(1), 1, 0));
        emitter.emit(CompletionEvent::batch_done(JobId::new(2), 0, 1));

        let events = emitter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].job_id(), JobId::new(1));
    }
}
