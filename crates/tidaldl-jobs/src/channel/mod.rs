//! Completion channel between worker slots and the interactive consumer.
//!
//! Many producers (one per running batch), exactly one consumer. Per-job
//! order is the send order of that job's slot; jobs interleave freely.

use tokio::sync::mpsc;

use tidaldl_core::{CompletionEmitterPort, CompletionEvent};

/// Create a connected sender/receiver pair.
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSender { tx }, CompletionReceiver { rx })
}

/// Producer half, safe to clone into any slot.
#[derive(Clone, Debug)]
pub struct CompletionSender {
    tx: mpsc::UnboundedSender<CompletionEvent>,
}

impl CompletionSender {
    /// Post an event. Never blocks; discards the event if the consumer is gone.
    pub fn send(&self, event: CompletionEvent) {
        if let Err(mpsc::error::SendError(event)) = self.tx.send(event) {
            tracing::debug!(
                target: "tidaldl.jobs",
                job_id = %event.job_id(),
                "Completion consumer gone, event discarded"
            );
        }
    }

    /// Whether the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl CompletionEmitterPort for CompletionSender {
    fn emit(&self, event: CompletionEvent) {
        self.send(event);
    }

    fn clone_box(&self) -> Box<dyn CompletionEmitterPort> {
        Box::new(self.clone())
    }
}

/// Consumer half, owned by the interactive context.
#[derive(Debug)]
pub struct CompletionReceiver {
    rx: mpsc::UnboundedReceiver<CompletionEvent>,
}

impl CompletionReceiver {
    /// Wait for the next event. `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<CompletionEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already waiting.
    pub fn try_recv(&mut self) -> Option<CompletionEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every event that is already waiting, in arrival order.
    pub fn drain(&mut self) -> Vec<CompletionEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidaldl_core::JobId;

    #[tokio::test]
    async fn events_arrive_in_send_order() {
        let (tx, mut rx) = completion_channel();
        tx.send(CompletionEvent::batch_done(JobId::new(1), 1, 0));
        tx.send(CompletionEvent::batch_done(JobId::new(2), 0, 1));

        assert_eq!(rx.recv().await.unwrap().job_id(), JobId::new(1));
        assert_eq!(rx.recv().await.unwrap().job_id(), JobId::new(2));
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn emitter_port_forwards_to_receiver() {
        let (tx, mut rx) = completion_channel();
        let emitter: Box<dyn CompletionEmitterPort> = tx.clone_box();
        emitter.emit(CompletionEvent::batch_done(JobId::new(7), 2, 0));

        let events = rx.drain();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_batch_done());
    }

    #[test]
    fn send_after_consumer_dropped_is_discarded() {
        let (tx, rx) = completion_channel();
        drop(rx);
        assert!(tx.is_closed());
        tx.send(CompletionEvent::batch_done(JobId::new(1), 0, 0));
    }

    #[tokio::test]
    async fn recv_ends_when_all_senders_dropped() {
        let (tx, mut rx) = completion_channel();
        drop(tx);
        assert!(rx.recv().await.is_none());
    }
}
