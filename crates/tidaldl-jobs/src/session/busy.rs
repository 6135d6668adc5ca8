//! Job-indexed busy state.

use std::collections::HashSet;

use tidaldl_core::JobId;

/// Set of jobs whose `BatchDone` has not been consumed yet.
///
/// The trigger is busy while the set is non-empty. Finishing a job that is
/// not tracked is a no-op, so the state can never go negative or get stuck
/// on a duplicate event.
#[derive(Debug, Default, Clone)]
pub struct BusyTracker {
    in_flight: HashSet<JobId>,
}

impl BusyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted job.
    pub fn begin(&mut self, job_id: JobId) {
        self.in_flight.insert(job_id);
    }

    /// Record a consumed `BatchDone`. Returns whether the job was tracked.
    pub fn finish(&mut self, job_id: JobId) -> bool {
        self.in_flight.remove(&job_id)
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Jobs still in flight.
    pub fn count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_only_after_every_job_finishes() {
        let mut busy = BusyTracker::new();
        busy.begin(JobId::new(1));
        busy.begin(JobId::new(2));

        assert!(busy.finish(JobId::new(1)));
        assert!(busy.is_busy());
        assert!(busy.finish(JobId::new(2)));
        assert!(!busy.is_busy());
    }

    #[test]
    fn unknown_or_repeated_finish_is_ignored() {
        let mut busy = BusyTracker::new();
        assert!(!busy.finish(JobId::new(9)));

        busy.begin(JobId::new(1));
        busy.finish(JobId::new(1));
        assert!(!busy.finish(JobId::new(1)));
        assert_eq!(busy.count(), 0);
    }
}
