//! Job identifiers, state and per-item outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::CatalogItem;

/// Identifier of one batch job.
///
/// Minted by the orchestrator from a monotonic counter; unique for the
/// lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Lifecycle state of a job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Submitted, waiting for a free pool slot.
    #[default]
    Queued,
    /// Items are being processed on a slot.
    Running,
    /// Every item has a terminal outcome.
    Completed,
}

impl JobState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

/// Terminal outcome of one item inside a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub item: CatalogItem,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemOutcome {
    #[must_use]
    pub const fn success(item: CatalogItem) -> Self {
        Self {
            item,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(item: CatalogItem, error: impl Into<String>) -> Self {
        Self {
            item,
            succeeded: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_display_and_order() {
        assert_eq!(JobId::new(7).to_string(), "job-7");
        assert!(JobId::new(1) < JobId::new(2));
    }

    #[test]
    fn default_state_is_queued() {
        assert_eq!(JobState::default(), JobState::Queued);
        assert_eq!(JobState::Completed.as_str(), "completed");
    }
}
