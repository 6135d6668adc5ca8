//! Completion events - discriminated union delivered to the interactive consumer.

use serde::{Deserialize, Serialize};

use super::types::{ItemOutcome, JobId};

/// Event produced on a worker slot and consumed on the interactive side.
///
/// A job emits one `ItemFinished` per item, in item order, followed by
/// exactly one `BatchDone`. Events from different jobs interleave freely.
///
/// ```text
/// type CompletionEvent =
///   | { type: "item_finished"; job_id: number; display_name: string; succeeded: boolean; error?: string }
///   | { type: "batch_done"; job_id: number; succeeded: number; failed: number };
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionEvent {
    /// One item reached a terminal outcome.
    ItemFinished {
        job_id: JobId,
        display_name: String,
        succeeded: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Every item of the batch has been processed.
    BatchDone {
        job_id: JobId,
        succeeded: u32,
        failed: u32,
    },
}

impl CompletionEvent {
    /// Build the per-item event for an outcome.
    #[must_use]
    pub fn item_finished(job_id: JobId, outcome: &ItemOutcome) -> Self {
        Self::ItemFinished {
            job_id,
            display_name: outcome.item.display_name().to_string(),
            succeeded: outcome.succeeded,
            error: outcome.error.clone(),
        }
    }

    #[must_use]
    pub const fn batch_done(job_id: JobId, succeeded: u32, failed: u32) -> Self {
        Self::BatchDone {
            job_id,
            succeeded,
            failed,
        }
    }

    /// Job that produced this event.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        match self {
            Self::ItemFinished { job_id, .. } | Self::BatchDone { job_id, .. } => *job_id,
        }
    }

    #[must_use]
    pub const fn is_batch_done(&self) -> bool {
        matches!(self, Self::BatchDone { .. })
    }

    /// Log line shown to the user, `None` for batch-level events.
    ///
    /// `Download '<name>' finished.` or `Download '<name>' failed: <message>.`
    #[must_use]
    pub fn log_line(&self) -> Option<String> {
        match self {
            Self::ItemFinished {
                display_name,
                succeeded: true,
                ..
            } => Some(format!("Download '{display_name}' finished.")),
            Self::ItemFinished {
                display_name,
                error,
                ..
            } => {
                let message = error.as_deref().unwrap_or("unknown error");
                let stop = if message.ends_with('.') { "" } else { "." };
                Some(format!("Download '{display_name}' failed: {message}{stop}"))
            }
            Self::BatchDone { .. } => None,
        }
    }
}
