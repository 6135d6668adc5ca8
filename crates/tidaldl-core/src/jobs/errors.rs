//! Error types for resolution, submission and job execution.
//!
//! Resolver and submission errors are returned synchronously to the
//! interactive caller. Job errors never cross a worker slot boundary; they
//! are recorded as item outcomes and reported through completion events.

use thiserror::Error;

use crate::ports::CatalogError;

/// Errors from turning a query into a search result.
///
/// All variants are non-fatal: the caller reports them and keeps its
/// previous state.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The direct reference could not be resolved to an entity.
    #[error("Could not resolve '{reference}'")]
    ResolutionFailed {
        /// The reference as typed by the user.
        reference: String,
    },

    /// The reference points at a kind the surface cannot show.
    #[error("Type[{kind}] not supported")]
    UnsupportedKind {
        /// Kind name reported by the catalog.
        kind: String,
    },

    /// The query matched nothing.
    #[error("No results for '{query}'")]
    EmptyResult {
        /// The query that returned nothing.
        query: String,
    },

    /// The query was blank.
    #[error("Search text is empty")]
    EmptyQuery,

    /// Transport-level failure from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ResolveError {
    pub fn resolution_failed(reference: impl Into<String>) -> Self {
        Self::ResolutionFailed {
            reference: reference.into(),
        }
    }

    pub fn unsupported_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedKind { kind: kind.into() }
    }

    pub fn empty_result(query: impl Into<String>) -> Self {
        Self::EmptyResult {
            query: query.into(),
        }
    }

    /// Whether the surface should just show an empty list.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. } | Self::EmptyQuery)
    }
}

/// Synchronous rejection of a download trigger. No job is created.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please select a row first.")]
    EmptySelection,

    #[error("Selected row {index} is outside the current result ({len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure of one item inside a running batch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JobError {
    /// The retrieval collaborator reported an error or panicked.
    #[error("{message}")]
    RetrievalFailed {
        /// Display name of the item.
        item: String,
        /// Message shown in the log line.
        message: String,
    },
}

impl JobError {
    pub fn retrieval_failed(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RetrievalFailed {
            item: item.into(),
            message: message.into(),
        }
    }
}

/// A task panicked inside a worker slot.
///
/// The pool catches the panic at the slot boundary; the owner of the task
/// turns it into per-item failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("worker task faulted: {message}")]
pub struct PoolTaskFault {
    pub message: String,
}

impl PoolTaskFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Convert a panic payload into a fault.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_string());
        Self { message }
    }
}
