//! Retrieval port - performs the actual transfer of one catalog item.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CatalogItem, ItemKind};

/// Error reported by the retrieval collaborator for one item.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RetrievalError {
    pub message: String,
}

impl RetrievalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RetrievalError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Port for retrieving one item of a given kind.
///
/// Called sequentially for the items of a batch on a worker slot.
/// Implementations may block for long periods; they are never invoked on
/// the interactive context.
#[async_trait]
pub trait RetrievalPort: Send + Sync {
    async fn retrieve(&self, kind: ItemKind, item: &CatalogItem) -> Result<(), RetrievalError>;
}
