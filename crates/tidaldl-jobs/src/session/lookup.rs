//! Catalog lookups started by the session.
//!
//! Searches and playlist loads run on their own tokio tasks and report back
//! over an unbounded channel that only the session reads. The session applies
//! a reply when it consumes it, so the current result is only ever written on
//! the consumer side.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use tokio::sync::mpsc;

use tidaldl_core::{CatalogResult, ItemKind, PlaylistSummary, SearchResult};

use super::SessionError;

/// Identifies one search or playlist load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LookupId(u64);

impl LookupId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for LookupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup-{}", self.0)
    }
}

pub(super) enum LookupBody {
    /// Rows that replace the current result. `kind` is the kind the lookup
    /// was started for.
    Results {
        kind: ItemKind,
        result: Result<SearchResult, SessionError>,
    },
    Playlists(CatalogResult<Vec<PlaylistSummary>>),
}

pub(super) struct LookupReply {
    pub lookup: LookupId,
    pub body: LookupBody,
}

pub(super) type LookupSender = mpsc::UnboundedSender<LookupReply>;
pub(super) type LookupReceiver = mpsc::UnboundedReceiver<LookupReply>;

/// Run `work` on its own task and post its reply for the session.
pub(super) fn spawn_lookup<F>(tx: &LookupSender, lookup: LookupId, work: F)
where
    F: Future<Output = LookupBody> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let body = work.await;
        if tx.send(LookupReply { lookup, body }).is_err() {
            tracing::debug!(target: "tidaldl.jobs", %lookup, "Session gone, lookup discarded");
        }
    });
}

/// Outcome of a search or playlist expansion, as seen by the surface.
#[derive(Debug)]
pub struct ResultsUpdate {
    pub lookup: LookupId,
    /// False when a newer lookup was started first; the current result is
    /// left alone in that case.
    pub applied: bool,
    /// Number of rows found, or why there are none.
    pub outcome: Result<usize, SessionError>,
}
