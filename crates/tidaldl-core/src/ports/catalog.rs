//! Catalog client port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Album, Artist, CatalogItem, ItemKind, Playlist, PlaylistSummary, Track, Video};

/// Errors from catalog operations.
///
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested entity does not exist.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Invalid response from the API.
    #[error("Invalid API response: {message}")]
    InvalidResponse { message: String },

    /// Session expired or missing.
    #[error("Login required")]
    AuthRequired,
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Raw keyword search response, one bucket per kind.
///
/// The catalog searches every bucket at once; the resolver picks the bucket
/// for the kind the user selected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPage {
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub playlists: Vec<Playlist>,
    pub tracks: Vec<Track>,
    pub videos: Vec<Video>,
}

/// What a direct reference points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// A kind the interactive surface supports.
    Item(ItemKind),
    /// A recognized catalog type outside the supported set (e.g. `Mix`).
    Unsupported(String),
}

/// A direct reference split into its target kind and catalog id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedReference {
    pub target: ReferenceTarget,
    pub id: String,
}

/// Port trait for the remote catalog.
///
/// # Design
///
/// - Uses core-owned DTOs, not wire types
/// - `Ok(None)` means "not found", errors mean the call itself failed
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Keyword search for `kind`, at most `limit` entries per bucket.
    async fn search(&self, text: &str, kind: ItemKind, limit: u32) -> CatalogResult<SearchPage>;

    /// Parse a direct reference (share URL). `None` if it is not a catalog URL.
    async fn parse_reference(&self, reference: &str) -> CatalogResult<Option<ParsedReference>>;

    /// Fetch a single entity by kind and id.
    async fn lookup(&self, kind: ItemKind, id: &str) -> CatalogResult<Option<CatalogItem>>;

    /// Playlists of the logged-in user.
    async fn list_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>>;

    /// Tracks of one playlist, in playlist order.
    async fn list_playlist_tracks(&self, playlist_id: &str) -> CatalogResult<Vec<Track>>;
}
