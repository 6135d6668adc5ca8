//! Playlist tree entries.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogItem, Playlist};

/// Top-level node of the playlist tree (`Name`, `# Tracks`, hidden id).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub track_count: u32,
}

impl PlaylistSummary {
    /// Catalog item used when the whole playlist is submitted as one job.
    #[must_use]
    pub fn to_item(&self) -> CatalogItem {
        CatalogItem::Playlist(Playlist {
            id: self.id.clone(),
            title: self.name.clone(),
            track_count: self.track_count,
        })
    }
}
