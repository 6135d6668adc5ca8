//! Playlist tree browsing.
//!
//! Top-level nodes are the user's playlists in catalog order. Tracks are
//! fetched the first time a playlist is expanded and cached until
//! [`PlaylistBrowser::refresh`]. The session shares one browser with its
//! lookup tasks; it never runs on the worker pool.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use tidaldl_core::{
    CatalogItem, CatalogPort, CatalogResult, ItemKind, PlaylistSummary, SearchResult, Track,
};

#[derive(Debug, Clone)]
struct PlaylistNode {
    summary: PlaylistSummary,
    /// `None` until the node has been expanded.
    tracks: Option<Vec<Track>>,
}

#[derive(Debug, Default)]
struct PlaylistTree {
    loaded: bool,
    nodes: IndexMap<String, PlaylistNode>,
}

/// Lazily populated view of the user's playlists.
pub struct PlaylistBrowser {
    catalog: Arc<dyn CatalogPort>,
    tree: RwLock<PlaylistTree>,
}

impl std::fmt::Debug for PlaylistBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistBrowser").finish_non_exhaustive()
    }
}

impl PlaylistBrowser {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self {
            catalog,
            tree: RwLock::new(PlaylistTree::default()),
        }
    }

    /// Top-level nodes, fetched once and then served from the cache.
    pub async fn list_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>> {
        {
            let tree = self.tree.read().await;
            if tree.loaded {
                return Ok(tree.nodes.values().map(|node| node.summary.clone()).collect());
            }
        }
        self.load().await
    }

    /// Drop every cached node and fetch the playlist list again.
    pub async fn refresh(&self) -> CatalogResult<Vec<PlaylistSummary>> {
        *self.tree.write().await = PlaylistTree::default();
        self.load().await
    }

    async fn load(&self) -> CatalogResult<Vec<PlaylistSummary>> {
        let playlists = self.catalog.list_playlists().await?;
        tracing::debug!(target: "tidaldl.jobs", count = playlists.len(), "Playlists loaded");

        let mut tree = self.tree.write().await;
        tree.nodes = playlists
            .iter()
            .map(|summary| {
                let node = PlaylistNode {
                    summary: summary.clone(),
                    tracks: None,
                };
                (summary.id.clone(), node)
            })
            .collect();
        tree.loaded = true;
        Ok(playlists)
    }

    /// Cached summary of one playlist.
    pub async fn summary(&self, playlist_id: &str) -> Option<PlaylistSummary> {
        self.tree
            .read()
            .await
            .nodes
            .get(playlist_id)
            .map(|node| node.summary.clone())
    }

    /// Tracks of one playlist as a `Track` result, fetched on first use.
    pub async fn list_tracks(&self, playlist_id: &str) -> CatalogResult<SearchResult> {
        let cached = self
            .tree
            .read()
            .await
            .nodes
            .get(playlist_id)
            .and_then(|node| node.tracks.clone());

        let tracks = match cached {
            Some(tracks) => tracks,
            None => {
                let tracks = self.catalog.list_playlist_tracks(playlist_id).await?;
                tracing::debug!(
                    target: "tidaldl.jobs",
                    playlist_id,
                    count = tracks.len(),
                    "Playlist expanded"
                );
                if let Some(node) = self.tree.write().await.nodes.get_mut(playlist_id) {
                    node.tracks = Some(tracks.clone());
                }
                tracks
            }
        };

        Ok(SearchResult::new(
            ItemKind::Track,
            tracks.into_iter().map(CatalogItem::Track).collect(),
        ))
    }
}
