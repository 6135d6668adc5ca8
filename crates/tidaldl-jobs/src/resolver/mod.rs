//! Query resolution.
//!
//! A query is either a direct reference (a share URL) that resolves to one
//! entity, or search text that yields the entity list for the selected kind.

use std::sync::Arc;

use tidaldl_core::{
    CatalogError, CatalogItem, CatalogPort, DEFAULT_SEARCH_LIMIT, ItemKind, ReferenceTarget,
    ResolveError, SearchPage, SearchResult,
};

/// Prefix that marks a query as a direct reference.
const REFERENCE_PREFIX: &str = "http";

/// Whether a (trimmed) query should be treated as a direct reference.
pub fn is_direct_reference(query: &str) -> bool {
    query.trim().starts_with(REFERENCE_PREFIX)
}

/// Pick the bucket for `kind` out of a raw search page.
pub fn extract_items(page: SearchPage, kind: ItemKind) -> Vec<CatalogItem> {
    match kind {
        ItemKind::Album => page.albums.into_iter().map(CatalogItem::Album).collect(),
        ItemKind::Playlist => page.playlists.into_iter().map(CatalogItem::Playlist).collect(),
        ItemKind::Track => page.tracks.into_iter().map(CatalogItem::Track).collect(),
        ItemKind::Video => page.videos.into_iter().map(CatalogItem::Video).collect(),
        ItemKind::Artist => page.artists.into_iter().map(CatalogItem::Artist).collect(),
    }
}

/// Resolves queries against the catalog.
#[derive(Clone)]
pub struct SearchResolver {
    catalog: Arc<dyn CatalogPort>,
    search_limit: u32,
}

impl std::fmt::Debug for SearchResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchResolver")
            .field("search_limit", &self.search_limit)
            .finish_non_exhaustive()
    }
}

impl SearchResolver {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self {
            catalog,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Entries requested per search bucket.
    #[must_use]
    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    pub const fn search_limit(&self) -> u32 {
        self.search_limit
    }

    /// Resolve a query for the selected kind.
    ///
    /// For a direct reference the returned result carries the resolved kind,
    /// which may differ from `kind`.
    ///
    /// # Errors
    ///
    /// See [`ResolveError`]. Every variant leaves the caller's state untouched.
    pub async fn resolve(&self, query: &str, kind: ItemKind) -> Result<SearchResult, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        if is_direct_reference(query) {
            return self.resolve_reference(query).await;
        }

        tracing::debug!(target: "tidaldl.jobs", %kind, limit = self.search_limit, "Searching catalog");
        let page = self.catalog.search(query, kind, self.search_limit).await?;
        let items = extract_items(page, kind);
        if items.is_empty() {
            return Err(ResolveError::empty_result(query));
        }

        Ok(SearchResult::new(kind, items))
    }

    async fn resolve_reference(&self, reference: &str) -> Result<SearchResult, ResolveError> {
        let Some(parsed) = self.catalog.parse_reference(reference).await? else {
            return Err(ResolveError::resolution_failed(reference));
        };

        let kind = match parsed.target {
            ReferenceTarget::Item(kind) => kind,
            ReferenceTarget::Unsupported(name) => {
                tracing::debug!(target: "tidaldl.jobs", kind = %name, "Reference kind not supported");
                return Err(ResolveError::unsupported_kind(name));
            }
        };

        match self.catalog.lookup(kind, &parsed.id).await {
            Ok(Some(item)) => Ok(SearchResult::single(item)),
            Ok(None) | Err(CatalogError::NotFound { .. }) => {
                Err(ResolveError::resolution_failed(reference))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tidaldl_core::{Album, Artist, CatalogResult, ParsedReference, PlaylistSummary, Track, Video};

    /// Catalog answering from fixed data.
    #[derive(Default)]
    struct FixedCatalog {
        page: SearchPage,
        video: Option<Video>,
    }

    #[async_trait]
    impl CatalogPort for FixedCatalog {
        async fn search(&self, _text: &str, _kind: ItemKind, limit: u32) -> CatalogResult<SearchPage> {
            let mut page = self.page.clone();
            page.artists.truncate(limit as usize);
            Ok(page)
        }

        async fn parse_reference(&self, reference: &str) -> CatalogResult<Option<ParsedReference>> {
            let mut parts = reference.rsplit('/');
            let id = parts.next().unwrap_or_default().to_string();
            let target = match parts.next() {
                Some("video") => ReferenceTarget::Item(ItemKind::Video),
                Some("mix") => ReferenceTarget::Unsupported("Mix".to_string()),
                _ => return Ok(None),
            };
            Ok(Some(ParsedReference { target, id }))
        }

        async fn lookup(&self, kind: ItemKind, id: &str) -> CatalogResult<Option<CatalogItem>> {
            Ok(match (kind, &self.video) {
                (ItemKind::Video, Some(video)) if video.id == id => {
                    Some(CatalogItem::Video(video.clone()))
                }
                _ => None,
            })
        }

        async fn list_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>> {
            Ok(Vec::new())
        }

        async fn list_playlist_tracks(&self, _playlist_id: &str) -> CatalogResult<Vec<Track>> {
            Ok(Vec::new())
        }
    }

    fn resolver(catalog: FixedCatalog) -> SearchResolver {
        SearchResolver::new(Arc::new(catalog))
    }

    fn video() -> Video {
        Video {
            id: "123".to_string(),
            title: "Live at Wembley".to_string(),
            artists: vec!["Queen".to_string()],
            quality: "MP4_1080P".to_string(),
        }
    }

    #[test]
    fn direct_reference_detection() {
        assert!(is_direct_reference("https://tidal.com/browse/video/123"));
        assert!(is_direct_reference("  http://x"));
        assert!(!is_direct_reference("daft punk"));
        assert!(!is_direct_reference("HTTP://upper"));
    }

    #[test]
    fn extract_picks_only_the_selected_bucket() {
        let page = SearchPage {
            albums: vec![Album {
                id: "a1".to_string(),
                title: "Discovery".to_string(),
                artists: vec!["Daft Punk".to_string()],
                audio_quality: "LOSSLESS".to_string(),
                track_count: 14,
            }],
            artists: vec![Artist {
                id: "ar1".to_string(),
                name: "Daft Punk".to_string(),
            }],
            ..Default::default()
        };

        let albums = extract_items(page.clone(), ItemKind::Album);
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].kind(), ItemKind::Album);
        assert!(extract_items(page, ItemKind::Video).is_empty());
    }

    #[tokio::test]
    async fn video_reference_yields_single_video_result() {
        let resolver = resolver(FixedCatalog {
            video: Some(video()),
            ..Default::default()
        });

        let result = resolver
            .resolve("https://tidal.com/browse/video/123", ItemKind::Track)
            .await
            .unwrap();

        assert_eq!(result.kind(), ItemKind::Video);
        assert_eq!(result.len(), 1);
        assert_eq!(result.items()[0].display_name(), "Live at Wembley");
    }

    #[tokio::test]
    async fn resolving_same_reference_twice_is_idempotent() {
        let resolver = resolver(FixedCatalog {
            video: Some(video()),
            ..Default::default()
        });
        let url = "https://tidal.com/browse/video/123";

        let first = resolver.resolve(url, ItemKind::Album).await.unwrap();
        let second = resolver.resolve(url, ItemKind::Album).await.unwrap();

        assert_eq!(first.items()[0].id(), second.items()[0].id());
        assert_eq!(first.items()[0].display_name(), second.items()[0].display_name());
    }

    #[tokio::test]
    async fn unsupported_reference_kind_is_reported() {
        let err = resolver(FixedCatalog::default())
            .resolve("https://tidal.com/browse/mix/0042", ItemKind::Track)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::UnsupportedKind { ref kind } if kind == "Mix"));
        assert_eq!(err.to_string(), "Type[Mix] not supported");
    }

    #[tokio::test]
    async fn unknown_or_missing_reference_fails_resolution() {
        let resolver = resolver(FixedCatalog::default());

        let unknown = resolver.resolve("https://example.com", ItemKind::Track).await;
        assert!(matches!(unknown, Err(ResolveError::ResolutionFailed { .. })));

        let missing = resolver
            .resolve("https://tidal.com/browse/video/999", ItemKind::Track)
            .await;
        assert!(matches!(missing, Err(ResolveError::ResolutionFailed { .. })));
    }

    #[tokio::test]
    async fn keyword_search_respects_limit_and_order() {
        let artists = ["A", "B", "C"]
            .iter()
            .map(|name| Artist {
                id: name.to_lowercase(),
                name: (*name).to_string(),
            })
            .collect();
        let resolver = resolver(FixedCatalog {
            page: SearchPage {
                artists,
                ..Default::default()
            },
            ..Default::default()
        })
        .with_search_limit(2);

        let result = resolver.resolve("someone", ItemKind::Artist).await.unwrap();

        let names: Vec<_> = result.items().iter().map(CatalogItem::display_name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn empty_results_and_blank_queries_are_reported() {
        let resolver = resolver(FixedCatalog::default());

        let empty = resolver.resolve("nothing", ItemKind::Album).await.unwrap_err();
        assert!(empty.is_empty_result());

        let blank = resolver.resolve("   ", ItemKind::Album).await.unwrap_err();
        assert!(matches!(blank, ResolveError::EmptyQuery));
    }
}
