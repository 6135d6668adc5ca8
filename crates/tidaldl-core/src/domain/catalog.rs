//! Resolved catalog entities.
//!
//! A [`CatalogItem`] is immutable once the catalog has resolved it. Jobs hold
//! their own copies, so a later search never touches a running batch.

use serde::{Deserialize, Serialize};

use super::kind::ItemKind;

/// A single track.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    /// Audio quality label as reported by the catalog (e.g. `LOSSLESS`).
    pub audio_quality: String,
    pub duration_secs: u32,
}

/// An album.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub audio_quality: String,
    pub track_count: u32,
}

/// A music video.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    /// Video quality label (e.g. `MP4_1080P`).
    pub quality: String,
}

/// A user or editorial playlist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist UUID.
    pub id: String,
    pub title: String,
    pub track_count: u32,
}

/// An artist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// Tagged union over every entity the catalog can resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    Track(Track),
    Album(Album),
    Video(Video),
    Playlist(Playlist),
    Artist(Artist),
}

impl CatalogItem {
    /// The kind of this item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Track(_) => ItemKind::Track,
            Self::Album(_) => ItemKind::Album,
            Self::Video(_) => ItemKind::Video,
            Self::Playlist(_) => ItemKind::Playlist,
            Self::Artist(_) => ItemKind::Artist,
        }
    }

    /// Catalog identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Track(t) => &t.id,
            Self::Album(a) => &a.id,
            Self::Video(v) => &v.id,
            Self::Playlist(p) => &p.id,
            Self::Artist(a) => &a.id,
        }
    }

    /// Name shown in tables and log lines: the title, or the name for artists.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Track(t) => &t.title,
            Self::Album(a) => &a.title,
            Self::Video(v) => &v.title,
            Self::Playlist(p) => &p.title,
            Self::Artist(a) => &a.name,
        }
    }

    /// Build the table row for this item at the given 1-based position.
    ///
    /// Album and track rows expose artists and audio quality, video rows
    /// expose artists and video quality, playlist and artist rows only
    /// carry a name.
    #[must_use]
    pub fn display_row(&self, position: usize) -> DisplayRow {
        let (artists, quality) = match self {
            Self::Track(t) => (join_artists(&t.artists), t.audio_quality.as_str()),
            Self::Album(a) => (join_artists(&a.artists), a.audio_quality.as_str()),
            Self::Video(v) => (join_artists(&v.artists), v.quality.as_str()),
            Self::Playlist(_) | Self::Artist(_) => (String::new(), ""),
        };
        let quality = if self.kind().has_quality() {
            quality.to_string()
        } else {
            String::new()
        };

        DisplayRow {
            position,
            title: self.display_name().to_string(),
            artists,
            quality,
        }
    }
}

fn join_artists(artists: &[String]) -> String {
    artists.join(", ")
}

/// One row of the results table (`#`, `Title`, `Artists`, `Quality`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub position: usize,
    pub title: String,
    pub artists: String,
    pub quality: String,
}
