//! Catalog item kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of catalog entity the interactive surface can search for and retrieve.
///
/// This is a closed set: adding a kind is an exhaustiveness change in every
/// `match` over it (display extraction, search buckets, retrieval dispatch).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// First entry of the kind selector.
    #[default]
    Album,
    Playlist,
    Track,
    Video,
    Artist,
}

impl ItemKind {
    /// All supported kinds, in the order the kind selector lists them.
    pub const ALL: [Self; 5] = [
        Self::Album,
        Self::Playlist,
        Self::Track,
        Self::Video,
        Self::Artist,
    ];

    /// Display name of the kind (matches the selector labels).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Playlist => "Playlist",
            Self::Track => "Track",
            Self::Video => "Video",
            Self::Artist => "Artist",
        }
    }

    /// Whether results of this kind carry a quality column.
    #[must_use]
    pub const fn has_quality(&self) -> bool {
        matches!(self, Self::Album | Self::Track | Self::Video)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown item kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
