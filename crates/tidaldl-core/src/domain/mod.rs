//! Catalog domain types.
//!
//! Pure data: no I/O, no runtime. Everything a job needs is copied out of
//! these types at submission time.

pub mod catalog;
pub mod kind;
pub mod playlist;
pub mod search;

pub use catalog::{Album, Artist, CatalogItem, DisplayRow, Playlist, Track, Video};
pub use kind::{ItemKind, UnknownKind};
pub use playlist::PlaylistSummary;
pub use search::{SearchResult, Selection};
