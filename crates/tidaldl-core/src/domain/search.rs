//! Search results and selections.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogItem, DisplayRow};
use super::kind::ItemKind;

/// Ordered result of a query; insertion order is display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    kind: ItemKind,
    items: Vec<CatalogItem>,
}

impl SearchResult {
    /// Create a result for the searched kind.
    #[must_use]
    pub const fn new(kind: ItemKind, items: Vec<CatalogItem>) -> Self {
        Self { kind, items }
    }

    /// Empty result for a kind (what the table shows before any search).
    #[must_use]
    pub const fn empty(kind: ItemKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Single-element result for a resolved direct reference.
    #[must_use]
    pub fn single(item: CatalogItem) -> Self {
        Self::new(item.kind(), vec![item])
    }

    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Table rows in display order (positions are 1-based).
    pub fn rows(&self) -> Vec<DisplayRow> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| item.display_row(index + 1))
            .collect()
    }
}

/// Row indices selected in the current [`SearchResult`] at trigger time.
///
/// Duplicates collapse onto their first occurrence; otherwise the given
/// order is kept. Validation against a result happens at submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Build a selection from row indices.
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut unique = Vec::new();
        for index in indices {
            if !unique.contains(&index) {
                unique.push(index);
            }
        }
        Self { indices: unique }
    }

    /// Select every row of a result (the select-all shortcut).
    #[must_use]
    pub fn all(result: &SearchResult) -> Self {
        Self::new(0..result.len())
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Copy the selected items out of a result.
    ///
    /// Returns the first out-of-range index on failure.
    pub fn snapshot(&self, result: &SearchResult) -> Result<Vec<CatalogItem>, usize> {
        self.indices
            .iter()
            .map(|&index| result.get(index).cloned().ok_or(index))
            .collect()
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self::new(iter)
    }
}
