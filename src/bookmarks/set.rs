//! Sorted set of bookmarked pages

use serde::{Deserialize, Serialize};

/// Page indices bookmarked in one document, ascending and unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct BookmarkSet {
    pages: Vec<u32>,
}

impl From<Vec<u32>> for BookmarkSet {
    fn from(mut pages: Vec<u32>) -> Self {
        pages.sort_unstable();
        pages.dedup();
        Self { pages }
    }
}

impl From<BookmarkSet> for Vec<u32> {
    fn from(set: BookmarkSet) -> Self {
        set.pages
    }
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages.binary_search(&page).is_ok()
    }

    /// Add the page if absent, remove it if present.
    ///
    /// Returns true when the page is bookmarked afterwards.
    pub fn toggle(&mut self, page: u32) -> bool {
        match self.pages.binary_search(&page) {
            Ok(index) => {
                self.pages.remove(index);
                false
            }
            Err(index) => {
                self.pages.insert(index, page);
                true
            }
        }
    }

    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
