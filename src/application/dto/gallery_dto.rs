//! Gallery search DTOs.

use std::collections::HashSet;

use crate::domain::entities::CardRecord;

/// Cards per page returned by the search API.
pub const CARDS_PER_PAGE: u64 = 175;

/// Gallery search request data.
#[derive(Debug, Clone, Default)]
pub struct GalleryQuery {
    /// Search query string.
    pub query: String,
    /// Requested page, starting at 1. Ignored when filtering.
    pub page: u32,
    /// Card names to keep. Empty means no filter.
    pub collection: HashSet<String>,
}

impl GalleryQuery {
    /// Creates an unfiltered query for `page`.
    #[must_use]
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
            collection: HashSet::new(),
        }
    }

    /// Restricts results to the given card names.
    #[must_use]
    pub fn with_collection(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.collection = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    /// Returns true if a collection filter is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.collection.is_empty()
    }
}

/// One page of gallery results.
#[derive(Debug, Clone, Default)]
pub struct GalleryPage {
    /// Page number shown.
    pub page: u32,
    /// Cards to display.
    pub cards: Vec<CardRecord>,
    /// Whether a next page exists.
    pub has_more: bool,
    /// Total matching cards.
    pub total_cards: u64,
    /// Whether the collection filter was applied.
    pub filtered: bool,
}

impl GalleryPage {
    /// Number of API pages, or `None` when filtered (all matches are shown at once).
    #[must_use]
    pub fn page_count(&self) -> Option<u64> {
        if self.filtered {
            return None;
        }
        if self.total_cards == 0 {
            Some(0)
        } else {
            Some((self.total_cards - 1) / CARDS_PER_PAGE + 1)
        }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1 && !self.filtered
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_more && !self.filtered
    }

    /// Best image URL per card, in display order. Cards without an image
    /// yield `None`.
    #[must_use]
    pub fn image_urls(&self) -> Vec<Option<&str>> {
        self.cards.iter().map(CardRecord::best_image_url).collect()
    }

    /// Page label as shown under the grid.
    #[must_use]
    pub fn page_label(&self) -> String {
        match self.page_count() {
            Some(count) => format!("Page {} / {count}", self.page),
            None => format!("Page {}", self.page),
        }
    }

    /// Total label as shown under the grid.
    #[must_use]
    pub fn total_label(&self) -> String {
        if self.filtered {
            format!(
                "Total cards in collection matching query: {}",
                self.cards.len()
            )
        } else {
            format!("Total cards matching query: {}", self.total_cards)
        }
    }
}
