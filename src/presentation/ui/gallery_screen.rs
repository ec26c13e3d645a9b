//! Gallery grid state.
//!
//! Tracks the live request set for one page of results. Outcomes for URLs
//! that are not on the page, or that were scaled for a different box, are
//! ignored.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::application::dto::GalleryPage;
use crate::domain::entities::{DeliveryOutcome, ImageRequest, TargetSize};
use crate::presentation::widgets::{CardTile, TileStatus};

/// Grid of card thumbnails for one gallery page.
#[derive(Debug)]
pub struct GalleryScreen {
    tiles: Vec<CardTile>,
    by_url: HashMap<String, Vec<usize>>,
    thumb_size: TargetSize,
    page_label: String,
    total_label: String,
}

impl GalleryScreen {
    /// Creates the grid for `page` with thumbnails fitting `thumb_size`.
    #[must_use]
    pub fn new(page: &GalleryPage, thumb_size: TargetSize) -> Self {
        let tiles: Vec<CardTile> = page.cards.iter().cloned().map(CardTile::new).collect();

        let mut by_url: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, tile) in tiles.iter().enumerate() {
            if let Some(url) = &tile.url {
                by_url.entry(url.clone()).or_default().push(index);
            }
        }

        Self {
            tiles,
            by_url,
            thumb_size,
            page_label: page.page_label(),
            total_label: page.total_label(),
        }
    }

    /// One request per distinct image URL, in display order.
    #[must_use]
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        let mut seen = std::collections::HashSet::new();
        self.tiles
            .iter()
            .filter_map(|tile| tile.url.as_deref())
            .filter(|url| seen.insert(*url))
            .map(|url| ImageRequest::new(url, self.thumb_size))
            .collect()
    }

    /// Changes the thumbnail size, resets every tile and returns the new
    /// requests to submit.
    pub fn resize(&mut self, thumb_size: TargetSize) -> Vec<ImageRequest> {
        debug!(from = %self.thumb_size, to = %thumb_size, "Resizing gallery thumbnails");
        self.thumb_size = thumb_size;
        for tile in &mut self.tiles {
            tile.reset();
        }
        self.image_requests()
    }

    /// Applies an outcome to every tile showing its URL.
    /// Returns false if the outcome answers a request this grid did not
    /// make (another URL, or the same URL at another size) or changes no tile.
    pub fn apply(&mut self, outcome: &DeliveryOutcome) -> bool {
        let Some(indices) = self.by_url.get(outcome.url()) else {
            trace!(url = outcome.url(), "Ignoring outcome for unknown URL");
            return false;
        };

        if outcome.target_size() != self.thumb_size {
            trace!(
                url = outcome.url(),
                size = %outcome.target_size(),
                "Ignoring outcome requested at another size"
            );
            return false;
        }

        let mut changed = false;
        for &index in indices {
            changed |= self.tiles[index].apply(outcome);
        }
        changed
    }

    /// Tiles in display order.
    #[must_use]
    pub fn tiles(&self) -> &[CardTile] {
        &self.tiles
    }

    /// Current thumbnail box.
    #[must_use]
    pub const fn thumb_size(&self) -> TargetSize {
        self.thumb_size
    }

    /// `(settled, total)` over tiles that have an image URL.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let with_url = self.tiles.iter().filter(|t| t.url.is_some());
        let (mut settled, mut total) = (0, 0);
        for tile in with_url {
            total += 1;
            if tile.status.is_settled() {
                settled += 1;
            }
        }
        (settled, total)
    }

    /// Returns true once every tile is settled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let (settled, total) = self.progress();
        settled == total
    }

    /// Number of tiles showing an error.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.status.is_failed()).count()
    }

    /// Text rendering: page and total labels followed by one line per tile.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![self.page_label.clone(), self.total_label.clone()];
        lines.extend(
            self.tiles
                .iter()
                .enumerate()
                .map(|(index, tile)| format!("[{index:>3}] {}", tile.label())),
        );
        lines
    }

    /// Ready tiles, for summaries.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| matches!(t.status, TileStatus::Ready { .. }))
            .count()
    }
}
