//! Gallery search use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{GalleryPage, GalleryQuery};
use crate::domain::errors::SearchError;
use crate::domain::ports::SearchPort;

/// Runs a card search and shapes the result into a gallery page.
#[derive(Clone)]
pub struct SearchGalleryUseCase {
    search_port: Arc<dyn SearchPort>,
}

impl SearchGalleryUseCase {
    /// Creates new search use case.
    #[must_use]
    pub const fn new(search_port: Arc<dyn SearchPort>) -> Self {
        Self { search_port }
    }

    /// Executes the search described by `request`.
    ///
    /// # Errors
    /// Returns error if the query is empty or the search API fails.
    pub async fn execute(&self, request: &GalleryQuery) -> Result<GalleryPage, SearchError> {
        let query = request.query.trim();
        if query.is_empty() {
            warn!("Rejected empty search query");
            return Err(SearchError::EmptyQuery);
        }

        if request.is_filtered() {
            debug!(query, names = request.collection.len(), "Running filtered search");
            let cards = self
                .search_port
                .filtered_search(query, &request.collection)
                .await?;
            info!(query, matched = cards.len(), "Filtered search finished");
            return Ok(GalleryPage {
                page: 1,
                total_cards: cards.len() as u64,
                cards,
                has_more: false,
                filtered: true,
            });
        }

        let page = request.page.max(1);
        let result = self.search_port.search(query, page).await?;
        let total_cards = result.total();
        info!(query, page, total = total_cards, "Search finished");

        Ok(GalleryPage {
            page,
            cards: result.data,
            has_more: result.has_more,
            total_cards,
            filtered: false,
        })
    }
}
