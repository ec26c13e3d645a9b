//! Port definition for the card search API.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::{CardRecord, SearchPage};
use crate::domain::errors::SearchError;

/// Port for card search operations.
#[async_trait]
pub trait SearchPort: Send + Sync {
    /// Fetches one page of results for `query`. Pages start at 1.
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, SearchError>;

    /// Walks every page of `query` and keeps cards whose name is in `names`.
    async fn filtered_search(
        &self,
        query: &str,
        names: &HashSet<String>,
    ) -> Result<Vec<CardRecord>, SearchError> {
        let mut page = 1;
        let mut results = Vec::new();
        loop {
            let data = self.search(query, page).await?;
            results.extend(
                data.data
                    .into_iter()
                    .filter(|card| names.contains(&card.name)),
            );
            if !data.has_more {
                break;
            }
            page += 1;
        }
        debug!(query, pages = page, matched = results.len(), "Filtered search complete");
        Ok(results)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Search port serving canned pages.
    pub struct StaticSearch {
        pages: Vec<SearchPage>,
        requests: AtomicUsize,
    }

    impl StaticSearch {
        /// Serves `pages` in order; page `n` maps to `pages[n - 1]`.
        pub fn new(pages: Vec<SearchPage>) -> Self {
            Self {
                pages,
                requests: AtomicUsize::new(0),
            }
        }

        /// Number of page requests served.
        pub fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchPort for StaticSearch {
        async fn search(&self, _query: &str, page: u32) -> Result<SearchPage, SearchError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let index = page.saturating_sub(1) as usize;
            Ok(self.pages.get(index).cloned().unwrap_or_default())
        }
    }

    /// Builds a card with a single `normal` image URL.
    pub fn card(name: &str, url: &str) -> CardRecord {
        CardRecord {
            name: name.to_string(),
            image_uris: Some(crate::domain::entities::ImageUris {
                normal: Some(url.to_string()),
                ..Default::default()
            }),
            ..CardRecord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{StaticSearch, card};
    use super::*;

    #[tokio::test]
    async fn test_filtered_search_walks_all_pages() {
        let search = StaticSearch::new(vec![
            SearchPage {
                data: vec![card("Opt", "u1"), card("Shock", "u2")],
                has_more: true,
                total_cards: Some(4),
            },
            SearchPage {
                data: vec![card("Ponder", "u3"), card("Opt", "u4")],
                has_more: false,
                total_cards: Some(4),
            },
        ]);
        let names: HashSet<String> = ["Opt".to_string(), "Ponder".to_string()].into();

        let cards = search.filtered_search("t:instant", &names).await.unwrap();

        assert_eq!(search.requests(), 2);
        let matched: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(matched, vec!["Opt", "Ponder", "Opt"]);
    }

    #[tokio::test]
    async fn test_filtered_search_single_page() {
        let search = StaticSearch::new(vec![SearchPage {
            data: vec![card("Opt", "u1")],
            has_more: false,
            total_cards: Some(1),
        }]);
        let cards = search
            .filtered_search("opt", &HashSet::new())
            .await
            .unwrap();
        assert!(cards.is_empty());
        assert_eq!(search.requests(), 1);
    }
}
