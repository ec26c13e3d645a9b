//! Scryfall card search HTTP client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::SearchPage;
use crate::domain::errors::SearchError;
use crate::domain::ports::SearchPort;

/// Default API base URL.
pub const SCRYFALL_API_BASE: &str = "https://api.scryfall.com";

const USER_AGENT: &str = concat!("card-gallery/", env!("CARGO_PKG_VERSION"));

/// Scryfall API error object.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    details: String,
}

/// Card search client.
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: Client,
    base_url: String,
}

impl ScryfallClient {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, SearchError> {
        Self::with_base_url(SCRYFALL_API_BASE)
    }

    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint for card searches.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}/cards/search", self.base_url)
    }

    async fn handle_error_response(
        status: StatusCode,
        response: reqwest::Response,
    ) -> Result<SearchPage, SearchError> {
        let error = response.json::<ErrorResponse>().await.ok();

        // A query with no matches is reported as 404 not_found.
        if status == StatusCode::NOT_FOUND
            && error.as_ref().is_none_or(|e| e.code == "not_found")
        {
            debug!("Search matched no cards");
            return Ok(SearchPage::default());
        }

        let details = error
            .map(|e| e.details)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

        Err(SearchError::Api {
            status: status.as_u16(),
            details,
        })
    }
}

#[async_trait]
impl SearchPort for ScryfallClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, SearchError> {
        debug!(query, page, "Searching cards");

        let page_param = page.max(1).to_string();
        let response = self
            .client
            .get(self.search_url())
            .header(header::ACCEPT, "application/json")
            .query(&[("q", query), ("page", page_param.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach search API");
                if e.is_timeout() {
                    SearchError::network("request timed out")
                } else if e.is_connect() {
                    SearchError::network("failed to connect to search API")
                } else {
                    SearchError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Self::handle_error_response(status, response).await;
        }

        let page_data: SearchPage = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse search response");
            SearchError::invalid_response(e.to_string())
        })?;

        debug!(
            cards = page_data.data.len(),
            total = page_data.total(),
            has_more = page_data.has_more,
            "Search page received"
        );
        Ok(page_data)
    }
}
