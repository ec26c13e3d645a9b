//! HTTP retrieval of original image bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::{ImageError, ImageResult};
use crate::domain::ports::ImageFetcher;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("card-gallery/", env!("CARGO_PKG_VERSION"));

/// Downloads images with a shared HTTP client. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> ImageResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Creates a fetcher with the default timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_defaults() -> ImageResult<Self> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> ImageResult<Bytes> {
        debug!(url, "Downloading image");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "Image request failed");
            if e.is_timeout() {
                ImageError::network("request timed out")
            } else if e.is_connect() {
                ImageError::network(format!("connection failed: {e}"))
            } else {
                ImageError::network(format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::network(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::network(format!("failed to read body: {e}")))?;

        debug!(url, size = bytes.len(), "Downloaded image");
        Ok(bytes)
    }
}
