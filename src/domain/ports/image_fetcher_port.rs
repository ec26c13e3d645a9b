//! Port definition for retrieving original image bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::ImageResult;

/// Retrieves the original bytes behind an image URL.
/// A single attempt per call; retries are the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads `url`. Fails with a network error on non-success status
    /// or transport failure.
    async fn fetch(&self, url: &str) -> ImageResult<Bytes>;
}
