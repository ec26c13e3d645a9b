//! Search API error types.

use thiserror::Error;

/// Search error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SearchError {
    #[error("please enter a search query")]
    EmptyQuery,

    #[error("search request failed: {message}")]
    Network { message: String },

    #[error("search API returned {status}: {details}")]
    Api { status: u16, details: String },

    #[error("failed to parse search response: {message}")]
    InvalidResponse { message: String },
}

impl SearchError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
