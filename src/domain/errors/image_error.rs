//! Image pipeline error types.

use thiserror::Error;

/// Result type for image pipeline stages.
pub type ImageResult<T> = std::result::Result<T, ImageError>;

/// Failure of one stage of the fetch, transcode, store pipeline.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ImageError {
    #[error("{message}")]
    Network { message: String },

    #[error("decode error: {message}")]
    Decode { message: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl ImageError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns whether error came from the network.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns whether error came from decoding.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns whether error came from the disk store.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}
