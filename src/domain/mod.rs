//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CacheKey, DeliveryOutcome, ImageRequest, ScaledImage, TargetSize};
pub use errors::{ImageError, ImageResult, SearchError};
pub use ports::{BlobStore, ImageFetcher, SearchPort};
