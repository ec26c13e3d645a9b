//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image cache, fetch and delivery pipeline.
pub mod image;
/// Card search API client.
pub mod search;

#[cfg(test)]
pub(crate) mod http_fixture;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use image::{
    DiskImageCache, HttpImageFetcher, ImageLoader, OutcomeBroadcaster, Subscription, Transcoder,
    WorkerPool,
};
pub use search::ScryfallClient;
