//! Image handling infrastructure.
//!
//! This module provides:
//! - Disk caching of transcoded blobs
//! - HTTP retrieval of original images
//! - Transcoding and display scaling
//! - A bounded worker pool and per-key single flight
//! - Outcome broadcast to UI subscribers

pub mod delivery;
pub mod disk_cache;
pub mod fetcher;
pub mod in_flight;
pub mod loader;
pub mod transcoder;
pub mod worker_pool;

pub use delivery::{OutcomeBroadcaster, SubscriberId, Subscription};
pub use disk_cache::DiskImageCache;
pub use fetcher::HttpImageFetcher;
pub use in_flight::InFlightRegistry;
pub use loader::ImageLoader;
pub use transcoder::{STORAGE_EXTENSION, STORAGE_QUALITY, Transcoder};
pub use worker_pool::WorkerPool;
