//! Card gallery - card search with an on-disk, deduplicated thumbnail cache.
//!
//! This crate provides the image pipeline behind a card search gallery:
//! URL-keyed disk caching, bounded asynchronous fetch and transcode, and
//! broadcast delivery of scaled images to UI subscribers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing headless gallery screens.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "card-gallery";
