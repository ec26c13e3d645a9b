//! Presentation layer with headless gallery screens.

/// Gallery and detail screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use ui::{DetailScreen, GalleryScreen};
