//! UI screens.

mod detail_screen;
mod gallery_screen;

pub use detail_screen::{DETAIL_SIZE, DetailScreen};
pub use gallery_screen::GalleryScreen;
