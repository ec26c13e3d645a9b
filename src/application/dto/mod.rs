//! Data transfer objects for the application layer.

mod gallery_dto;

pub use gallery_dto::{CARDS_PER_PAGE, GalleryPage, GalleryQuery};
