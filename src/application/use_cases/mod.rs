//! Use case implementations.

mod search_gallery_use_case;

pub use search_gallery_use_case::SearchGalleryUseCase;
