//! Domain error types.

mod image_error;
mod search_error;

pub use image_error::{ImageError, ImageResult};
pub use search_error::SearchError;
