//! Domain entity definitions.

mod card;
mod image;

pub use card::{CardFace, CardRecord, ImageUris, SearchPage};
pub use image::{CacheKey, DeliveryOutcome, ImageRequest, ImageSource, ScaledImage, TargetSize};
