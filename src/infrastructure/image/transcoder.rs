//! Decoding, storage re-encoding and display scaling.

use std::io::Cursor;
use std::sync::Arc;

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::trace;

use crate::domain::entities::TargetSize;
use crate::domain::errors::{ImageError, ImageResult};

/// File extension of blobs written by [`Transcoder::encode_for_storage`].
pub const STORAGE_EXTENSION: &str = "jpg";

/// Quality used for every stored blob.
pub const STORAGE_QUALITY: u8 = 85;

/// Stateless image transcoder. All methods are CPU-bound and are expected to
/// run on a blocking thread.
#[derive(Debug, Clone, Copy)]
pub struct Transcoder {
    quality: u8,
    filter: FilterType,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self {
            quality: STORAGE_QUALITY,
            filter: FilterType::Lanczos3,
        }
    }
}

impl Transcoder {
    /// Creates a transcoder with the fixed storage quality.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes any supported image format.
    ///
    /// # Errors
    /// Returns a decode error if `bytes` is not a decodable image.
    pub fn decode(&self, bytes: &[u8]) -> ImageResult<DynamicImage> {
        image::load_from_memory(bytes)
            .map_err(|e| ImageError::decode(format!("failed to decode image: {e}")))
    }

    /// Decodes `raw` and re-encodes it in the storage format.
    /// Returns the encoded blob together with the decoded original so the
    /// caller does not need to decode twice.
    ///
    /// # Errors
    /// Returns a decode error if `raw` is not a decodable image or cannot be
    /// re-encoded.
    pub fn encode_for_storage(&self, raw: &[u8]) -> ImageResult<(Vec<u8>, DynamicImage)> {
        let decoded = self.decode(raw)?;

        // The storage codec has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
        let mut encoded = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut encoded), self.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| ImageError::decode(format!("failed to encode image: {e}")))?;

        trace!(
            raw_size = raw.len(),
            encoded_size = encoded.len(),
            width = decoded.width(),
            height = decoded.height(),
            "Encoded image for storage"
        );
        Ok((encoded, decoded))
    }

    /// Resizes `image` to fit inside `target`, preserving aspect ratio.
    /// Both upscaling and downscaling are supported.
    #[must_use]
    pub fn scale(&self, image: &DynamicImage, target: TargetSize) -> Arc<DynamicImage> {
        Arc::new(image.resize(target.width, target.height, self.filter))
    }
}
