//! Domain types for the thumbnail pipeline.

use std::sync::Arc;

/// Content-addressed identifier of a cached blob.
/// Derived from the URL, never from the image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a URL as the hex SHA-256 digest of its bytes.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounding box a scaled image must fit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    /// Maximum width in pixels.
    pub width: u32,
    /// Maximum height in pixels.
    pub height: u32,
}

impl TargetSize {
    /// Creates a bounding box. Zero dimensions are clamped to one pixel.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Thumbnail box for a given width and height/width ratio.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_width_and_ratio(width: u32, aspect_ratio: f32) -> Self {
        let height = (width as f32 * aspect_ratio).round() as u32;
        Self::new(width, height)
    }
}

impl std::fmt::Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single UI element's request for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Remote image URL.
    pub url: String,
    /// Box the delivered image must fit into.
    pub target_size: TargetSize,
}

impl ImageRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(url: impl Into<String>, target_size: TargetSize) -> Self {
        Self {
            url: url.into(),
            target_size,
        }
    }

    /// Cache key for this request's URL.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_url(&self.url)
    }
}

/// Where the bytes behind a scaled image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from a blob already on disk.
    DiskCache,
    /// Downloaded and transcoded for this request.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Decoded bitmap resized for display.
#[derive(Debug, Clone)]
pub struct ScaledImage {
    /// Resized pixels.
    pub image: Arc<image::DynamicImage>,
    /// Origin of the underlying bytes.
    pub source: ImageSource,
}

impl ScaledImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Result of one image request, broadcast to every subscriber.
///
/// Carries the request's `url` and `target_size` so a subscriber can tell
/// its own outcomes from those of another subscriber asking for the same URL.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    /// The image was loaded and scaled.
    Loaded {
        /// URL of the original request.
        url: String,
        /// Box of the original request.
        target_size: TargetSize,
        /// Display-ready image.
        image: ScaledImage,
    },
    /// Some pipeline stage failed.
    Failed {
        /// URL of the original request.
        url: String,
        /// Box of the original request.
        target_size: TargetSize,
        /// Human-readable failure description.
        error: String,
    },
}

impl DeliveryOutcome {
    /// URL the outcome belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Loaded { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    /// Bounding box the outcome was produced for.
    #[must_use]
    pub const fn target_size(&self) -> TargetSize {
        match self {
            Self::Loaded { target_size, .. } | Self::Failed { target_size, .. } => *target_size,
        }
    }

    /// Returns true if this outcome answers a request for `url` at `target_size`.
    #[must_use]
    pub fn answers(&self, url: &str, target_size: TargetSize) -> bool {
        self.url() == url && self.target_size() == target_size
    }

    /// Returns true for a successful load.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Returns the scaled image if loaded.
    #[must_use]
    pub const fn image(&self) -> Option<&ScaledImage> {
        match self {
            Self::Loaded { image, .. } => Some(image),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the failure description if failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Loaded { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_from_url() {
        let key = CacheKey::from_url("https://cards.scryfall.io/png/front/a/b/ab.png");
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_cache_key_consistency() {
        let url = "https://example.com/a.png";
        assert_eq!(CacheKey::from_url(url), CacheKey::from_url(url));
    }

    #[test]
    fn test_cache_key_distinct_urls() {
        let a = CacheKey::from_url("https://example.com/a.png");
        let b = CacheKey::from_url("https://example.com/b.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_known_digest() {
        let key = CacheKey::from_url("abc");
        assert_eq!(
            key.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_target_size_clamps_zero() {
        let size = TargetSize::new(0, 0);
        assert_eq!(size, TargetSize::new(1, 1));
    }

    #[test]
    fn test_target_size_from_ratio() {
        let size = TargetSize::from_width_and_ratio(200, 1.4);
        assert_eq!(size.width, 200);
        assert_eq!(size.height, 280);
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = DeliveryOutcome::Failed {
            url: "https://example.com/x.png".to_string(),
            target_size: TargetSize::new(200, 280),
            error: "boom".to_string(),
        };
        assert_eq!(failed.url(), "https://example.com/x.png");
        assert_eq!(failed.target_size(), TargetSize::new(200, 280));
        assert!(failed.answers("https://example.com/x.png", TargetSize::new(200, 280)));
        assert!(!failed.answers("https://example.com/x.png", TargetSize::new(480, 672)));
        assert!(!failed.answers("https://example.com/y.png", TargetSize::new(200, 280)));
        assert!(!failed.is_loaded());
        assert_eq!(failed.error(), Some("boom"));
        assert!(failed.image().is_none());
    }
}
