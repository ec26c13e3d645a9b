//! Thumbnail tile state for one card in the gallery grid.

use crate::domain::entities::{CardRecord, DeliveryOutcome, ImageSource, ScaledImage};

/// Status of a tile's image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TileStatus {
    /// Waiting for an outcome.
    #[default]
    Loading,
    /// Image delivered.
    Ready {
        /// Delivered width.
        width: u32,
        /// Delivered height.
        height: u32,
        /// Where the image came from.
        source: ImageSource,
    },
    /// Loading failed with an error message.
    Failed(String),
    /// The card has no image URL.
    NoImage,
}

impl TileStatus {
    /// Returns true once the tile will not change anymore.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One card in the grid.
#[derive(Debug, Clone)]
pub struct CardTile {
    /// Card shown by this tile.
    pub card: CardRecord,
    /// Image URL, if the card has one.
    pub url: Option<String>,
    /// Current status.
    pub status: TileStatus,
    /// Delivered image.
    pub image: Option<ScaledImage>,
}

impl CardTile {
    /// Creates a tile for `card`.
    #[must_use]
    pub fn new(card: CardRecord) -> Self {
        let url = card.best_image_url().map(String::from);
        let status = if url.is_some() {
            TileStatus::Loading
        } else {
            TileStatus::NoImage
        };
        Self {
            card,
            url,
            status,
            image: None,
        }
    }

    /// Resets the tile to loading (after a size change).
    pub fn reset(&mut self) {
        if self.url.is_some() {
            self.status = TileStatus::Loading;
            self.image = None;
        }
    }

    /// Applies an outcome already matched to this tile's request.
    /// A failure never replaces an image that is already shown.
    /// Returns false if the tile did not change.
    pub fn apply(&mut self, outcome: &DeliveryOutcome) -> bool {
        match outcome {
            DeliveryOutcome::Loaded { image, .. } => {
                self.status = TileStatus::Ready {
                    width: image.width(),
                    height: image.height(),
                    source: image.source,
                };
                self.image = Some(image.clone());
                true
            }
            DeliveryOutcome::Failed { .. } if self.image.is_some() => false,
            DeliveryOutcome::Failed { error, .. } => {
                self.status = TileStatus::Failed(error.clone());
                true
            }
        }
    }

    /// One-line text rendering of the tile.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.status {
            TileStatus::Loading => format!("{}: loading", self.card.name),
            TileStatus::Ready {
                width,
                height,
                source,
            } => format!("{}: {width}x{height} ({source})", self.card.name),
            TileStatus::Failed(error) => format!("{}: Error: {error}", self.card.name),
            TileStatus::NoImage => format!("{}: no image available", self.card.name),
        }
    }
}
