//! Enlarged single-card view.

use tracing::trace;

use crate::domain::entities::{CardRecord, DeliveryOutcome, ImageRequest, TargetSize};
use crate::presentation::widgets::{CardTile, TileStatus};

/// Box for the enlarged card image.
pub const DETAIL_SIZE: TargetSize = TargetSize {
    width: 480,
    height: 672,
};

/// Large image plus rules text for one card.
#[derive(Debug)]
pub struct DetailScreen {
    tile: CardTile,
    text: String,
}

impl DetailScreen {
    /// Creates the view for `card`.
    #[must_use]
    pub fn new(card: &CardRecord) -> Self {
        Self {
            text: card.detail_text(),
            tile: CardTile::new(card.clone()),
        }
    }

    /// Request for the enlarged image, if the card has one.
    #[must_use]
    pub fn image_request(&self) -> Option<ImageRequest> {
        self.tile
            .url
            .as_deref()
            .map(|url| ImageRequest::new(url, DETAIL_SIZE))
    }

    /// Applies `outcome` if it answers this card's enlarged-image request.
    pub fn apply(&mut self, outcome: &DeliveryOutcome) -> bool {
        let Some(url) = self.tile.url.as_deref() else {
            return false;
        };
        if !outcome.answers(url, DETAIL_SIZE) {
            trace!(url = outcome.url(), size = %outcome.target_size(), "Ignoring outcome");
            return false;
        }
        self.tile.apply(outcome)
    }

    /// Image status.
    #[must_use]
    pub const fn status(&self) -> &TileStatus {
        &self.tile.status
    }

    /// Returns true once the image loaded, failed, or is unavailable.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.tile.status.is_settled()
    }

    /// Text rendering: title, image status, then rules text.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let image_line = match &self.tile.status {
            TileStatus::Loading => "Loading ...".to_string(),
            TileStatus::Ready { width, height, .. } => format!("Image: {width}x{height}"),
            TileStatus::Failed(error) => format!("Failed to load image: {error}"),
            TileStatus::NoImage => "No image available".to_string(),
        };
        let mut lines = vec![self.tile.card.name.clone(), image_line];
        if !self.text.is_empty() {
            lines.push(String::new());
            lines.extend(self.text.lines().map(String::from));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ImageSource, ScaledImage};
    use crate::domain::ports::mocks::card;
    use std::sync::Arc;

    fn loaded(url: &str, target_size: TargetSize, width: u32, height: u32) -> DeliveryOutcome {
        DeliveryOutcome::Loaded {
            url: url.to_string(),
            target_size,
            image: ScaledImage {
                image: Arc::new(image::DynamicImage::new_rgb8(width, height)),
                source: ImageSource::DiskCache,
            },
        }
    }

    #[test]
    fn test_requests_detail_size() {
        let screen = DetailScreen::new(&card("Opt", "https://img/opt"));
        let request = screen.image_request().unwrap();
        assert_eq!(request.target_size, DETAIL_SIZE);
    }

    #[test]
    fn test_ignores_thumbnail_outcome_for_same_url() {
        let mut screen = DetailScreen::new(&card("Opt", "https://img/opt"));

        assert!(!screen.apply(&loaded("https://img/opt", TargetSize::new(200, 280), 200, 279)));
        assert!(!screen.is_settled());

        assert!(screen.apply(&loaded("https://img/opt", DETAIL_SIZE, 480, 669)));
        assert!(screen.is_settled());
        assert_eq!(screen.render_lines()[1], "Image: 480x669");
    }

    #[test]
    fn test_render_includes_rules_text() {
        let mut record = card("Opt", "https://img/opt");
        record.type_line = Some("Instant".to_string());
        record.oracle_text = Some("Scry 1.\nDraw a card.".to_string());
        let mut screen = DetailScreen::new(&record);
        assert!(screen.apply(&DeliveryOutcome::Failed {
            url: "https://img/opt".to_string(),
            target_size: DETAIL_SIZE,
            error: "request timed out".to_string(),
        }));

        let lines = screen.render_lines();
        assert_eq!(lines[0], "Opt");
        assert_eq!(lines[1], "Failed to load image: request timed out");
        assert_eq!(&lines[3..], ["Instant", "", "Scry 1.", "Draw a card."]);
    }

    #[test]
    fn test_ignores_thumbnail_failure_for_same_url() {
        let mut screen = DetailScreen::new(&card("Opt", "https://img/opt"));

        assert!(!screen.apply(&DeliveryOutcome::Failed {
            url: "https://img/opt".to_string(),
            target_size: TargetSize::new(200, 280),
            error: "request timed out".to_string(),
        }));
        assert_eq!(screen.status(), &TileStatus::Loading);
    }
}
