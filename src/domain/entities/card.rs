//! Card records returned by the search API.

use serde::{Deserialize, Serialize};

/// Image URL variants, most preferred first.
const IMAGE_PREFERENCE: [ImageVariant; 4] = [
    ImageVariant::Png,
    ImageVariant::Large,
    ImageVariant::Normal,
    ImageVariant::Small,
];

#[derive(Debug, Clone, Copy)]
enum ImageVariant {
    Png,
    Large,
    Normal,
    Small,
}

/// Image URIs attached to a card or card face.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUris {
    /// Full resolution PNG with transparent corners.
    #[serde(default)]
    pub png: Option<String>,
    /// Large JPEG.
    #[serde(default)]
    pub large: Option<String>,
    /// Medium JPEG.
    #[serde(default)]
    pub normal: Option<String>,
    /// Small JPEG.
    #[serde(default)]
    pub small: Option<String>,
}

impl ImageUris {
    fn variant(&self, variant: ImageVariant) -> Option<&str> {
        let uri = match variant {
            ImageVariant::Png => self.png.as_deref(),
            ImageVariant::Large => self.large.as_deref(),
            ImageVariant::Normal => self.normal.as_deref(),
            ImageVariant::Small => self.small.as_deref(),
        };
        uri.filter(|u| !u.is_empty())
    }

    /// Returns the best available URI by `png > large > normal > small`.
    #[must_use]
    pub fn best(&self) -> Option<&str> {
        IMAGE_PREFERENCE.iter().find_map(|v| self.variant(*v))
    }
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    /// Face name.
    #[serde(default)]
    pub name: Option<String>,
    /// Face image URIs.
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// A card as returned by the search API. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Card name.
    #[serde(default)]
    pub name: String,
    /// Top-level image URIs (absent on multi-faced cards).
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// Faces of double-sided cards.
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
    /// Type line.
    #[serde(default)]
    pub type_line: Option<String>,
    /// Rules text.
    #[serde(default)]
    pub oracle_text: Option<String>,
    /// Flavor text.
    #[serde(default)]
    pub flavor_text: Option<String>,
}

impl CardRecord {
    /// Picks the image URL to display, falling back to the first face.
    #[must_use]
    pub fn best_image_url(&self) -> Option<&str> {
        if let Some(url) = self.image_uris.as_ref().and_then(ImageUris::best) {
            return Some(url);
        }
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.image_uris.as_ref())
            .and_then(ImageUris::best)
    }

    /// Type line, rules text and flavor text separated by blank lines.
    #[must_use]
    pub fn detail_text(&self) -> String {
        [&self.type_line, &self.oracle_text, &self.flavor_text]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Cards on this page.
    #[serde(default)]
    pub data: Vec<CardRecord>,
    /// Whether another page follows.
    #[serde(default)]
    pub has_more: bool,
    /// Total matches across all pages.
    #[serde(default)]
    pub total_cards: Option<u64>,
}

impl SearchPage {
    /// Total matches, or the length of this page when the API omitted it.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total_cards.unwrap_or(self.data.len() as u64)
    }
}
