//! Card descriptions.
//!
//! A card is a canvas size plus elements drawn in order. Positions and
//! sizes are fractions of the canvas, so one description renders at any
//! resolution:
//!
//! ```json
//! {
//!   "size": [750, 1050],
//!   "colors": { "gold": "ffd700" },
//!   "elements": [
//!     { "image": { "path": "art/frame.png" } },
//!     { "pos": [0.5, 0.1], "origin": [0.5, 0],
//!       "text": { "markup": "*Ancient Dragon*", "font": "fonts/serif.ttf", "size": 48 } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::CardError;

/// A parsed card description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Card {
    /// Canvas width and height in pixels.
    pub size: [u32; 2],
    /// Extra named colors (name to hex) registered before any markup is read.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    /// Elements in drawing order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Card {
    /// Parse a card from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Json`] for malformed JSON or an element that has
    /// both or neither of `text` and `image`, and
    /// [`CardError::InvalidCanvasSize`] for a zero-sized canvas.
    pub fn from_json(json: &str) -> Result<Self, CardError> {
        let card: Self = serde_json::from_str(json)?;
        if card.size[0] == 0 || card.size[1] == 0 {
            return Err(CardError::InvalidCanvasSize {
                width: card.size[0],
                height: card.size[1],
            });
        }
        Ok(card)
    }

    /// Read and parse a card description file.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Io`] if the file cannot be read, otherwise see
    /// [`Card::from_json`].
    pub fn load(path: &Path) -> Result<Self, CardError> {
        let json = fs::read_to_string(path).map_err(|source| CardError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Canvas width as a float, for placement math.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width(&self) -> f32 {
        self.size[0] as f32
    }

    /// Canvas height as a float, for placement math.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self) -> f32 {
        self.size[1] as f32
    }
}

/// A positioned text block or image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawElement")]
pub struct Element {
    /// Anchor position as a fraction of the canvas size.
    pub pos: [f32; 2],
    /// Which point of the element sits on the anchor, as a fraction of the
    /// element's own size.
    pub origin: [f32; 2],
    /// What to draw.
    pub content: ElementContent,
}

/// The two kinds of card element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    /// A block of markup.
    Text(TextElement),
    /// An image file.
    Image(ImageElement),
}

/// A block of markup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextElement {
    /// Markup source.
    pub markup: String,
    /// Font the markup starts in.
    pub font: String,
    /// Character size in pixels.
    pub size: u32,
    /// Width, as a fraction of the canvas width, that centered and
    /// right-aligned lines are aligned within. Without it lines only align
    /// against each other.
    #[serde(default)]
    pub width: Option<f32>,
}

/// An image file, scaled relative to the canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageElement {
    /// Path to a raster or SVG image.
    pub path: String,
    /// Drawn size as a fraction of the canvas size.
    #[serde(default = "full_canvas")]
    pub size: [f32; 2],
}

const fn full_canvas() -> [f32; 2] {
    [1.0, 1.0]
}

/// Wire form of an element before the text/image choice is checked.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElement {
    #[serde(default)]
    pos: [f32; 2],
    #[serde(default)]
    origin: [f32; 2],
    text: Option<TextElement>,
    image: Option<ImageElement>,
}

impl TryFrom<RawElement> for Element {
    type Error = String;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let content = match (raw.text, raw.image) {
            (Some(text), None) => ElementContent::Text(text),
            (None, Some(image)) => ElementContent::Image(image),
            (Some(_), Some(_)) => {
                return Err("an element must have text or an image, not both".to_string());
            }
            (None, None) => return Err("an element must have text or an image".to_string()),
        };
        Ok(Self {
            pos: raw.pos,
            origin: raw.origin,
            content,
        })
    }
}
