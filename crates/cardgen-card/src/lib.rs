//! Card rendering for cardgen.
//!
//! # Scope
//!
//! This crate implements:
//! - **Card descriptions** ([`card`]) - the JSON format listing canvas size,
//!   extra colors and elements
//! - **Fonts** ([`font_metrics`]) - fontdue-backed loading and measuring,
//!   plugged into the markup engine's font traits
//! - **Images** ([`image_loader`]) - raster and SVG decoding
//! - **Compositing** ([`renderer`], [`compose`]) - placing text blocks and
//!   images on a canvas and writing it out
//!
//! # Pipeline
//!
//! ```text
//! card.json → Card → (typeset text, decode images) → Canvas → PNG
//! ```

/// Card description format.
pub mod card;
/// Element placement and the card renderer.
pub mod compose;
/// Font loading and measurement.
pub mod font_metrics;
/// Image loading pipeline.
pub mod image_loader;
/// Pixel compositor.
pub mod renderer;

pub use card::{Card, Element, ElementContent, ImageElement, TextElement};
pub use compose::{
    CardRenderer, PlacedText, anchor_bounds, card_colors, image_rect, text_offset, typeset_text,
};
pub use font_metrics::{FontFileLoader, FontLibrary};
pub use image_loader::{ImageFormat, ImageLoaderPipeline, detect_format, load_image};
pub use renderer::Canvas;

use cardgen_markup::MarkupError;
use thiserror::Error;

/// Errors raised while loading or rendering a card.
#[derive(Debug, Error)]
pub enum CardError {
    /// A file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The file that failed.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The card description is not valid JSON or does not match the format.
    #[error("invalid card description: {0}")]
    Json(#[from] serde_json::Error),
    /// The canvas has a zero dimension.
    #[error("canvas size must be non-zero, got {width}x{height}")]
    InvalidCanvasSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A text element's markup was rejected.
    #[error("text element {element}: {source}")]
    Markup {
        /// Index of the element in the card.
        element: usize,
        /// Why the markup was rejected.
        source: MarkupError,
    },
    /// An image file could not be decoded.
    #[error("failed to decode image '{path}': {reason}")]
    Image {
        /// The image file.
        path: String,
        /// Decoder message.
        reason: String,
    },
    /// The rendered card could not be written.
    #[error("failed to save '{path}': {source}")]
    Save {
        /// Output path.
        path: String,
        /// The encoder error.
        source: image::ImageError,
    },
}
