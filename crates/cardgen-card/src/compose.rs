//! Placing card elements on the canvas.
//!
//! Positions and sizes in a card are fractions of the canvas. A text
//! block's `origin` is a fraction of its laid-out bounds and an image's
//! `origin` a fraction of its drawn size; the origin point is what lands
//! on `pos`.

use std::path::Path;

use cardgen_common::warning::warn_once;
use cardgen_markup::{
    Color, ColorRegistry, FontMeasurer, FontResolver, MarkupError, Point, Rect, RichText, Style,
    TextLayout,
};
use serde::Serialize;

use crate::CardError;
use crate::card::{Card, Element, ElementContent, ImageElement, TextElement};
use crate::font_metrics::FontLibrary;
use crate::image_loader::load_image;
use crate::renderer::Canvas;

/// A typeset text element and where its local origin lands on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedText {
    /// Index of the element in the card.
    pub element: usize,
    /// Canvas position of the block's local `(0, 0)`.
    pub offset: Point,
    /// Character size the block was typeset at.
    pub character_size: u32,
    /// Runs and bounds in block-local coordinates.
    pub layout: TextLayout,
}

/// Typeset a text element, starting in the element's own font.
///
/// An element `width` is scaled by the canvas width and becomes the width
/// its lines are aligned within.
///
/// # Errors
///
/// Returns [`MarkupError::FontLoad`] if the element's font cannot be
/// resolved, otherwise any error from typesetting the markup.
pub fn typeset_text<F>(
    text: &TextElement,
    canvas: [f32; 2],
    colors: &ColorRegistry,
    fonts: &mut F,
) -> Result<RichText, MarkupError>
where
    F: FontResolver + FontMeasurer + ?Sized,
{
    let base = Style::with_initial_font(fonts.resolve(&text.font)?);
    let mut rich = RichText::new(base)
        .with_character_size(text.size)
        .with_available_width(text.width.map(|width| width * canvas[0]));
    rich.set_source(&text.markup, colors, fonts)?;
    Ok(rich)
}

/// The box a text block's `origin` is measured against: its bounds,
/// widened to the width its lines are aligned within.
#[must_use]
pub fn anchor_bounds(rich: &RichText) -> Rect {
    let bounds = rich.local_bounds();
    match rich.available_width() {
        Some(width) => Rect {
            width: bounds.width.max(width),
            ..bounds
        },
        None => bounds,
    }
}

/// Canvas position of a text block's local `(0, 0)`.
///
/// The origin point is rounded to whole pixels within the block, then the
/// final position is rounded again so glyphs land on the pixel grid.
#[must_use]
pub fn text_offset(bounds: Rect, element: &Element, canvas: [f32; 2]) -> Point {
    let origin = Point::new(bounds.width * element.origin[0], bounds.height * element.origin[1])
        .rounded();
    Point::new(
        canvas[0].mul_add(element.pos[0], -origin.x),
        canvas[1].mul_add(element.pos[1], -origin.y),
    )
    .rounded()
}

/// Destination rectangle of an image element.
#[must_use]
pub fn image_rect(element: &Element, image: &ImageElement, canvas: [f32; 2]) -> Rect {
    let width = image.size[0] * canvas[0];
    let height = image.size[1] * canvas[1];
    Rect::new(
        canvas[0].mul_add(element.pos[0], -(width * element.origin[0])),
        canvas[1].mul_add(element.pos[1], -(height * element.origin[1])),
        width,
        height,
    )
}

/// The palette for one card: `base` plus the card's own named colors.
///
/// A card color that is not valid hex is skipped with a warning.
#[must_use]
pub fn card_colors(base: &ColorRegistry, card: &Card) -> ColorRegistry {
    let mut colors = base.clone();
    for (name, hex) in &card.colors {
        match Color::from_hex(hex) {
            Some(color) => colors.add_color(name.as_str(), color),
            None => {
                let _ = warn_once("card", &format!("ignoring color '{name}': '{hex}' is not hex"));
            }
        }
    }
    colors
}

/// Renders cards with a shared font library and base palette.
pub struct CardRenderer {
    fonts: FontLibrary,
    colors: ColorRegistry,
    background: Color,
}

impl CardRenderer {
    /// A renderer with the default palette and an opaque black background.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            fonts: FontLibrary::new(verbose),
            colors: ColorRegistry::new(),
            background: Color::BLACK,
        }
    }

    /// Use `background` for the canvas of every card.
    #[must_use]
    pub const fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// The base palette, for registering extra colors.
    pub const fn colors_mut(&mut self) -> &mut ColorRegistry {
        &mut self.colors
    }

    /// The base palette.
    #[must_use]
    pub const fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Fonts loaded so far.
    #[must_use]
    pub const fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Typeset every text element of `card` without drawing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Markup`] for the first text element that fails.
    pub fn typeset(&mut self, card: &Card) -> Result<Vec<PlacedText>, CardError> {
        let colors = card_colors(&self.colors, card);
        let mut placed = Vec::new();
        for (index, element) in card.elements.iter().enumerate() {
            if let ElementContent::Text(text) = &element.content {
                placed.push(self.place_text(index, element, text, card, &colors)?);
            }
        }
        Ok(placed)
    }

    /// Draw `card` onto a fresh canvas.
    ///
    /// Elements are drawn in order. An image that cannot be loaded is
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Markup`] for the first text element that fails.
    pub fn render(&mut self, card: &Card) -> Result<Canvas, CardError> {
        self.render_with_layout(card).map(|(canvas, _)| canvas)
    }

    /// Draw `card` and also return the text elements as they were placed.
    ///
    /// # Errors
    ///
    /// See [`CardRenderer::render`].
    #[allow(clippy::cast_precision_loss)]
    pub fn render_with_layout(
        &mut self,
        card: &Card,
    ) -> Result<(Canvas, Vec<PlacedText>), CardError> {
        let colors = card_colors(&self.colors, card);
        let size = [card.width(), card.height()];
        let mut canvas = Canvas::new(card.size[0], card.size[1], self.background);
        let mut placed = Vec::new();

        for (index, element) in card.elements.iter().enumerate() {
            match &element.content {
                ElementContent::Text(text) => {
                    let text = self.place_text(index, element, text, card, &colors)?;
                    canvas.draw_text(
                        &text.layout,
                        text.offset,
                        text.character_size as f32,
                        &self.fonts,
                    );
                    placed.push(text);
                }
                ElementContent::Image(image) => match load_image(Path::new(&image.path)) {
                    Ok(loaded) => canvas.draw_image(&loaded, image_rect(element, image, size)),
                    Err(err) => {
                        let _ = warn_once("image", &format!("skipping element {index}: {err}"));
                    }
                },
            }
        }
        Ok((canvas, placed))
    }

    fn place_text(
        &mut self,
        index: usize,
        element: &Element,
        text: &TextElement,
        card: &Card,
        colors: &ColorRegistry,
    ) -> Result<PlacedText, CardError> {
        let canvas = [card.width(), card.height()];
        let rich = typeset_text(text, canvas, colors, &mut self.fonts).map_err(|source| {
            CardError::Markup {
                element: index,
                source,
            }
        })?;
        Ok(PlacedText {
            element: index,
            offset: text_offset(anchor_bounds(&rich), element, canvas),
            character_size: rich.character_size(),
            layout: rich.layout().clone(),
        })
    }
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}
