//! Stateful rich-text block.
//!
//! [`RichText`] keeps a markup source and character size together with
//! the layout computed from them, and recomputes that layout whenever either
//! changes. Fonts and colors are passed in on every change rather than held,
//! so one registry and one font cache can serve any number of blocks.

use crate::color::ColorRegistry;
use crate::error::MarkupError;
use crate::font::{FontMeasurer, FontResolver};
use crate::layout::{LayoutOptions, Point, PositionedRun, Rect, TextLayout};
use crate::line::Line;
use crate::style::Style;

/// Default character size, in pixels.
pub const DEFAULT_CHARACTER_SIZE: u32 = 30;

/// A block of rich text and its layout.
#[derive(Debug, Clone)]
pub struct RichText {
    source: String,
    character_size: u32,
    base_style: Style,
    available_width: Option<f32>,
    layout: TextLayout,
    plain_text: String,
}

impl RichText {
    /// An empty block whose runs start from `base_style`.
    #[must_use]
    pub const fn new(base_style: Style) -> Self {
        Self {
            source: String::new(),
            character_size: DEFAULT_CHARACTER_SIZE,
            base_style,
            available_width: None,
            layout: TextLayout {
                bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
                runs: Vec::new(),
            },
            plain_text: String::new(),
        }
    }

    /// This block set to `character_size` (at least 1). Takes effect on the
    /// next layout.
    #[must_use]
    pub fn with_character_size(mut self, character_size: u32) -> Self {
        self.character_size = character_size.max(1);
        self
    }

    /// This block with lines aligned within `width`. Takes effect on the
    /// next layout.
    #[must_use]
    pub const fn with_available_width(mut self, width: Option<f32>) -> Self {
        self.available_width = width;
        self
    }

    /// Typeset `source` at `character_size` in one call.
    ///
    /// # Errors
    ///
    /// See [`RichText::set_source`].
    pub fn with_source<F>(
        source: &str,
        character_size: u32,
        base_style: Style,
        colors: &ColorRegistry,
        fonts: &mut F,
    ) -> Result<Self, MarkupError>
    where
        F: FontResolver + FontMeasurer + ?Sized,
    {
        let mut text = Self::new(base_style).with_character_size(character_size);
        text.set_source(source, colors, fonts)?;
        Ok(text)
    }

    /// The markup source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the source and lay it out again.
    ///
    /// # Errors
    ///
    /// Returns the tokenizer or layout error. The block is left cleared,
    /// holding the new source but no runs.
    pub fn set_source<F>(
        &mut self,
        source: &str,
        colors: &ColorRegistry,
        fonts: &mut F,
    ) -> Result<(), MarkupError>
    where
        F: FontResolver + FontMeasurer + ?Sized,
    {
        source.clone_into(&mut self.source);
        self.relayout(colors, fonts)
    }

    /// Drop the computed runs and bounds, keeping the source.
    pub fn clear(&mut self) {
        self.layout = TextLayout::default();
        self.plain_text.clear();
    }

    /// The laid-out text with all markup stripped, lines joined by `\n`.
    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// Character size in pixels.
    #[must_use]
    pub const fn character_size(&self) -> u32 {
        self.character_size
    }

    /// Change the character size (at least 1) and lay out again.
    ///
    /// # Errors
    ///
    /// See [`RichText::set_source`].
    pub fn set_character_size<F>(
        &mut self,
        size: u32,
        colors: &ColorRegistry,
        fonts: &mut F,
    ) -> Result<(), MarkupError>
    where
        F: FontResolver + FontMeasurer + ?Sized,
    {
        self.character_size = size.max(1);
        self.relayout(colors, fonts)
    }

    /// Width centered and right-aligned lines are aligned within. Takes
    /// effect on the next layout.
    pub const fn set_available_width(&mut self, width: Option<f32>) {
        self.available_width = width;
    }

    /// Width lines are aligned within, if set.
    #[must_use]
    pub const fn available_width(&self) -> Option<f32> {
        self.available_width
    }

    /// Bounds of the block in its own coordinates.
    #[must_use]
    pub const fn local_bounds(&self) -> Rect {
        self.layout.bounds
    }

    /// Bounds after placing the block's `origin` (in local pixels) at
    /// `position`.
    #[must_use]
    pub fn global_bounds(&self, position: Point, origin: Point) -> Rect {
        self.layout
            .bounds
            .translated(Point::new(position.x - origin.x, position.y - origin.y))
    }

    /// Positioned runs in drawing order.
    #[must_use]
    pub fn runs(&self) -> &[PositionedRun] {
        &self.layout.runs
    }

    /// The full layout.
    #[must_use]
    pub const fn layout(&self) -> &TextLayout {
        &self.layout
    }

    #[allow(clippy::cast_precision_loss)]
    fn relayout<F>(&mut self, colors: &ColorRegistry, fonts: &mut F) -> Result<(), MarkupError>
    where
        F: FontResolver + FontMeasurer + ?Sized,
    {
        self.clear();
        let mut options = LayoutOptions::new(self.character_size as f32);
        options.available_width = self.available_width;
        let mut style = self.base_style.clone();
        let lines = crate::tokenize(&self.source, &mut style, colors, fonts)?;
        let plain_text = lines.iter().map(Line::plain_text).collect::<Vec<_>>();
        self.layout = crate::layout(lines, &*fonts, &options)?;
        self.plain_text = plain_text.join("\n");
        Ok(())
    }
}
