//! Run positioning.
//!
//! Layout walks the lines with a pen cursor starting at `(0, 0)`. Each run
//! is placed at the cursor, and the cursor then moves to wherever the
//! measurer says the run's text ends. A line advances the cursor down by the
//! largest line spacing among its runs; the last line does not advance.
//!
//! Alignment is a second pass: once every line's natural width is known,
//! the runs of a centered or right-aligned line are shifted right into the
//! available width. Origins are rounded to whole pixels only when a run is
//! finally placed, so rounding error does not build up along a line, and the
//! bounds are taken over the placed runs.

use serde::Serialize;

use crate::error::MarkupError;
use crate::font::FontMeasurer;
use crate::line::{Alignment, Line, Run};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    /// Horizontal coordinate, growing right.
    pub x: f32,
    /// Vertical coordinate, growing down.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// This point with both coordinates rounded to the nearest integer.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// This rectangle moved by `offset`.
    #[must_use]
    pub fn translated(self, offset: Point) -> Self {
        Self::new(self.left + offset.x, self.top + offset.y, self.width, self.height)
    }
}

/// A run with its final top-left pen origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedRun {
    /// The run.
    pub run: Run,
    /// Where the run's text begins, in whole pixels.
    pub origin: Point,
}

/// Result of laying out a block of markup.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextLayout {
    /// Smallest origin-anchored rectangle containing every run's glyphs.
    /// `left` and `top` are always 0.
    pub bounds: Rect,
    /// Runs in drawing order.
    pub runs: Vec<PositionedRun>,
}

/// Inputs to layout besides the lines themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Character size passed to the measurer for every run.
    pub character_size: f32,
    /// Width that centered and right-aligned lines are aligned within.
    /// `None` uses the widest line of the block.
    pub available_width: Option<f32>,
}

impl LayoutOptions {
    /// Options for `character_size`, aligning lines against each other.
    #[must_use]
    pub const fn new(character_size: f32) -> Self {
        Self {
            character_size,
            available_width: None,
        }
    }

    /// These options with lines aligned within `width`.
    #[must_use]
    pub const fn with_available_width(mut self, width: f32) -> Self {
        self.available_width = Some(width);
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::new(30.0)
    }
}

/// A run placed on the unaligned pen grid, not yet rounded.
struct PlacedRun {
    run: Run,
    origin: Point,
    extent: Rect,
}

/// One line's runs after the first pass.
struct PlacedLine {
    runs: Vec<PlacedRun>,
    alignment: Alignment,
    natural_width: f32,
}

/// Position every run of `lines` and compute the block's bounds.
///
/// # Errors
///
/// Returns [`MarkupError::MissingFont`] if any run, including an empty one,
/// has no font. Nothing is laid out in that case.
pub fn layout<M: FontMeasurer + ?Sized>(
    lines: Vec<Line>,
    measurer: &M,
    options: &LayoutOptions,
) -> Result<TextLayout, MarkupError> {
    let size = options.character_size;
    let line_count = lines.len();
    let mut placed = Vec::with_capacity(line_count);
    let mut cursor = Point::default();

    for (index, line) in lines.into_iter().enumerate() {
        let alignment = line.effective_alignment();
        let mut line_spacing: f32 = 0.0;
        let mut runs = Vec::with_capacity(line.runs.len());

        for run in line.runs {
            let font = run
                .style
                .font
                .as_ref()
                .ok_or(MarkupError::MissingFont { line: index })?;
            line_spacing = line_spacing.max(measurer.line_spacing(font, size));
            let extent = measurer.text_bounds(font, size, &run.style, &run.text);
            let origin = cursor;
            cursor.x = measurer.advance(font, size, &run.style, &run.text, cursor.x);
            runs.push(PlacedRun {
                run,
                origin,
                extent,
            });
        }

        placed.push(PlacedLine {
            runs,
            alignment,
            natural_width: cursor.x,
        });

        if index + 1 < line_count {
            cursor = Point::new(0.0, cursor.y + line_spacing);
        }
    }

    let available_width = options.available_width.unwrap_or_else(|| {
        placed
            .iter()
            .map(|line| line.natural_width)
            .fold(0.0, f32::max)
    });

    let mut result = TextLayout::default();
    for line in placed {
        let free = (available_width - line.natural_width).max(0.0);
        let shift = free * line.alignment.offset_factor();
        for PlacedRun {
            run,
            origin,
            extent,
        } in line.runs
        {
            let origin = Point::new(origin.x + shift, origin.y).rounded();
            let glyphs = extent.translated(origin);
            let bounds = &mut result.bounds;
            bounds.width = bounds.width.max(glyphs.right() - bounds.left);
            bounds.height = bounds.height.max(glyphs.bottom() - bounds.top);
            result.runs.push(PositionedRun { run, origin });
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_rounding() {
        assert_eq!(Point::new(1.5, 2.49).rounded(), Point::new(2.0, 2.0));
        assert_eq!(Point::new(-0.4, 0.6).rounded(), Point::new(-0.0, 1.0));
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0).translated(Point::new(1.0, 1.0));
        assert!((rect.right() - 5.0).abs() < f32::EPSILON);
        assert!((rect.bottom() - 7.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_input_has_empty_bounds() {
        let fonts = crate::font::FixedFontMetrics::new();
        let result = layout(Vec::new(), &fonts, &LayoutOptions::default()).unwrap();
        assert_eq!(result, TextLayout::default());
    }
}
