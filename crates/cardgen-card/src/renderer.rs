//! Software compositor for card canvases.
//!
//! [`Canvas`] owns an RGBA pixel buffer and knows how to draw the two kinds
//! of card element: scaled images and laid-out rich text. Glyphs are
//! rasterized with fontdue; synthesized styles (bold, italic, outline and
//! the decoration bars) are drawn on top of plain glyph coverage.

use std::path::Path;

use cardgen_common::image::LoadedImage;
use cardgen_markup::{Color, Point, PositionedRun, Rect, TextLayout};
use image::{ImageBuffer, Rgba, RgbaImage};

use crate::CardError;
use crate::font_metrics::{
    FontLibrary, ITALIC_SHEAR, bold_offset, decoration_thickness, strikethrough_offset,
    underline_offset,
};

/// An RGBA canvas that card elements are drawn onto.
pub struct Canvas {
    buffer: RgbaImage,
}

impl Canvas {
    /// A `width` × `height` canvas filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, to_rgba(background)),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// The pixel at `(x, y)`, if inside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.buffer.get_pixel_checked(x, y).map(|px| px.0)
    }

    /// The underlying pixel buffer.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Fill a rectangle, blending `color` over what is already there.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let left = rect.left.round() as i32;
        let top = rect.top.round() as i32;
        let right = rect.right().round() as i32;
        let bottom = rect.bottom().round() as i32;
        for y in top..bottom {
            for x in left..right {
                self.blend(x, y, color, 255);
            }
        }
    }

    /// Draw `image` scaled to fill `dest`.
    ///
    /// Uses nearest-neighbor sampling and alpha-blends onto the canvas. Only
    /// the part of `dest` that overlaps the canvas is visited.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn draw_image(&mut self, image: &LoadedImage, dest: Rect) {
        let dest_x = dest.left.round() as i64;
        let dest_y = dest.top.round() as i64;
        let dest_w = dest.width.round().max(0.0) as u32;
        let dest_h = dest.height.round().max(0.0) as u32;
        let (src_w, src_h) = (image.width(), image.height());

        if image.is_empty() || dest_w == 0 || dest_h == 0 {
            return;
        }

        let columns = visible_span(dest_x, dest_w, self.width());
        let rows = visible_span(dest_y, dest_h, self.height());

        for dy in rows {
            let sy = ((u64::from(dy) * u64::from(src_h)) / u64::from(dest_h))
                .min(u64::from(src_h) - 1) as u32;
            for dx in columns.clone() {
                let sx = ((u64::from(dx) * u64::from(src_w)) / u64::from(dest_w))
                    .min(u64::from(src_w) - 1) as u32;
                let Some([r, g, b, a]) = image.pixel(sx, sy) else {
                    continue;
                };
                self.blend(
                    (dest_x + i64::from(dx)) as i32,
                    (dest_y + i64::from(dy)) as i32,
                    Color::rgba(r, g, b, a),
                    255,
                );
            }
        }
    }

    /// Draw every run of `layout` with the block's local origin at `offset`.
    pub fn draw_text(
        &mut self,
        layout: &TextLayout,
        offset: Point,
        character_size: f32,
        fonts: &FontLibrary,
    ) {
        for run in &layout.runs {
            self.draw_run(run, offset, character_size, fonts);
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::similar_names
    )]
    fn draw_run(&mut self, run: &PositionedRun, offset: Point, size: f32, fonts: &FontLibrary) {
        let style = &run.run.style;
        let Some(font_ref) = style.font.as_ref() else {
            return;
        };
        let Some(font) = fonts.font(font_ref) else {
            return;
        };

        let x = offset.x + run.origin.x;
        let y = offset.y + run.origin.y;
        let baseline = y + fonts.ascent(font_ref, size);
        let bold = if style.bold { bold_offset(size) } else { 0.0 };
        let shear = if style.italic { ITALIC_SHEAR } else { 0.0 };

        let mut glyphs = Vec::new();
        let mut pen = x;
        let mut previous: Option<char> = None;
        for ch in run.run.text.chars().filter(|ch| !ch.is_control()) {
            if let Some(prev) = previous {
                pen += font.horizontal_kern(prev, ch, size).unwrap_or(0.0);
            }
            let (metrics, coverage) = font.rasterize(ch, size);
            glyphs.push(Bitmap {
                left: pen + metrics.xmin as f32,
                top: baseline - (metrics.ymin as f32 + metrics.height as f32),
                width: metrics.width,
                coverage,
            });
            pen += metrics.advance_width + bold;
            previous = Some(ch);
        }

        // Outline first so the fill sits on top of it.
        let mut passes = Vec::new();
        let thickness = style.outline_thickness.max(0.0).round() as i32;
        if thickness > 0 {
            for dy in -thickness..=thickness {
                for dx in -thickness..=thickness {
                    if dx * dx + dy * dy <= thickness * thickness {
                        passes.push((dx as f32, dy as f32, style.outline_color));
                    }
                }
            }
        }
        passes.push((0.0, 0.0, style.fill_color));

        for &(dx, dy, color) in &passes {
            for bitmap in &glyphs {
                let glyph = Glyph {
                    left: bitmap.left + dx,
                    top: bitmap.top + dy,
                    baseline: baseline + dy,
                    width: bitmap.width,
                    coverage: &bitmap.coverage,
                    shear,
                };
                self.draw_glyph(&glyph, color);
                if style.bold {
                    let emboldened = Glyph {
                        left: glyph.left + bold,
                        ..glyph
                    };
                    self.draw_glyph(&emboldened, color);
                }
            }
        }

        let bar = decoration_thickness(size);
        let width = pen - x;
        if style.underline {
            let top = baseline + underline_offset(size);
            self.fill_rect(Rect::new(x, top, width, bar), style.fill_color);
        }
        if style.strikethrough {
            let top = baseline - strikethrough_offset(size);
            self.fill_rect(Rect::new(x, top, width, bar), style.fill_color);
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    fn draw_glyph(&mut self, glyph: &Glyph<'_>, color: Color) {
        if glyph.width == 0 {
            return;
        }
        for (row, line) in glyph.coverage.chunks(glyph.width).enumerate() {
            let py = glyph.top + row as f32;
            let slant = (glyph.baseline - py) * glyph.shear;
            let px = (glyph.left + slant).round() as i32;
            for (column, &alpha) in line.iter().enumerate() {
                if alpha > 0 {
                    self.blend(px + column as i32, py.round() as i32, color, alpha);
                }
            }
        }
    }

    /// Blend `color` at `coverage` onto one pixel. Out-of-range coordinates
    /// are ignored.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if x < 0 || y < 0 {
            return;
        }
        let Some(bg) = self.buffer.get_pixel_mut_checked(x as u32, y as u32) else {
            return;
        };
        let alpha = u16::from(color.a) * u16::from(coverage) / 255;
        *bg = alpha_blend(to_rgba(color), *bg, alpha as u8);
    }

    /// Save the canvas; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Save`] if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<(), CardError> {
        self.buffer.save(path).map_err(|source| CardError::Save {
            path: path.display().to_string(),
            source,
        })
    }
}

/// A glyph rasterized once per run, at its unshifted position.
struct Bitmap {
    left: f32,
    top: f32,
    width: usize,
    coverage: Vec<u8>,
}

/// One glyph placement ready to be blended.
#[derive(Clone, Copy)]
struct Glyph<'a> {
    left: f32,
    top: f32,
    baseline: f32,
    width: usize,
    coverage: &'a [u8],
    shear: f32,
}

/// Offsets `0..len` along one axis whose pixels land inside `0..limit`
/// when the span starts at `start`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn visible_span(start: i64, len: u32, limit: u32) -> std::ops::Range<u32> {
    let first = (-start).clamp(0, i64::from(len));
    let last = (i64::from(limit) - start).clamp(first, i64::from(len));
    first as u32..last as u32
}

const fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// Composite `fg` at `alpha` over `bg` (straight alpha).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    if alpha == 255 {
        return Rgba([fg[0], fg[1], fg[2], 255]);
    }
    if alpha == 0 {
        return bg;
    }
    let a = f32::from(alpha) / 255.0;
    let bg_a = f32::from(bg[3]) / 255.0 * (1.0 - a);
    let out_a = a + bg_a;
    let channel = |i: usize| {
        (f32::from(fg[i]).mul_add(a, f32::from(bg[i]) * bg_a) / out_a).round() as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}
