//! Font loading and metrics backed by fontdue.
//!
//! [`FontLibrary`] is the font collaborator handed to the markup engine: it
//! resolves `[font ...]` paths through a [`FontCache`] (each file is read
//! and parsed once) and measures runs with fontdue's per-glyph metrics.
//! Measurements use `Font::metrics()` rather than `Font::rasterize()` so no
//! bitmaps are generated when only sizes are needed.

use std::fs;

use cardgen_markup::{
    FontCache, FontLoadError, FontLoader, FontMeasurer, FontRef, FontResolver, Rect, Style,
};
use fontdue::{Font, FontSettings};

/// Horizontal shear applied to italic runs, in pixels per pixel of height
/// above the baseline.
pub const ITALIC_SHEAR: f32 = 0.2;

/// Line spacing used when a font carries no horizontal line metrics.
const FALLBACK_LINE_SPACING_RATIO: f32 = 1.2;

/// Extra advance per glyph for synthesized bold, as a fraction of the
/// character size (at least one pixel).
const BOLD_OFFSET_RATIO: f32 = 0.03;

/// Loads font files from disk.
#[derive(Debug, Default)]
pub struct FontFileLoader {
    verbose: bool,
}

impl FontFileLoader {
    /// A loader that prints each font it loads when `verbose` is set.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl FontLoader for FontFileLoader {
    type Font = Font;

    fn load(&mut self, id: &str) -> Result<Font, FontLoadError> {
        let data = fs::read(id).map_err(|e| FontLoadError::new(id, e.to_string()))?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| FontLoadError::new(id, e))?;
        if self.verbose {
            eprintln!("Loaded font: {id}");
        }
        Ok(font)
    }
}

/// Fonts referenced by card markup, loaded on first use.
pub struct FontLibrary {
    cache: FontCache<FontFileLoader>,
}

impl FontLibrary {
    /// An empty library.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            cache: FontCache::new(FontFileLoader::new(verbose)),
        }
    }

    /// The fontdue font behind `font`.
    #[must_use]
    pub fn font(&self, font: &FontRef) -> Option<&Font> {
        self.cache.get(font)
    }

    /// Number of fonts loaded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no font has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Distance from the top of a line to its baseline.
    #[must_use]
    pub fn ascent(&self, font: &FontRef, character_size: f32) -> f32 {
        self.font(font)
            .and_then(|f| f.horizontal_line_metrics(character_size))
            .map_or(character_size, |m| m.ascent)
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new(false)
    }
}

impl FontResolver for FontLibrary {
    fn resolve(&mut self, id: &str) -> Result<FontRef, FontLoadError> {
        self.cache.resolve(id)
    }
}

/// Extra pixels each glyph advances and is thickened by when bold.
#[must_use]
pub fn bold_offset(character_size: f32) -> f32 {
    (character_size * BOLD_OFFSET_RATIO).max(1.0)
}

impl FontMeasurer for FontLibrary {
    fn advance(
        &self,
        font: &FontRef,
        character_size: f32,
        style: &Style,
        text: &str,
        start_x: f32,
    ) -> f32 {
        let Some(face) = self.font(font) else {
            return start_x;
        };
        let bold = if style.bold {
            bold_offset(character_size)
        } else {
            0.0
        };

        let mut x = start_x;
        let mut previous: Option<char> = None;
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            if let Some(prev) = previous {
                x += face.horizontal_kern(prev, ch, character_size).unwrap_or(0.0);
            }
            x += face.metrics(ch, character_size).advance_width + bold;
            previous = Some(ch);
        }
        x
    }

    fn line_spacing(&self, font: &FontRef, character_size: f32) -> f32 {
        self.font(font)
            .and_then(|f| f.horizontal_line_metrics(character_size))
            .map_or(character_size * FALLBACK_LINE_SPACING_RATIO, |m| {
                m.new_line_size
            })
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_bounds(&self, font: &FontRef, character_size: f32, style: &Style, text: &str) -> Rect {
        let Some(face) = self.font(font) else {
            return Rect::default();
        };
        if text.is_empty() {
            return Rect::default();
        }

        let baseline = self.ascent(font, character_size);
        let bold = if style.bold {
            bold_offset(character_size)
        } else {
            0.0
        };

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut pen = 0.0;
        let mut previous: Option<char> = None;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            if let Some(prev) = previous {
                pen += face.horizontal_kern(prev, ch, character_size).unwrap_or(0.0);
            }
            let metrics = face.metrics(ch, character_size);
            if metrics.width > 0 && metrics.height > 0 {
                let top = baseline - (metrics.ymin as f32 + metrics.height as f32);
                let bottom = baseline - metrics.ymin as f32;
                let mut left = pen + metrics.xmin as f32;
                let mut right = left + metrics.width as f32 + bold;
                if style.italic {
                    // Rows above the baseline lean right, descenders left.
                    right += (baseline - top).max(0.0) * ITALIC_SHEAR;
                    left -= (bottom - baseline).max(0.0) * ITALIC_SHEAR;
                }
                min_x = min_x.min(left);
                max_x = max_x.max(right);
                min_y = min_y.min(top);
                max_y = max_y.max(bottom);
            }
            pen += metrics.advance_width + bold;
            previous = Some(ch);
        }

        if style.underline || style.strikethrough {
            let (top, bottom) = decoration_span(baseline, character_size, style);
            min_x = min_x.min(0.0);
            max_x = max_x.max(pen);
            min_y = min_y.min(top);
            max_y = max_y.max(bottom);
        }

        if min_x > max_x {
            // Whitespace only: no ink.
            return Rect::default();
        }

        let outline = style.outline_thickness.max(0.0);
        Rect::new(
            min_x - outline,
            min_y - outline,
            2.0f32.mul_add(outline, max_x - min_x),
            2.0f32.mul_add(outline, max_y - min_y),
        )
    }
}

/// Thickness of underline and strikethrough bars.
#[must_use]
pub fn decoration_thickness(character_size: f32) -> f32 {
    (character_size / 15.0).max(1.0)
}

/// Vertical offset of the underline below the baseline.
#[must_use]
pub fn underline_offset(character_size: f32) -> f32 {
    character_size / 10.0
}

/// Vertical offset of the strikethrough above the baseline.
#[must_use]
pub fn strikethrough_offset(character_size: f32) -> f32 {
    character_size * 0.3
}

/// Top and bottom of the decorations `style` asks for.
fn decoration_span(baseline: f32, character_size: f32, style: &Style) -> (f32, f32) {
    let thickness = decoration_thickness(character_size);
    let underline_top = baseline + underline_offset(character_size);
    let strike_top = baseline - strikethrough_offset(character_size);
    match (style.underline, style.strikethrough) {
        (true, true) => (strike_top, underline_top + thickness),
        (true, false) => (underline_top, underline_top + thickness),
        _ => (strike_top, strike_top + thickness),
    }
}
