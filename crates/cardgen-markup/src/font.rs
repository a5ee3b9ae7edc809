//! Font collaborator interfaces.
//!
//! The engine never touches font files. `[font ...]` tags go through a
//! [`FontResolver`], which hands back a [`FontRef`] handle, and layout asks a
//! [`FontMeasurer`] how far each run advances the pen and how tall its line is.
//!
//! [`FontCache`] is the usual resolver: it loads each identifier once
//! through a [`FontLoader`] and keeps the result for the engine's lifetime.
//! [`FixedFontMetrics`] implements both traits with fixed ratios. It is used when no
//! real font data is wanted, and in tests.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::FontLoadError;
use crate::layout::Rect;
use crate::style::Style;

/// Handle to a resolved font.
///
/// Two handles are equal when they came from the same resolver slot, so a
/// resolver that caches by identifier gives the same handle for every
/// reference to the same font.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FontRef {
    #[serde(skip)]
    index: usize,
    name: String,
}

impl FontRef {
    /// Create a handle for slot `index` of a resolver, named by the
    /// identifier it was resolved from.
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    /// The resolver slot this handle points at.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The identifier or path the font was resolved from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Resolves font identifiers (usually file paths) to handles.
///
/// Implementations are expected to cache by identifier: the first
/// reference loads the font and later references reuse it.
pub trait FontResolver {
    /// Resolve `id` to a font handle.
    ///
    /// # Errors
    ///
    /// Returns [`FontLoadError`] if the font cannot be found or loaded.
    fn resolve(&mut self, id: &str) -> Result<FontRef, FontLoadError>;
}

/// Text measurement for laying out runs.
///
/// All methods must be deterministic for fixed inputs.
pub trait FontMeasurer {
    /// The pen x position right after `text`, when drawn starting at `start_x`.
    fn advance(
        &self,
        font: &FontRef,
        character_size: f32,
        style: &Style,
        text: &str,
        start_x: f32,
    ) -> f32;

    /// Distance between consecutive baselines for `font` at `character_size`.
    fn line_spacing(&self, font: &FontRef, character_size: f32) -> f32;

    /// Extent of the glyphs of `text` relative to the run's origin.
    ///
    /// The default covers the advance box, one line-spacing tall, grown on
    /// every side by the outline thickness.
    fn text_bounds(&self, font: &FontRef, character_size: f32, style: &Style, text: &str) -> Rect {
        if text.is_empty() {
            return Rect::default();
        }
        let width = self.advance(font, character_size, style, text, 0.0);
        let height = self.line_spacing(font, character_size);
        let outline = style.outline_thickness.max(0.0);
        Rect::new(
            -outline,
            -outline,
            2.0f32.mul_add(outline, width),
            2.0f32.mul_add(outline, height),
        )
    }
}

/// Loads font data for a [`FontCache`].
pub trait FontLoader {
    /// Loaded font data.
    type Font;

    /// Load the font identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FontLoadError`] if the font cannot be read or parsed.
    fn load(&mut self, id: &str) -> Result<Self::Font, FontLoadError>;
}

/// Font cache keyed by identifier.
///
/// Fonts are loaded lazily on first reference and reused thereafter.
/// Entries are never evicted. A failed load is not cached, so a later
/// reference retries.
pub struct FontCache<L: FontLoader> {
    loader: L,
    by_id: HashMap<String, usize>,
    fonts: Vec<L::Font>,
}

impl<L: FontLoader> FontCache<L> {
    /// An empty cache loading through `loader`.
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            by_id: HashMap::new(),
            fonts: Vec::new(),
        }
    }

    /// The loaded font behind `font`, if it came from this cache.
    #[must_use]
    pub fn get(&self, font: &FontRef) -> Option<&L::Font> {
        self.fonts.get(font.index())
    }

    /// The handle for an already loaded identifier.
    #[must_use]
    pub fn cached(&self, id: &str) -> Option<FontRef> {
        self.by_id.get(id).map(|&index| FontRef::new(index, id))
    }

    /// Number of loaded fonts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether nothing has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// The underlying loader.
    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: FontLoader> FontResolver for FontCache<L> {
    fn resolve(&mut self, id: &str) -> Result<FontRef, FontLoadError> {
        if let Some(font) = self.cached(id) {
            return Ok(font);
        }
        let font = self.loader.load(id)?;
        self.fonts.push(font);
        let index = self.fonts.len() - 1;
        let _ = self.by_id.insert(id.to_string(), index);
        Ok(FontRef::new(index, id))
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Every glyph advances `character_size × ADVANCE_RATIO × scale` and lines
/// are `character_size × LINE_SPACING_RATIO × scale` apart, where `scale` is
/// the per-font factor given at registration. Bold advances like regular.
///
/// Only registered fonts resolve; anything else is a [`FontLoadError`].
#[derive(Debug, Clone, Default)]
pub struct FixedFontMetrics {
    by_name: HashMap<String, usize>,
    scales: Vec<f32>,
    resolutions: usize,
}

impl FixedFontMetrics {
    /// Advance of one glyph as a fraction of the character size.
    pub const ADVANCE_RATIO: f32 = 0.5;
    /// Line spacing as a fraction of the character size.
    pub const LINE_SPACING_RATIO: f32 = 1.25;

    /// Metrics with no fonts registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics with a single font registered at scale 1.
    #[must_use]
    pub fn with_font(name: &str) -> Self {
        let mut metrics = Self::new();
        metrics.register(name, 1.0);
        metrics
    }

    /// Make `name` resolvable, with all of its metrics multiplied by `scale`.
    pub fn register(&mut self, name: &str, scale: f32) {
        self.scales.push(scale);
        let _ = self.by_name.insert(name.to_string(), self.scales.len() - 1);
    }

    /// How many successful `resolve` calls have been made.
    #[must_use]
    pub const fn resolutions(&self) -> usize {
        self.resolutions
    }

    fn scale(&self, font: &FontRef) -> f32 {
        self.scales.get(font.index()).copied().unwrap_or(1.0)
    }
}

impl FontResolver for FixedFontMetrics {
    fn resolve(&mut self, id: &str) -> Result<FontRef, FontLoadError> {
        let index = *self
            .by_name
            .get(id)
            .ok_or_else(|| FontLoadError::new(id, "no such font"))?;
        self.resolutions += 1;
        Ok(FontRef::new(index, id))
    }
}

impl FontMeasurer for FixedFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn advance(
        &self,
        font: &FontRef,
        character_size: f32,
        _style: &Style,
        text: &str,
        start_x: f32,
    ) -> f32 {
        let glyphs = text.chars().filter(|c| !c.is_control()).count() as f32;
        (glyphs * character_size * Self::ADVANCE_RATIO).mul_add(self.scale(font), start_x)
    }

    fn line_spacing(&self, font: &FontRef, character_size: f32) -> f32 {
        character_size * Self::LINE_SPACING_RATIO * self.scale(font)
    }
}
