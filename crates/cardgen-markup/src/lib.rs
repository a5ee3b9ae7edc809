//! Rich-markup text engine for the cardgen renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Color model** ([`color`]) - named palette registry and lenient hex parsing
//! - **Style model** ([`style`]) - toggled flags, colors, outline and font per run
//! - **Markup tokenizer** ([`tokenizer`]) - turns markup source into a flat
//!   token stream of text, toggles, tags and newlines
//! - **Line builder** ([`line`]) - folds the token stream into lines of
//!   independently styled runs
//! - **Layout engine** ([`layout`]) - positions every run and computes the
//!   tight bounding box, including per-line alignment
//! - **Rich text** ([`rich_text`]) - a stateful facade that re-typesets when
//!   its source or character size changes
//!
//! Fonts are external collaborators: the engine only talks to them through
//! the [`FontResolver`] and [`FontMeasurer`] traits.
//!
//! # Markup
//!
//! ```text
//! /italic/  *bold*  _underline_  ~strikethrough~
//! \*  \/  \_  \~  \[  \\            literal control characters
//! [fill-color red]  [outline-color ff00ff00]  [outline-thickness 1.5]
//! [font fonts/serif.ttf]  [align center]
//! ```
//!
//! # Not Yet Implemented
//!
//! - Wrapping text to a fixed width
//! - Bidirectional text
//! - Kerning and shaping beyond what the measurer reports

/// Named and hexadecimal colors.
pub mod color;
/// Error taxonomy for tokenizing and laying out markup.
pub mod error;
/// Font collaborator traits and a fixed-ratio implementation.
pub mod font;
/// Run positioning and bounds computation.
pub mod layout;
/// Lines, runs and the style cursor that builds them.
pub mod line;
/// Stateful rich-text facade.
pub mod rich_text;
/// Run style values.
pub mod style;
/// Markup tokenizer.
pub mod tokenizer;

pub use color::{Color, ColorRegistry};
pub use error::{FontLoadError, MarkupError};
pub use font::{FixedFontMetrics, FontCache, FontLoader, FontMeasurer, FontRef, FontResolver};
pub use layout::{LayoutOptions, Point, PositionedRun, Rect, TextLayout, layout};
pub use line::{Alignment, Line, Run, tokenize};
pub use rich_text::RichText;
pub use style::{Style, Toggle};
pub use tokenizer::{MarkupToken, MarkupTokenizer, Tag};

/// Tokenize `source` and lay it out in one step.
///
/// `style` is the initial style cursor; on success it holds the style in
/// effect at the end of the source. Color tokens resolve through `colors`,
/// `[font ...]` tags and the final measurement go through `fonts`.
///
/// # Errors
///
/// Returns the first [`MarkupError`] raised by either stage. No partial
/// layout is produced.
pub fn typeset<F>(
    source: &str,
    style: &mut Style,
    colors: &ColorRegistry,
    fonts: &mut F,
    options: &LayoutOptions,
) -> Result<TextLayout, MarkupError>
where
    F: FontResolver + FontMeasurer + ?Sized,
{
    let lines = tokenize(source, style, colors, fonts)?;
    layout(lines, &*fonts, options)
}
