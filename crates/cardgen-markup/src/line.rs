//! Lines and runs.
//!
//! The line builder folds the tokenizer's flat stream into [`Line`]s of
//! [`Run`]s. It owns the style cursor: a single [`Style`] value that every
//! toggle and tag replaces with a modified copy, and that persists across
//! newlines.
//!
//! Run splitting: a cursor change that alters the style starts a new run,
//! unless the current run has no text yet, in which case that run's style is
//! overwritten in place. Alignment tags change the line, never the cursor.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::ColorRegistry;
use crate::error::MarkupError;
use crate::font::FontResolver;
use crate::style::Style;
use crate::tokenizer::{MarkupToken, Tag, tokenize_markup};
use cardgen_common::warning::warn_once;

/// Horizontal alignment of a line within the text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush with the left edge.
    #[default]
    Left,
    /// Centered in the available width.
    Center,
    /// Flush with the right edge of the available width.
    Right,
}

impl Alignment {
    /// Fraction of the free space placed before the line.
    #[must_use]
    pub const fn offset_factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

/// A span of text sharing one fully resolved style.
///
/// A run may be empty: a style change that no text has followed yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// Style the text is drawn with.
    pub style: Style,
    /// The text, control characters already resolved.
    pub text: String,
}

impl Run {
    /// An empty run carrying `style`.
    #[must_use]
    pub const fn new(style: Style) -> Self {
        Self {
            style,
            text: String::new(),
        }
    }

    /// A run of `text` carrying `style`.
    #[must_use]
    pub fn with_text(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// Runs between two newlines, drawn left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// Runs in drawing order. Never empty.
    pub runs: Vec<Run>,
    /// Alignment from the line's first `[align ...]` tag, `None` when the
    /// line has none (drawn left-aligned).
    pub alignment: Option<Alignment>,
}

impl Line {
    /// A line holding one empty run with `style`.
    #[must_use]
    pub fn new(style: Style) -> Self {
        Self {
            runs: vec![Run::new(style)],
            alignment: None,
        }
    }

    /// The alignment layout applies to this line.
    #[must_use]
    pub fn effective_alignment(&self) -> Alignment {
        self.alignment.unwrap_or_default()
    }

    /// The line's text with all styling removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Folds markup tokens into lines, resolving colors and fonts as it goes.
pub struct LineBuilder<'a, R: ?Sized> {
    colors: &'a ColorRegistry,
    fonts: &'a mut R,
    cursor: Style,
    lines: Vec<Line>,
}

impl<'a, R: FontResolver + ?Sized> LineBuilder<'a, R> {
    /// Start building with `initial_style` as the style cursor.
    #[must_use]
    pub fn new(initial_style: Style, colors: &'a ColorRegistry, fonts: &'a mut R) -> Self {
        Self {
            colors,
            fonts,
            lines: vec![Line::new(initial_style.clone())],
            cursor: initial_style,
        }
    }

    /// Apply one token.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::FontLoad`] when a `[font ...]` tag cannot be
    /// resolved.
    pub fn push(&mut self, token: MarkupToken) -> Result<(), MarkupError> {
        match token {
            MarkupToken::Text(text) => self.current_run().text.push_str(&text),
            MarkupToken::Toggle(toggle) => {
                let style = self.cursor.clone().toggled(toggle);
                self.apply_style(style);
            }
            MarkupToken::Tag(tag) => self.apply_tag(tag)?,
            MarkupToken::Newline => self.lines.push(Line::new(self.cursor.clone())),
        }
        Ok(())
    }

    /// The current style cursor.
    #[must_use]
    pub const fn cursor(&self) -> &Style {
        &self.cursor
    }

    /// Finish, returning the lines and the final style cursor.
    #[must_use]
    pub fn finish(self) -> (Vec<Line>, Style) {
        (self.lines, self.cursor)
    }

    fn apply_tag(&mut self, tag: Tag) -> Result<(), MarkupError> {
        let style = match tag {
            Tag::FillColor(token) => {
                let color = self.colors.resolve(&token);
                self.cursor.clone().with_fill_color(color)
            }
            Tag::OutlineColor(token) => {
                let color = self.colors.resolve(&token);
                self.cursor.clone().with_outline_color(color)
            }
            Tag::OutlineThickness(thickness) => {
                if thickness < 0.0 {
                    let _ = warn_once(
                        "markup",
                        &format!("negative outline thickness {thickness}, using 0"),
                    );
                }
                self.cursor.clone().with_outline_thickness(thickness.max(0.0))
            }
            Tag::Font(id) => {
                let font = self.fonts.resolve(&id)?;
                self.cursor.clone().with_font(font)
            }
            Tag::Align(alignment) => {
                let line = self.current_line();
                if line.alignment.is_none() {
                    line.alignment = Some(alignment);
                }
                return Ok(());
            }
        };
        self.apply_style(style);
        Ok(())
    }

    /// Move the cursor to `style`, splitting or rewriting the current run.
    fn apply_style(&mut self, style: Style) {
        if style == self.cursor {
            return;
        }
        self.cursor = style;
        let cursor = self.cursor.clone();
        let line = self.current_line();
        match line.runs.last_mut() {
            Some(run) if run.text.is_empty() => run.style = cursor,
            _ => line.runs.push(Run::new(cursor)),
        }
    }

    fn current_line(&mut self) -> &mut Line {
        if self.lines.is_empty() {
            self.lines.push(Line::new(self.cursor.clone()));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn current_run(&mut self) -> &mut Run {
        let cursor = self.cursor.clone();
        let line = self.current_line();
        if line.runs.is_empty() {
            line.runs.push(Run::new(cursor));
        }
        let last = line.runs.len() - 1;
        &mut line.runs[last]
    }
}

/// Tokenize `source` into lines of styled runs.
///
/// `style` is the style cursor: its value on entry is the initial style of
/// the first run, and on success it holds the style in effect at the end of
/// the source. On error it is left unchanged.
///
/// # Errors
///
/// Returns the first tokenizer error, or [`MarkupError::FontLoad`] when a
/// font tag cannot be resolved. No lines are returned on error.
pub fn tokenize<R: FontResolver + ?Sized>(
    source: &str,
    style: &mut Style,
    colors: &ColorRegistry,
    fonts: &mut R,
) -> Result<Vec<Line>, MarkupError> {
    let tokens = tokenize_markup(source)?;
    let mut builder = LineBuilder::new(style.clone(), colors, fonts);
    for token in tokens {
        builder.push(token)?;
    }
    let (lines, cursor) = builder.finish();
    *style = cursor;
    Ok(lines)
}
