//! Run styles.
//!
//! A [`Style`] is a plain value. The tokenizer keeps one as its style
//! cursor and derives a new value for every control character or tag; a
//! style attached to a run is never changed afterwards.

use serde::Serialize;

use crate::color::Color;
use crate::font::FontRef;

/// One of the four flag toggles, each bound to a control character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// `/`
    Italic,
    /// `*`
    Bold,
    /// `_`
    Underline,
    /// `~`
    Strikethrough,
}

impl Toggle {
    /// The toggle bound to `c`, if any.
    #[must_use]
    pub const fn from_control(c: char) -> Option<Self> {
        match c {
            '/' => Some(Self::Italic),
            '*' => Some(Self::Bold),
            '_' => Some(Self::Underline),
            '~' => Some(Self::Strikethrough),
            _ => None,
        }
    }

    /// The control character for this toggle.
    #[must_use]
    pub const fn control_char(self) -> char {
        match self {
            Self::Italic => '/',
            Self::Bold => '*',
            Self::Underline => '_',
            Self::Strikethrough => '~',
        }
    }
}

/// Fully resolved style of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Style {
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Line under the text.
    pub underline: bool,
    /// Line through the text.
    pub strikethrough: bool,
    /// Glyph fill color.
    pub fill_color: Color,
    /// Glyph outline color.
    pub outline_color: Color,
    /// Outline thickness in pixels, 0 = no outline.
    pub outline_thickness: f32,
    /// Font used to measure and draw the run. `None` until a font is
    /// established, and laying out a run without one is an error.
    pub font: Option<FontRef>,
}

impl Style {
    /// The regular style: no flags, white fill and outline, no outline, no font.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            fill_color: Color::WHITE,
            outline_color: Color::WHITE,
            outline_thickness: 0.0,
            font: None,
        }
    }

    /// The regular style with `font` already established.
    #[must_use]
    pub fn with_initial_font(font: FontRef) -> Self {
        let mut style = Self::new();
        style.font = Some(font);
        style
    }

    /// Whether `toggle` is currently on.
    #[must_use]
    pub const fn is_set(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Italic => self.italic,
            Toggle::Bold => self.bold,
            Toggle::Underline => self.underline,
            Toggle::Strikethrough => self.strikethrough,
        }
    }

    /// This style with `toggle` flipped.
    #[must_use]
    pub fn toggled(mut self, toggle: Toggle) -> Self {
        let flag = match toggle {
            Toggle::Italic => &mut self.italic,
            Toggle::Bold => &mut self.bold,
            Toggle::Underline => &mut self.underline,
            Toggle::Strikethrough => &mut self.strikethrough,
        };
        *flag = !*flag;
        self
    }

    /// This style with a new fill color.
    #[must_use]
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    /// This style with a new outline color.
    #[must_use]
    pub fn with_outline_color(mut self, color: Color) -> Self {
        self.outline_color = color;
        self
    }

    /// This style with a new outline thickness.
    #[must_use]
    pub fn with_outline_thickness(mut self, thickness: f32) -> Self {
        self.outline_thickness = thickness;
        self
    }

    /// This style with a new font.
    #[must_use]
    pub fn with_font(mut self, font: FontRef) -> Self {
        self.font = Some(font);
        self
    }

    /// True when no flag is set.
    #[must_use]
    pub const fn is_regular(&self) -> bool {
        !(self.bold || self.italic || self.underline || self.strikethrough)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}
