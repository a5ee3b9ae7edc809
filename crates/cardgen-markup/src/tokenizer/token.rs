use std::fmt;

use crate::line::Alignment;
use crate::style::Toggle;

/// A token of the markup language.
///
/// The stream is flat: tags never nest, and everything the tokenizer knows
/// about layout is that a [`MarkupToken::Newline`] ends a line.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupToken {
    /// Literal text: plain code points and escaped control characters,
    /// coalesced into the longest possible span.
    Text(String),

    /// A bare `/`, `*`, `_` or `~`.
    Toggle(Toggle),

    /// A recognized `[command argument]` tag.
    Tag(Tag),

    /// An unescaped line feed.
    Newline,
}

impl MarkupToken {
    /// The literal text of a [`MarkupToken::Text`] token.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A parsed tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// `[fill-color <color>]`, holding the unresolved color token.
    FillColor(String),
    /// `[outline-color <color>]`, holding the unresolved color token.
    OutlineColor(String),
    /// `[outline-thickness <number>]`.
    OutlineThickness(f32),
    /// `[font <path-or-id>]`, holding the identifier verbatim.
    Font(String),
    /// `[align left|center|right]`.
    Align(Alignment),
}

impl Tag {
    /// The command word that introduces this tag.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Self::FillColor(_) => "fill-color",
            Self::OutlineColor(_) => "outline-color",
            Self::OutlineThickness(_) => "outline-thickness",
            Self::Font(_) => "font",
            Self::Align(_) => "align",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FillColor(arg) | Self::OutlineColor(arg) | Self::Font(arg) => {
                write!(f, "[{} {arg}]", self.command())
            }
            Self::OutlineThickness(value) => write!(f, "[{} {value}]", self.command()),
            Self::Align(alignment) => write!(f, "[{} {alignment}]", self.command()),
        }
    }
}
