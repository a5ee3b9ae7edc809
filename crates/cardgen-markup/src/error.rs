//! Markup errors.
//!
//! Every error here is a deterministic input-validation failure: the whole
//! markup string is rejected and no partial runs are returned. Color
//! resolution is deliberately absent; unknown colors degrade to the default.

use thiserror::Error;

/// A font identifier that the font collaborator could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not load font from \"{font}\": {reason}")]
pub struct FontLoadError {
    /// The identifier or path given in the `[font ...]` tag.
    pub font: String,
    /// Why the collaborator failed.
    pub reason: String,
}

impl FontLoadError {
    /// Create a new font load error.
    #[must_use]
    pub fn new(font: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while tokenizing or laying out markup.
///
/// Offsets count code points (not bytes) from the start of the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A `[` with no closing `]` before the end of input.
    #[error("missing ']' in tag opened at offset {offset}")]
    UnterminatedTag {
        /// Offset of the opening `[`.
        offset: usize,
    },

    /// A `\` followed by something other than a control character.
    #[error("cannot escape non-control character '{found}' at offset {offset}")]
    InvalidEscape {
        /// The character after the backslash.
        found: char,
        /// Offset of the backslash.
        offset: usize,
    },

    /// A `\` as the very last character of the source.
    #[error("expected formatting control character after '\\' at offset {offset}")]
    DanglingEscape {
        /// Offset of the backslash.
        offset: usize,
    },

    /// A tag whose command is not recognized.
    #[error("unknown tag command '{command}' at offset {offset}")]
    UnknownTag {
        /// The command word.
        command: String,
        /// Offset of the opening `[`.
        offset: usize,
    },

    /// An `[align ...]` tag with a value other than left, center or right.
    #[error("invalid alignment '{value}' at offset {offset}")]
    InvalidAlignment {
        /// The rejected argument.
        value: String,
        /// Offset of the opening `[`.
        offset: usize,
    },

    /// An `[outline-thickness ...]` tag whose argument is not a finite number.
    #[error("invalid number '{value}' at offset {offset}")]
    InvalidNumber {
        /// The rejected argument.
        value: String,
        /// Offset of the opening `[`.
        offset: usize,
    },

    /// The font collaborator failed to resolve a `[font ...]` tag.
    #[error(transparent)]
    FontLoad(#[from] FontLoadError),

    /// A run reached layout without any font established.
    #[error("text on line {line} has no font; set one with [font ...] first")]
    MissingFont {
        /// Zero-based index of the offending line.
        line: usize,
    },
}
