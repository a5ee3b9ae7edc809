//! Markup tokenizer module.

/// Markup token types.
pub mod token;
/// Markup tokenizer implementation.
pub mod tokenizer;

pub use token::{MarkupToken, Tag};
pub use tokenizer::{MarkupTokenizer, tokenize_markup};
