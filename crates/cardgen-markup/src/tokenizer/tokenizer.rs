use super::token::{MarkupToken, Tag};
use crate::error::MarkupError;
use crate::line::Alignment;
use crate::style::Toggle;

/// Markup tokenizer.
///
/// Scans the source code point by code point:
///
/// | Input | Token |
/// |---|---|
/// | `/` `*` `_` `~` | [`MarkupToken::Toggle`] |
/// | `\X` | `X` appended to the current text, `X` one of `/ * _ ~ [ \` |
/// | `[cmd arg]` | [`MarkupToken::Tag`] |
/// | line feed | [`MarkupToken::Newline`] |
/// | anything else, including a stray `]` | appended to the current text |
///
/// The tokenizer knows nothing about styles, colors or fonts: tag arguments
/// are validated for shape only and resolved later by the line builder.
pub struct MarkupTokenizer {
    /// The source as code points
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Text collected since the last non-text token
    pending_text: String,
    /// Collected tokens
    tokens: Vec<MarkupToken>,
}

impl MarkupTokenizer {
    /// Create a new tokenizer over `input`.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into().chars().collect(),
            position: 0,
            pending_text: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input.
    ///
    /// # Errors
    ///
    /// Returns the first malformed construct found. Tokens collected before
    /// the error are discarded, so a failed run leaves no partial output.
    pub fn run(&mut self) -> Result<(), MarkupError> {
        let result = self.consume_all();
        if result.is_err() {
            self.tokens.clear();
            self.pending_text.clear();
        }
        result
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<MarkupToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[MarkupToken] {
        &self.tokens
    }

    fn consume_all(&mut self) -> Result<(), MarkupError> {
        while let Some(c) = self.consume() {
            let offset = self.position - 1;

            if let Some(toggle) = Toggle::from_control(c) {
                self.emit(MarkupToken::Toggle(toggle));
                continue;
            }

            match c {
                '[' => {
                    let tag = self.consume_tag(offset)?;
                    self.emit(MarkupToken::Tag(tag));
                }
                '\\' => self.consume_escape(offset)?,
                '\n' => self.emit(MarkupToken::Newline),
                _ => self.pending_text.push(c),
            }
        }
        self.flush_text();
        Ok(())
    }

    /// Consume the character after a backslash.
    fn consume_escape(&mut self, offset: usize) -> Result<(), MarkupError> {
        match self.consume() {
            Some(c @ ('/' | '*' | '_' | '~' | '[' | '\\')) => {
                self.pending_text.push(c);
                Ok(())
            }
            Some(found) => Err(MarkupError::InvalidEscape { found, offset }),
            None => Err(MarkupError::DanglingEscape { offset }),
        }
    }

    /// Consume a tag body after its `[`, up to and including the next `]`.
    ///
    /// The body is `command` optionally followed by one space and an
    /// argument running to the `]`. Nothing inside a tag is escaped.
    fn consume_tag(&mut self, offset: usize) -> Result<Tag, MarkupError> {
        let body_start = self.position;
        let body_len = self.input[body_start..]
            .iter()
            .position(|&c| c == ']')
            .ok_or(MarkupError::UnterminatedTag { offset })?;
        let body: String = self.input[body_start..body_start + body_len]
            .iter()
            .collect();
        self.position = body_start + body_len + 1;

        let (command, arg) = body.split_once(' ').unwrap_or((body.as_str(), ""));
        match command {
            "fill-color" => Ok(Tag::FillColor(color_token(arg))),
            "outline-color" => Ok(Tag::OutlineColor(color_token(arg))),
            "outline-thickness" => match arg.trim().parse::<f32>() {
                Ok(value) if value.is_finite() => Ok(Tag::OutlineThickness(value)),
                _ => Err(MarkupError::InvalidNumber {
                    value: arg.to_string(),
                    offset,
                }),
            },
            "font" => Ok(Tag::Font(arg.to_string())),
            "align" => arg
                .parse::<Alignment>()
                .map(Tag::Align)
                .map_err(|()| MarkupError::InvalidAlignment {
                    value: arg.to_string(),
                    offset,
                }),
            _ => Err(MarkupError::UnknownTag {
                command: command.to_string(),
                offset,
            }),
        }
    }

    fn emit(&mut self, token: MarkupToken) {
        self.flush_text();
        self.tokens.push(token);
    }

    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let text = std::mem::take(&mut self.pending_text);
            self.tokens.push(MarkupToken::Text(text));
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }
}

/// The color token of a color tag argument: its leading run of
/// non-whitespace characters.
fn color_token(arg: &str) -> String {
    arg.chars().take_while(|c| !c.is_whitespace()).collect()
}

/// Tokenize `source` in one call.
///
/// # Errors
///
/// See [`MarkupTokenizer::run`].
pub fn tokenize_markup(source: &str) -> Result<Vec<MarkupToken>, MarkupError> {
    let mut tokenizer = MarkupTokenizer::new(source);
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}
