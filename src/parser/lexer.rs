use std::char;

use derive_more::with_trait::{Display, Error};

use crate::parser::{SourceLocation, SourceText, Spanning, TokenStream};

#[doc(hidden)]
#[derive(Debug)]
pub struct Lexer<'a> {
    source: SourceText<'a>,
    has_reached_eof: bool,
}

/// Type of a single lexical token.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum TokenType {
    #[display("!")]
    Bang,
    #[display("$")]
    Dollar,
    #[display("&")]
    Ampersand,
    #[display("(")]
    ParenOpen,
    #[display(")")]
    ParenClose,
    #[display("...")]
    Spread,
    #[display(":")]
    Colon,
    #[display("=")]
    Equals,
    #[display("@")]
    At,
    #[display("[")]
    BracketOpen,
    #[display("]")]
    BracketClose,
    #[display("{{")]
    CurlyOpen,
    #[display("}}")]
    CurlyClose,
    #[display("|")]
    Pipe,
    #[display(",")]
    Comma,
    #[display("Comment")]
    Comment,
    #[display("Name")]
    Name,
    #[display("null")]
    Null,
    #[display("Int")]
    Int,
    #[display("Float")]
    Float,
    #[display("String")]
    String,
    #[display("BlockString")]
    BlockString,
    #[display("End of file")]
    EndOfFile,
}

/// Coarse classification of [`TokenType`]s.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum TokenClass {
    /// Single glyph (or `...`) punctuators.
    Punctuator,

    /// Names, keywords included.
    Name,

    /// Literal values: numbers, strings and `null`.
    Value,

    /// Tokens skipped by the parser: comments and commas.
    Ignored,

    /// The end of the source.
    #[display("End of file")]
    EndOfFile,
}

impl TokenType {
    /// Returns the [`TokenClass`] this [`TokenType`] belongs to.
    pub fn class(self) -> TokenClass {
        match self {
            Self::Name => TokenClass::Name,
            Self::Null | Self::Int | Self::Float | Self::String | Self::BlockString => {
                TokenClass::Value
            }
            Self::Comment | Self::Comma => TokenClass::Ignored,
            Self::EndOfFile => TokenClass::EndOfFile,
            Self::Bang
            | Self::Dollar
            | Self::Ampersand
            | Self::ParenOpen
            | Self::ParenClose
            | Self::Spread
            | Self::Colon
            | Self::Equals
            | Self::At
            | Self::BracketOpen
            | Self::BracketClose
            | Self::CurlyOpen
            | Self::CurlyClose
            | Self::Pipe => TokenClass::Punctuator,
        }
    }

    /// Indicates whether tokens of this type may be skipped transparently.
    pub fn is_ignorable(self) -> bool {
        self.class() == TokenClass::Ignored
    }
}

/// A single token in the input source.
///
/// The `text` is borrowed from the source; string literals keep their quotes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    /// Type of this token.
    pub token_type: TokenType,

    /// Source text of this token.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    #[doc(hidden)]
    pub fn new(token_type: TokenType, text: &'a str) -> Self {
        Self { token_type, text }
    }

    #[doc(hidden)]
    pub fn end_of_file() -> Self {
        Self::new(TokenType::EndOfFile, "")
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::EndOfFile => self.token_type.fmt(f),
            _ => f.write_str(self.text),
        }
    }
}

/// Error when tokenizing the input source
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum LexerError {
    /// An unknown character was found
    ///
    /// Unknown characters are characters that do not occur anywhere in the
    /// GraphQL language, such as `?` or `%`.
    #[display("Unknown character \"{_0}\"")]
    UnknownCharacter(#[error(not(source))] char),

    /// An unexpected character was found
    ///
    /// Unexpected characters are characters that _do_ exist in the GraphQL
    /// language, but is not expected at the current position in the document.
    #[display("Unexpected character \"{_0}\"")]
    UnexpectedCharacter(#[error(not(source))] char),

    /// An unterminated string literal was found
    ///
    /// Apart from forgetting the ending `"`, terminating a string within a
    /// Unicode escape sequence or having a line break in the string also
    /// causes this error.
    #[display("Unterminated string literal")]
    UnterminatedString,

    /// An unterminated block string literal was found.
    #[display("Unterminated block string literal")]
    UnterminatedBlockString,

    /// An unknown character in a string literal was found
    ///
    /// This occurs when an invalid source character is found in a string
    /// literal, such as ASCII control characters.
    #[display("Unknown character \"{_0}\" in string literal")]
    UnknownCharacterInString(#[error(not(source))] char),

    /// An unknown escape sequence in a string literal was found
    ///
    /// Only a limited set of escape sequences are supported, this is emitted
    /// when e.g. `"\l"` is parsed.
    #[display("Unknown escape sequence \"{_0}\" in string")]
    UnknownEscapeSequence(#[error(not(source))] String),

    /// The input source was unexpectedly terminated
    ///
    /// Emitted when the current token requires a succeeding character, but
    /// the source has reached EOF. Emitted when scanning e.g. `"1."`.
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,
}

#[doc(hidden)]
pub type LexerResult<'a> = Result<Spanning<Token<'a>>, Spanning<LexerError>>;

/// Tokenizes the whole `source` into a [`TokenStream`].
///
/// # Errors
///
/// If the `source` contains malformed tokens. Tokenization stops at the
/// first one.
pub fn tokenize(source: &str) -> Result<TokenStream<'_>, Spanning<LexerError>> {
    crate::__span_trace!("tokenize", len = source.len());

    let tokens = Lexer::new(source)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|_e| {
            crate::__trace_debug!(error = %_e, "tokenization failed");
        })?;

    crate::__trace!(tokens = tokens.len(), "source tokenized");

    Ok(TokenStream::new(tokens))
}

impl<'a> Lexer<'a> {
    #[doc(hidden)]
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source: SourceText::new(source),
            has_reached_eof: false,
        }
    }

    fn location(&self) -> SourceLocation {
        self.source.location()
    }

    fn error<T>(&self, error: LexerError) -> Result<T, Spanning<LexerError>> {
        Err(Spanning::zero_width(&self.location(), error))
    }

    fn emit(&self, start_pos: &SourceLocation, token_type: TokenType) -> Spanning<Token<'a>> {
        Spanning::start_end(
            start_pos,
            &self.location(),
            Token::new(token_type, self.source.slice_from(start_pos.index())),
        )
    }

    fn emit_single_char(&mut self, token_type: TokenType) -> Spanning<Token<'a>> {
        let start_pos = self.location();
        self.source.next_char();
        self.emit(&start_pos, token_type)
    }

    fn scan_over_whitespace(&mut self) {
        while let Some(ch) = self.source.peek() {
            if matches!(ch, '\t' | ' ' | '\n' | '\r' | '\u{feff}') {
                self.source.next_char();
            } else {
                break;
            }
        }
    }

    fn scan_comment(&mut self) -> LexerResult<'a> {
        let start_pos = self.location();
        self.source.next_char();

        while let Some(ch) = self.source.peek() {
            if ch == '\n' || ch == '\r' || !is_source_char(ch) {
                break;
            }
            self.source.next_char();
        }

        Ok(self.emit(&start_pos, TokenType::Comment))
    }

    fn scan_spread(&mut self) -> LexerResult<'a> {
        let start_pos = self.location();

        for _ in 0..3 {
            match self.source.peek() {
                Some('.') => {
                    self.source.next_char();
                }
                Some(ch) => return self.error(LexerError::UnexpectedCharacter(ch)),
                None => return self.error(LexerError::UnexpectedEndOfFile),
            }
        }

        Ok(self.emit(&start_pos, TokenType::Spread))
    }

    fn scan_name(&mut self) -> LexerResult<'a> {
        let start_pos = self.location();
        self.source.next_char();

        while let Some(ch) = self.source.peek() {
            if is_name_cont(ch) {
                self.source.next_char();
            } else {
                break;
            }
        }

        let token_type = if self.source.slice_from(start_pos.index()) == "null" {
            TokenType::Null
        } else {
            TokenType::Name
        };

        Ok(self.emit(&start_pos, token_type))
    }

    fn scan_string(&mut self) -> LexerResult<'a> {
        let start_pos = self.location();
        self.source.next_char();

        let mut escaped = false;
        let mut old_pos = self.location();
        while let Some(ch) = self.source.next_char() {
            match ch {
                'b' | 'f' | 'n' | 'r' | 't' | '\\' | '/' | '"' if escaped => {
                    escaped = false;
                }
                'u' if escaped => {
                    self.scan_escaped_unicode(&old_pos)?;
                    escaped = false;
                }
                c if escaped => {
                    return Err(Spanning::zero_width(
                        &old_pos,
                        LexerError::UnknownEscapeSequence(format!("\\{c}")),
                    ));
                }
                '\\' => escaped = true,
                '"' => return Ok(self.emit(&start_pos, TokenType::String)),
                '\n' | '\r' => {
                    return Err(Spanning::zero_width(
                        &old_pos,
                        LexerError::UnterminatedString,
                    ));
                }
                c if !is_source_char(c) => {
                    return Err(Spanning::zero_width(
                        &old_pos,
                        LexerError::UnknownCharacterInString(c),
                    ));
                }
                _ => {}
            }
            old_pos = self.location();
        }

        self.error(LexerError::UnterminatedString)
    }

    fn scan_block_string(&mut self) -> LexerResult<'a> {
        let start_pos = self.location();
        for _ in 0..3 {
            self.source.next_char();
        }

        loop {
            if self.source.starts_with("\\\"\"\"") {
                for _ in 0..4 {
                    self.source.next_char();
                }
            } else if self.source.starts_with("\"\"\"") {
                for _ in 0..3 {
                    self.source.next_char();
                }
                return Ok(self.emit(&start_pos, TokenType::BlockString));
            } else {
                match self.source.peek() {
                    Some(ch) if !is_source_char(ch) => {
                        return self.error(LexerError::UnknownCharacterInString(ch));
                    }
                    Some(_) => {
                        self.source.next_char();
                    }
                    None => return self.error(LexerError::UnterminatedBlockString),
                }
            }
        }
    }

    fn scan_escaped_unicode(
        &mut self,
        start_pos: &SourceLocation,
    ) -> Result<(), Spanning<LexerError>> {
        let escape_start = self.source.cursor();

        for _ in 0..4 {
            match self.source.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    self.source.next_char();
                }
                Some(_) => {
                    return Err(Spanning::zero_width(
                        start_pos,
                        LexerError::UnknownEscapeSequence(format!(
                            "\\u{}",
                            self.source.slice_from(escape_start),
                        )),
                    ));
                }
                None => return self.error(LexerError::UnterminatedString),
            }
        }

        let escape = self.source.slice_from(escape_start);
        u32::from_str_radix(escape, 16)
            .ok()
            .and_then(char::from_u32)
            .map(|_| ())
            .ok_or_else(|| {
                Spanning::zero_width(
                    start_pos,
                    LexerError::UnknownEscapeSequence(format!("\\u{escape}")),
                )
            })
    }

    fn scan_digits(&mut self) -> Result<(), Spanning<LexerError>> {
        match self.source.peek() {
            Some(ch) if ch.is_ascii_digit() => {}
            Some(ch) => return self.error(LexerError::UnexpectedCharacter(ch)),
            None => return self.error(LexerError::UnexpectedEndOfFile),
        }

        while matches!(self.source.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.source.next_char();
        }

        Ok(())
    }

    fn scan_number(&mut self) -> LexerResult<'a> {
        let start_pos = self.location();

        if self.source.peek() == Some('-') {
            self.source.next_char();
        }

        if self.source.peek() == Some('0') {
            self.source.next_char();
            if let Some(ch) = self.source.peek().filter(char::is_ascii_digit) {
                return self.error(LexerError::UnexpectedCharacter(ch));
            }
        } else {
            self.scan_digits()?;
        }

        let mut is_float = false;

        if self.source.peek() == Some('.') {
            is_float = true;
            self.source.next_char();
            self.scan_digits()?;
        }

        if matches!(self.source.peek(), Some('e' | 'E')) {
            is_float = true;
            self.source.next_char();
            if matches!(self.source.peek(), Some('+' | '-')) {
                self.source.next_char();
            }
            self.scan_digits()?;
        }

        // A number must not run straight into a name or another fraction.
        if let Some(ch) = self
            .source
            .peek()
            .filter(|&ch| ch == '.' || is_name_start(ch))
        {
            return self.error(LexerError::UnexpectedCharacter(ch));
        }

        let token_type = if is_float {
            TokenType::Float
        } else {
            TokenType::Int
        };

        Ok(self.emit(&start_pos, token_type))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexerResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_reached_eof {
            return None;
        }

        self.scan_over_whitespace();

        Some(match self.source.peek() {
            Some('!') => Ok(self.emit_single_char(TokenType::Bang)),
            Some('$') => Ok(self.emit_single_char(TokenType::Dollar)),
            Some('&') => Ok(self.emit_single_char(TokenType::Ampersand)),
            Some('(') => Ok(self.emit_single_char(TokenType::ParenOpen)),
            Some(')') => Ok(self.emit_single_char(TokenType::ParenClose)),
            Some(':') => Ok(self.emit_single_char(TokenType::Colon)),
            Some('=') => Ok(self.emit_single_char(TokenType::Equals)),
            Some('@') => Ok(self.emit_single_char(TokenType::At)),
            Some('[') => Ok(self.emit_single_char(TokenType::BracketOpen)),
            Some(']') => Ok(self.emit_single_char(TokenType::BracketClose)),
            Some('{') => Ok(self.emit_single_char(TokenType::CurlyOpen)),
            Some('}') => Ok(self.emit_single_char(TokenType::CurlyClose)),
            Some('|') => Ok(self.emit_single_char(TokenType::Pipe)),
            Some(',') => Ok(self.emit_single_char(TokenType::Comma)),
            Some('#') => self.scan_comment(),
            Some('.') => self.scan_spread(),
            Some('"') if self.source.starts_with("\"\"\"") => self.scan_block_string(),
            Some('"') => self.scan_string(),
            Some(ch) => {
                if is_number_start(ch) {
                    self.scan_number()
                } else if is_name_start(ch) {
                    self.scan_name()
                } else {
                    self.error(LexerError::UnknownCharacter(ch))
                }
            }
            None => {
                self.has_reached_eof = true;
                Ok(Spanning::zero_width(&self.location(), Token::end_of_file()))
            }
        })
    }
}

fn is_source_char(c: char) -> bool {
    c == '\t' || c == '\n' || c == '\r' || c >= ' '
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_cont(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

fn is_number_start(c: char) -> bool {
    c == '-' || c.is_ascii_digit()
}
