use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

use crate::parser::{LexerError, Span, Spanning, Token, TokenClass, TokenType};

/// Error while parsing a GraphQL query
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// An unexpected token occurred in the source
    #[display("Unexpected \"{_0}\"")]
    UnexpectedToken(#[error(not(source))] String),

    /// A token other than the expected ones occurred in the source
    #[display("Expected {expected}, found \"{found}\"")]
    ExpectedToken {
        /// Human-readable list of the acceptable tokens.
        expected: String,

        /// The token actually found.
        found: String,
    },

    /// The input source abruptly ended
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,

    /// An error during tokenization occurred
    #[display("{_0}")]
    LexerError(LexerError),

    /// The tokens are well-formed but do not form a valid construct
    #[display("{_0}")]
    InvalidSyntax(#[error(not(source))] String),
}

impl ParseError {
    /// Creates a [`ParseError::UnexpectedToken`] out of the provided [`Token`].
    #[must_use]
    pub fn unexpected_token(token: Token<'_>) -> Self {
        Self::UnexpectedToken(token.to_string())
    }
}

#[doc(hidden)]
pub type ParseResult<T> = Result<Spanning<T>, Spanning<ParseError>>;

#[doc(hidden)]
pub type UnlocatedParseResult<T> = Result<T, Spanning<ParseError>>;

/// Cursor over the tokens of a single source.
///
/// Comment and comma tokens stay in the stream, but are skipped transparently
/// unless asked for explicitly. The last token is always
/// [`TokenType::EndOfFile`], and the cursor never moves past it.
#[derive(Debug)]
pub struct TokenStream<'a> {
    tokens: Vec<Spanning<Token<'a>>>,
    position: usize,
}

impl<'a> TokenStream<'a> {
    #[doc(hidden)]
    pub fn new(mut tokens: Vec<Spanning<Token<'a>>>) -> Self {
        let at_eof = tokens
            .last()
            .is_some_and(|t| t.item.token_type == TokenType::EndOfFile);
        if !at_eof {
            let end = tokens.last().map_or(Span::unlocated(), |t| Span::zero_width(t.end()));
            tokens.push(Spanning::new(end, Token::end_of_file()));
        }

        Self {
            tokens,
            position: 0,
        }
    }

    /// All the tokens of this stream, ignorable ones included.
    pub fn tokens(&self) -> &[Spanning<Token<'a>>] {
        &self.tokens
    }

    /// Moves the cursor to the first non-ignorable token at or after it.
    pub fn prime(&mut self) {
        while self.active_token().item.token_type.is_ignorable() {
            self.position += 1;
        }
    }

    /// Returns the token under the cursor.
    pub fn active_token(&self) -> &Spanning<Token<'a>> {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    /// Advances the cursor, optionally skipping ignorable tokens, and returns
    /// the new active token.
    pub fn next(&mut self, skip_ignored: bool) -> &Spanning<Token<'a>> {
        if !self.is_at_eof() {
            self.position += 1;
            if skip_ignored {
                self.prime();
            }
        }
        self.active_token()
    }

    /// Consumes the active token, leaving the stream primed on the next
    /// non-ignorable one.
    pub fn take(&mut self) -> Spanning<Token<'a>> {
        let token = *self.active_token();
        self.next(true);
        token
    }

    fn is_at_eof(&self) -> bool {
        self.active_token().item.token_type == TokenType::EndOfFile
    }

    /// Indicates whether only the end of file marker remains.
    pub fn end_of_stream(&self) -> bool {
        self.tokens[self.position.min(self.tokens.len() - 1)..]
            .iter()
            .all(|t| t.item.token_type.is_ignorable() || t.item.token_type == TokenType::EndOfFile)
    }

    /// Checks whether the active token is of the provided type.
    pub fn matches(&self, token_type: TokenType) -> bool {
        self.active_token().item.token_type == token_type
    }

    /// Checks whether the active token is of any of the provided types.
    pub fn matches_any(&self, token_types: &[TokenType]) -> bool {
        token_types.iter().any(|&t| self.matches(t))
    }

    /// Checks whether the active token belongs to the provided class.
    pub fn matches_class(&self, class: TokenClass) -> bool {
        self.active_token().item.token_type.class() == class
    }

    /// Checks whether the active token is a name equal to any of the
    /// `candidates`.
    pub fn matches_name(&self, candidates: &[&str]) -> bool {
        let token = &self.active_token().item;
        token.token_type == TokenType::Name && candidates.contains(&token.text)
    }

    /// Checks whether the token following the active one (ignorable tokens
    /// skipped) is of the provided type.
    pub fn peek_matches(&self, token_type: TokenType) -> bool {
        self.tokens
            .iter()
            .skip(self.position + 1)
            .find(|t| !t.item.token_type.is_ignorable())
            .is_some_and(|t| t.item.token_type == token_type)
    }

    /// Ensures the active token is of the provided type.
    ///
    /// # Errors
    ///
    /// With a [`ParseError::ExpectedToken`] describing the mismatch.
    pub fn match_or_throw(&self, token_type: TokenType) -> UnlocatedParseResult<()> {
        self.match_any_or_throw(&[token_type])
    }

    /// Ensures the active token is of any of the provided types.
    ///
    /// # Errors
    ///
    /// With a [`ParseError::ExpectedToken`] listing all the `token_types`.
    pub fn match_any_or_throw(&self, token_types: &[TokenType]) -> UnlocatedParseResult<()> {
        if self.matches_any(token_types) {
            Ok(())
        } else {
            Err(self.unexpected(token_types.iter().map(|t| format!("\"{t}\"")).join(" or ")))
        }
    }

    /// Ensures the active token is a name equal to any of the `candidates`.
    ///
    /// # Errors
    ///
    /// With a [`ParseError::ExpectedToken`] listing all the `candidates`.
    pub fn match_name_or_throw(&self, candidates: &[&str]) -> UnlocatedParseResult<()> {
        if self.matches_name(candidates) {
            Ok(())
        } else {
            Err(self.unexpected(candidates.iter().map(|c| format!("\"{c}\"")).join(" or ")))
        }
    }

    /// Consumes the active token if it's of the provided type.
    ///
    /// # Errors
    ///
    /// If the active token is of another type.
    pub fn expect(&mut self, token_type: TokenType) -> ParseResult<&'a str> {
        self.match_or_throw(token_type)?;
        Ok(self.take().map(|t| t.text))
    }

    /// Consumes the active token if it's a name, returning its text.
    ///
    /// # Errors
    ///
    /// If the active token is not a name.
    pub fn expect_name(&mut self) -> ParseResult<&'a str> {
        self.expect(TokenType::Name)
    }

    /// Consumes the active token if it's of the provided type, doing nothing
    /// otherwise.
    pub fn skip(&mut self, token_type: TokenType) -> Option<Spanning<Token<'a>>> {
        self.matches(token_type).then(|| self.take())
    }

    /// Consumes the active token if it's the provided name, doing nothing
    /// otherwise.
    pub fn skip_name(&mut self, name: &str) -> Option<Spanning<Token<'a>>> {
        self.matches_name(&[name]).then(|| self.take())
    }

    /// Builds an error describing the active token as not being the
    /// `expected` one.
    pub fn unexpected(&self, expected: impl Into<String>) -> Spanning<ParseError> {
        let token = self.active_token();
        let error = if token.item.token_type == TokenType::EndOfFile {
            ParseError::UnexpectedEndOfFile
        } else {
            ParseError::ExpectedToken {
                expected: expected.into(),
                found: token.item.to_string(),
            }
        };
        Spanning::new(token.span, error)
    }

    /// Builds an [`ParseError::InvalidSyntax`] error located at the active
    /// token.
    pub fn invalid(&self, message: impl Into<String>) -> Spanning<ParseError> {
        Spanning::new(
            self.active_token().span,
            ParseError::InvalidSyntax(message.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ParseError;
    use crate::parser::{TokenClass, TokenType, tokenize};

    #[test]
    fn skips_ignorable_tokens() {
        let mut tokens = tokenize("# lead\n a, b").expect("tokenized");
        tokens.prime();

        assert_eq!(tokens.active_token().item.text, "a");
        assert_eq!(tokens.next(false).item.token_type, TokenType::Comma);
        assert_eq!(tokens.next(true).item.text, "b");
        assert!(tokens.matches_class(TokenClass::Name));
        assert!(!tokens.end_of_stream());

        tokens.next(true);
        assert!(tokens.end_of_stream());
        assert!(tokens.matches(TokenType::EndOfFile));

        // The cursor never moves past the end of file marker.
        assert!(tokens.next(true).item.token_type == TokenType::EndOfFile);
    }

    #[test]
    fn matches_names_without_consuming() {
        let mut tokens = tokenize("mutation M").expect("tokenized");
        tokens.prime();

        assert!(tokens.matches_name(&["query", "mutation"]));
        assert!(tokens.match_name_or_throw(&["mutation"]).is_ok());
        assert!(tokens.peek_matches(TokenType::Name));
        assert_eq!(tokens.expect_name().map(|t| t.item), Ok("mutation"));
        assert_eq!(tokens.active_token().item.text, "M");
    }

    #[test]
    fn reports_expectations() {
        let mut tokens = tokenize("{ a").expect("tokenized");
        tokens.prime();

        let err = tokens
            .match_any_or_throw(&[TokenType::BracketOpen, TokenType::ParenOpen])
            .unwrap_err();
        assert_eq!(
            err.item,
            ParseError::ExpectedToken {
                expected: "\"[\" or \"(\"".into(),
                found: "{".into(),
            },
        );

        tokens.take();
        tokens.take();
        assert_eq!(
            tokens.match_or_throw(TokenType::CurlyClose).unwrap_err().item,
            ParseError::UnexpectedEndOfFile,
        );
    }
}
