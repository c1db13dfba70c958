use crate::parser::{SourceLocation, Span};

/// Zero-copy view over a GraphQL source with a character cursor.
///
/// The cursor tracks the [`SourceLocation`] of the next character, counting
/// `\n`, `\r\n` and a lone `\r` as line terminators.
#[derive(Clone, Copy, Debug)]
pub struct SourceText<'a> {
    text: &'a str,
    location: SourceLocation,
}

impl<'a> SourceText<'a> {
    /// Wraps the provided `text`, placing the cursor at its very beginning.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            location: SourceLocation::new_origin(),
        }
    }

    /// Returns the whole underlying text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length of the underlying text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Indicates whether the underlying text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Location of the character under the cursor.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Byte offset of the cursor.
    pub fn cursor(&self) -> usize {
        self.location.index()
    }

    /// Indicates whether every character has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.cursor() >= self.text.len()
    }

    fn remaining(&self) -> &'a str {
        self.text.get(self.cursor()..).unwrap_or_default()
    }

    /// Returns the character under the cursor without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Returns the `n`-th character after the cursor (`0` being the one under
    /// it) without consuming anything.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Checks whether the not yet consumed text starts with `pattern`.
    pub fn starts_with(&self, pattern: &str) -> bool {
        self.remaining().starts_with(pattern)
    }

    /// Consumes the character under the cursor, advancing the location.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let width = ch.len_utf8();

        match ch {
            '\n' => self.location.advance_line(width),
            '\r' if self.peek_nth(1) == Some('\n') => self.location.advance_col(width),
            '\r' => self.location.advance_line(width),
            _ => self.location.advance_col(width),
        }

        Some(ch)
    }

    /// Slices the text covered by the provided [`Span`].
    ///
    /// Returns an empty string if the [`Span`] doesn't belong to this source.
    pub fn slice(&self, span: Span) -> &'a str {
        self.text
            .get(span.start.index()..span.end.index())
            .unwrap_or_default()
    }

    /// Slices the text between the provided byte `start` and the cursor.
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.text.get(start..self.cursor()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::SourceText;
    use crate::parser::{SourceLocation, Span};

    #[test]
    fn tracks_lines_and_columns() {
        let mut source = SourceText::new("ab\ncd\r\nef\rg");
        let mut locations = vec![];
        while !source.is_at_end() {
            locations.push(source.location());
            source.next_char();
        }

        assert_eq!(locations[0], SourceLocation::new(0, 0, 0));
        assert_eq!(locations[3], SourceLocation::new(3, 1, 0));
        // `\r\n` is a single line break.
        assert_eq!(locations[7], SourceLocation::new(7, 2, 0));
        assert_eq!(locations[10], SourceLocation::new(10, 3, 0));
    }

    #[test]
    fn counts_columns_in_characters() {
        let mut source = SourceText::new("é1");
        source.next_char();

        assert_eq!(source.location(), SourceLocation::new(2, 0, 1));
        assert_eq!(source.peek(), Some('1'));
    }

    #[test]
    fn slices_without_copying() {
        let mut source = SourceText::new("query Foo");
        for _ in 0..5 {
            source.next_char();
        }
        assert_eq!(source.slice_from(0), "query");

        let span = Span {
            start: SourceLocation::new(6, 0, 6),
            end: SourceLocation::new(9, 0, 9),
        };
        assert_eq!(source.slice(span), "Foo");
        assert!(source.starts_with(" Foo"));
        assert_eq!(source.peek_nth(1), Some('F'));
    }
}
