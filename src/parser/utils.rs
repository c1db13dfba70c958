use std::fmt;

/// A reference to a line and column in an input source.
///
/// The [`index`](SourceLocation::index) is a byte offset into the source, so
/// it can be used to slice the source directly. Lines and columns are
/// zero-based; columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
pub struct SourceLocation {
    index: usize,
    line: usize,
    col: usize,
}

/// Range of characters in the input source, starting at the character pointed by the `start` field
/// and ending just before the `end` marker.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// Start location of this [`Span`].
    pub start: SourceLocation,

    /// End location of this [`Span`].
    ///
    /// > __NOTE__: This points to the first source location __after__ this [`Span`].
    pub end: SourceLocation,
}

impl Span {
    #[doc(hidden)]
    #[inline]
    pub fn zero_width(pos: SourceLocation) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn unlocated() -> Self {
        Self::zero_width(SourceLocation::new_origin())
    }

    /// Length of this [`Span`] in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.index - self.start.index
    }

    /// Indicates whether this [`Span`] covers no source at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Data structure used to wrap items into a [`Span`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Spanning<T> {
    /// Wrapped item.
    pub item: T,

    /// [`Span`] of the wrapped item.
    pub span: Span,
}

impl<T> Spanning<T> {
    #[doc(hidden)]
    pub fn new(span: Span, item: T) -> Self {
        Self { item, span }
    }

    #[doc(hidden)]
    pub fn zero_width(&pos: &SourceLocation, item: T) -> Spanning<T> {
        Self::new(Span::zero_width(pos), item)
    }

    #[doc(hidden)]
    pub fn start_end(&start: &SourceLocation, &end: &SourceLocation, item: T) -> Spanning<T> {
        Self::new(Span { start, end }, item)
    }

    #[doc(hidden)]
    pub fn unlocated(item: T) -> Spanning<T> {
        Self::new(Span::unlocated(), item)
    }

    /// Returns start location of the item.
    #[inline]
    pub fn start(&self) -> SourceLocation {
        self.span.start
    }

    /// Returns end location of the item.
    ///
    /// > __NOTE__: This points to the first source location __after__ the item.
    #[inline]
    pub fn end(&self) -> SourceLocation {
        self.span.end
    }

    /// Modify the contents of the spanned item.
    pub fn map<O, F: FnOnce(T) -> O>(self, f: F) -> Spanning<O> {
        Spanning::new(self.span, f(self.item))
    }
}

impl<T: fmt::Display> fmt::Display for Spanning<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. At {}", self.item, self.span.start)
    }
}

impl<T: std::error::Error> std::error::Error for Spanning<T> {}

impl SourceLocation {
    #[doc(hidden)]
    pub fn new(index: usize, line: usize, col: usize) -> SourceLocation {
        assert!(index >= line + col);

        SourceLocation { index, line, col }
    }

    #[doc(hidden)]
    pub fn new_origin() -> SourceLocation {
        SourceLocation {
            index: 0,
            line: 0,
            col: 0,
        }
    }

    #[doc(hidden)]
    pub fn advance_col(&mut self, width: usize) {
        self.index += width;
        self.col += 1;
    }

    #[doc(hidden)]
    pub fn advance_line(&mut self, width: usize) {
        self.index += width;
        self.line += 1;
        self.col = 0;
    }

    /// The byte index of the character in the input source
    ///
    /// Zero-based index. Take a substring of the original source starting at
    /// this index to access the item pointed to by this `SourceLocation`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The line of the character in the input source
    ///
    /// Zero-based index: the first line is line zero.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column of the character in the input source
    ///
    /// Zero-based index: the first column is column zero.
    pub fn column(&self) -> usize {
        self.col
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
