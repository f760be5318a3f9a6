//! Source locations inside markup documents.

use std::fmt;

/// Position of a node in the markup document that produced it.
///
/// Markup compilers report line and column of the element or attribute that
/// carried a property reference; `len` covers the attribute text when known.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
    /// Length of the referenced text in bytes, 0 when unknown.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span carries no location (the default span).
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }

    /// Shift the span right by `offset` columns and narrow it to `len`.
    ///
    /// Used to point diagnostics at a segment of a property token rather
    /// than the whole attribute.
    #[inline]
    pub fn narrow(self, offset: u32, len: u32) -> Span {
        Span {
            line: self.line,
            col: self.col + offset,
            len,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
