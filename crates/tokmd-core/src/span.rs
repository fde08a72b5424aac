//! Source line ranges attached to block tokens.
//!
//! Every block-level token carries an optional `Span` naming the source lines
//! it was produced from. Inline tokens usually carry none.

/// A half-open range of source lines.
///
/// Both `start` and `end` are zero-based line numbers: `[start, end)`.
///
/// # Example
///
/// ```rust
/// use tokmd_core::span::Span;
///
/// let span = Span::new(2, 5);
/// assert_eq!(span.len(), 3);
/// assert!(span.contains(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    /// First line (inclusive).
    pub start: usize,
    /// Line after the last one (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span from line numbers.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span covers no lines.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span contains a line.
    #[inline]
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }
}
