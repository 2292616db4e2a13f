//! Byte-span primitives for locating edit targets.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, start + len)` over UTF-8 source text.
///
/// A zero-length span marks a pure insertion point.
///
/// # Example
///
/// ```
/// use mender_core::Span;
///
/// let span = Span::new(5, 3);
/// assert_eq!(span.end(), 8);
/// assert!(!span.is_insertion());
/// assert!(Span::new(5, 0).is_insertion());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// Number of bytes covered.
    pub len: usize,
}

impl Span {
    /// Creates a span covering `len` bytes from `start`.
    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Creates a zero-length span at `offset`.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            len: 0,
        }
    }

    /// Exclusive end byte offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns `true` when this span covers no bytes.
    #[must_use]
    pub const fn is_insertion(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` when `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    /// Returns `true` when two spans intersect.
    ///
    /// A zero-length span overlaps a replacement only when it sits strictly
    /// inside it; insertions at a shared offset never overlap each other.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Span::new(0, 5), Span::new(5, 5), false)]
    #[case(Span::new(0, 6), Span::new(5, 5), true)]
    #[case(Span::new(5, 0), Span::new(5, 0), false)]
    #[case(Span::new(5, 0), Span::new(0, 10), true)]
    fn overlap_follows_half_open_semantics(
        #[case] a: Span,
        #[case] b: Span,
        #[case] expected: bool,
    ) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[rstest]
    #[case(Span::new(0, 10), Span::new(2, 3), true)]
    #[case(Span::new(0, 10), Span::new(0, 10), true)]
    #[case(Span::new(2, 3), Span::new(0, 10), false)]
    #[case(Span::new(0, 10), Span::new(8, 5), false)]
    fn containment_is_inclusive_of_bounds(
        #[case] outer: Span,
        #[case] inner: Span,
        #[case] expected: bool,
    ) {
        assert_eq!(outer.contains(&inner), expected);
    }

    #[test]
    fn point_spans_are_insertions() {
        let span = Span::point(12);
        assert!(span.is_insertion());
        assert_eq!(span.end(), 12);
    }
}
