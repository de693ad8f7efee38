//! Half-open byte ranges.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` byte range inside one document.
///
/// `Span` is `Copy`, so lookups never mutate a caller's range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Build a span from `usize` offsets, as produced by string searches.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// A zero-width span at `offset`, the shape of a cursor position.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `offset` lies inside the span. The end offset counts as inside so that a
    /// cursor placed right after an identifier still hits it.
    #[inline]
    pub const fn contains_offset(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Whether `other` lies fully inside this span.
    #[inline]
    pub const fn contains(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Move the span forward by `base` bytes.
    #[inline]
    pub const fn offset_by(&self, base: u32) -> Span {
        Span {
            start: self.start + base,
            end: self.end + base,
        }
    }

    /// Swap the endpoints when they are inverted.
    #[inline]
    pub fn normalized(self) -> Span {
        Span {
            start: self.start.min(self.end),
            end: self.start.max(self.end),
        }
    }

    #[inline]
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slice `source` by this span, or `""` when the span falls outside it.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.as_range()).unwrap_or("")
    }
}

impl From<std::ops::Range<u32>> for Span {
    fn from(range: std::ops::Range<u32>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let span = Span::new(10, 20);
        assert!(span.contains(Span::new(10, 20)));
        assert!(span.contains(Span::new(12, 15)));
        assert!(!span.contains(Span::new(9, 15)));
        assert!(!span.contains(Span::new(15, 21)));
        assert!(span.contains_offset(20));
        assert!(!span.contains_offset(21));
    }

    #[test]
    fn test_normalized() {
        assert_eq!(Span::new(8, 3).normalized(), Span::new(3, 8));
        assert_eq!(Span::new(3, 8).normalized(), Span::new(3, 8));
    }

    #[test]
    fn test_text_out_of_bounds() {
        let source = "hello";
        assert_eq!(Span::new(1, 3).text(source), "el");
        assert_eq!(Span::new(3, 30).text(source), "");
    }
}
