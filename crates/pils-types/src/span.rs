use std::fmt;

/// Source location span.
///
/// A half-open byte range `start..end` into the single line being processed.
/// Offsets are 0-based; [`Span::column`] gives the 1-based column used in
/// human-readable error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a single offset.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based column of the span start.
    pub fn column(&self) -> usize {
        self.start + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}", self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let s = Span::point(5);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 5);
        assert!(s.is_empty());
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 10);
        let b = Span::new(12, 15);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(4, 15));
        assert_eq!(merged.len(), 11);
    }

    #[test]
    fn test_span_merge_overlapping() {
        let a = Span::new(5, 10);
        let b = Span::new(3, 8);
        assert_eq!(a.merge(b), Span::new(3, 10));
        assert_eq!(b.merge(a), Span::new(3, 10));
    }

    #[test]
    fn test_span_display_is_one_based() {
        assert_eq!(format!("{}", Span::new(0, 1)), "column 1");
        assert_eq!(format!("{}", Span::new(6, 9)), "column 7");
    }
}
