//! Byte ranges into source text.

use std::ops::Range;

/// A half-open byte range `start..end` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both).
    pub fn union(&self, other: Span) -> Span {
        Self::new(self.start.min(other.start)..self.end.max(other.end))
    }

    /// Create a one-byte span at a 1-based line/column position.
    ///
    /// This is the position format reported by `serde_json`. Positions past
    /// the end of `source` are clamped to its length.
    pub fn from_line_column(source: &str, line: usize, column: usize) -> Span {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + column.saturating_sub(1)).min(source.len());
        let end = (offset + 1).min(source.len());
        Self::new(offset..end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessors() {
        let span = Span::new(3..8);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_span_union() {
        let a = Span::new(10..20);
        let b = Span::new(5..12);
        assert_eq!(a.union(b), Span::new(5..20));
    }

    #[test]
    fn test_from_line_column() {
        let source = "{\n  \"a\": 1,\n  oops\n}";
        let span = Span::from_line_column(source, 3, 3);

        assert_eq!(&source[span.start()..span.end()], "o");
    }

    #[test]
    fn test_from_line_column_clamps() {
        let source = "{}";
        let span = Span::from_line_column(source, 9, 9);

        assert_eq!(span.start(), 2);
        assert!(span.is_empty());
    }
}
