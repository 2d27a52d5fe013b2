//! Source location tracking for tokens and AST nodes.

use serde::Serialize;

/// A half-open byte range `[start, end)` into the query text.
///
/// Byte offsets keep slicing cheap; user-facing cursor positions are
/// derived from them with [`Span::cursor_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at `offset`.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merges two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the source text covered by this span.
    ///
    /// Returns an empty string when the span does not fall on character
    /// boundaries of `input`.
    #[must_use]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.start..self.end).unwrap_or_default()
    }

    /// Returns the 1-based character position of the span start in `input`.
    #[must_use]
    pub fn cursor_position(&self, input: &str) -> usize {
        cursor_position(input, self.start)
    }
}

/// Converts a byte offset into a 1-based character position.
///
/// Offsets past the end of the input map to one past the last character.
#[must_use]
pub fn cursor_position(input: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(input.len());
    input
        .char_indices()
        .take_while(|(i, _)| *i < clamped)
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_and_length() {
        let input = "SELECT name FROM t";
        let span = Span::new(7, 11);
        assert_eq!(span.slice(input), "name");
        assert_eq!(span.len(), 4);
        assert!(Span::at(7).is_empty());
        assert_eq!(Span::new(8, 40).slice(input), "");
    }

    #[test]
    fn test_merge_covers_both_sides() {
        // `a JOIN b` spans from the left table to the right one
        let joined = Span::new(14, 15).merge(Span::new(21, 22));
        assert_eq!(joined, Span::new(14, 22));
        assert_eq!(Span::new(21, 22).merge(Span::new(14, 15)), joined);
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(0, 10);
        assert!(outer.contains(Span::new(2, 5)));
        assert!(outer.contains(outer));
        assert!(!outer.contains(Span::new(8, 11)));
    }

    #[test]
    fn test_cursor_position_counts_chars() {
        // "é" is two bytes, so byte offset 3 is the third character.
        let input = "é x";
        assert_eq!(cursor_position(input, 0), 1);
        assert_eq!(cursor_position(input, 3), 3);
        assert_eq!(cursor_position(input, input.len()), 4);
        assert_eq!(cursor_position(input, 100), 4);
    }
}
