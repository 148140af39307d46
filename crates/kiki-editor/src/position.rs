//! Cursor and match coordinates.
//!
//! All coordinates are **0-indexed**: line 0 is the first line, column 0 the
//! first character. Columns count chars, never bytes. Conversion to the
//! 1-indexed form users see (status line, `:line`, notices) happens in
//! [`fmt::Display`] and nowhere else.

use std::fmt;

/// A (line, column) pair inside a [`Document`](crate::document::Document).
///
/// `col` may equal the line's char length: that is the "after the last
/// character" slot where typing appends.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Same line, different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self {
            line: self.line,
            col,
        }
    }
}

// Line first, then column.
impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

impl From<(usize, usize)> for Position {
    #[inline]
    fn from((line, col): (usize, usize)) -> Self {
        Self { line, col }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_line_major() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(
            Position::new(4, 4).cmp(&Position::new(4, 4)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn display_is_one_indexed() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(9, 4).to_string(), "10:5");
    }

    #[test]
    fn debug_is_compact() {
        assert_eq!(format!("{:?}", Position::new(3, 7)), "Pos(3:7)");
    }

    #[test]
    fn from_tuple_and_with_col() {
        let p: Position = (2, 5).into();
        assert_eq!(p, Position::new(2, 5));
        assert_eq!(p.with_col(0), Position::new(2, 0));
        assert_eq!(Position::default(), Position::ZERO);
    }
}
