//! Cursor: the insertion point and its movement rules.
//!
//! The cursor is a bare [`Position`] that is only ever changed through
//! methods taking the [`Document`], so it can always be clamped on the way
//! in:
//!
//! - the line is clamped to `[0, line_count - 1]` first,
//! - then the column to `[0, line_len(line)]`.
//!
//! Column `line_len` is a real slot (after the last char). There is no
//! sticky column: moving through a short line pulls the column down and it
//! stays down.

use crate::document::Document;
use crate::position::Position;

/// Insertion point in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    // -- Positioning --------------------------------------------------------

    /// Jump to `pos`, clamped to the document.
    pub fn set_position(&mut self, pos: Position, doc: &Document) {
        self.pos = doc.clamp(pos);
    }

    /// Re-clamp after the document changed underneath the cursor.
    pub fn clamp(&mut self, doc: &Document) {
        self.pos = doc.clamp(self.pos);
    }

    /// Relative move: resolve the line first, then clamp the column on it.
    pub fn move_by(&mut self, d_line: isize, d_col: isize, doc: &Document) {
        let line = self
            .pos
            .line
            .saturating_add_signed(d_line)
            .min(doc.line_count() - 1);
        let col = self
            .pos
            .col
            .saturating_add_signed(d_col)
            .min(doc.line_len(line));
        self.pos = Position::new(line, col);
    }

    pub fn line_start(&mut self) {
        self.pos.col = 0;
    }

    pub fn line_end(&mut self, doc: &Document) {
        self.pos.col = doc.line_len(self.pos.line);
    }

    pub fn document_start(&mut self) {
        self.pos = Position::ZERO;
    }

    /// Start of the last line.
    pub fn document_end(&mut self, doc: &Document) {
        self.pos = Position::new(doc.line_count() - 1, 0);
    }

    /// Move by a whole screen of `height` rows.
    pub fn page_down(&mut self, height: usize, doc: &Document) {
        self.move_by(page(height), 0, doc);
    }

    pub fn page_up(&mut self, height: usize, doc: &Document) {
        self.move_by(-page(height), 0, doc);
    }
}

fn page(height: usize) -> isize {
    isize::try_from(height.max(1)).unwrap_or(isize::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
