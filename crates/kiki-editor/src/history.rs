//! Undo/redo history: region snapshots with a bounded undo stack.
//!
//! Every mutating keystroke produces exactly one [`Action`]. An action does
//! not describe the edit; it stores the lines the edit was about to touch
//! and how many lines replaced them, so undo is a single splice:
//!
//! ```text
//! let snap = Snapshot::take(&doc, ActionKind::Split, line, 1, cursor);
//! let after = doc.split_line(cursor, indent);
//! history.record(snap.finish(&doc, after));
//! ```
//!
//! Undo splices the stored lines back and pushes the region it replaced onto
//! the redo stack as the inverse action; redo does the mirror image. Because
//! both directions go through the same splice, `undo; redo` is exact.
//!
//! Recording clears the redo stack (history is linear). The undo stack holds
//! at most [`History::DEFAULT_CAPACITY`] actions and drops the oldest first.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::document::Document;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What kind of edit an action reverses. Informational: undo and redo treat
/// every kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Insert,
    Delete,
    Join,
    Split,
    /// Whole-document rewrite (replace-all) or a completion splice.
    Replace,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Join => "join",
            Self::Split => "split",
            Self::Replace => "replace",
        })
    }
}

/// One reversible unit of history.
///
/// Applying it replaces lines `[start, start + span)` with `lines` and puts
/// the cursor at `before`; `after` is where the cursor goes when the inverse
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub start: usize,
    pub lines: Vec<String>,
    pub span: usize,
    pub before: Position,
    pub after: Position,
}

impl Action {
    /// Apply to `doc`, returning the inverse action.
    fn apply(self, doc: &mut Document) -> Self {
        let current = doc.lines_in(self.start, self.span);
        let inverse = Self {
            kind: self.kind,
            start: self.start,
            span: self.lines.len(),
            lines: current,
            before: self.after,
            after: self.before,
        };
        doc.splice(self.start, self.span, self.lines);
        inverse
    }
}

/// The pre-edit half of an [`Action`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    kind: ActionKind,
    start: usize,
    lines: Vec<String>,
    before: Position,
    total: usize,
}

impl Snapshot {
    /// Copy lines `[start, start + len)` before editing them.
    #[must_use]
    pub fn take(
        doc: &Document,
        kind: ActionKind,
        start: usize,
        len: usize,
        before: Position,
    ) -> Self {
        Self {
            kind,
            start,
            lines: doc.lines_in(start, len),
            before,
            total: doc.line_count(),
        }
    }

    /// Snapshot of the whole document.
    #[must_use]
    pub fn whole(doc: &Document, kind: ActionKind, before: Position) -> Self {
        Self::take(doc, kind, 0, doc.line_count(), before)
    }

    /// Complete the action once the edit is done. The region's new length
    /// follows from how much the line count changed.
    #[must_use]
    pub fn finish(self, doc: &Document, after: Position) -> Action {
        let span = (self.lines.len() + doc.line_count()).saturating_sub(self.total);
        Action {
            kind: self.kind,
            start: self.start,
            lines: self.lines,
            span,
            before: self.before,
            after,
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo and redo stacks.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Action>,
    redo_stack: Vec<Action>,
    capacity: usize,
}

impl History {
    pub const DEFAULT_CAPACITY: usize = 1000;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A history keeping at most `capacity` undo entries (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Push a fresh action. Forward history is discarded.
    pub fn record(&mut self, action: Action) {
        debug!(kind = %action.kind, start = action.start, span = action.span, "record");
        self.redo_stack.clear();
        self.push_undo(action);
    }

    fn push_undo(&mut self, action: Action) {
        self.undo_stack.push_back(action);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Revert the newest action. Returns the cursor to restore, or `None`
    /// (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Option<Position> {
        let action = self.undo_stack.pop_back()?;
        let cursor = action.before;
        let inverse = action.apply(doc);
        debug!(kind = %inverse.kind, undo = self.undo_stack.len(), "undo");
        self.redo_stack.push(inverse);
        Some(cursor)
    }

    /// Re-apply the newest undone action. Returns the cursor to restore, or
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> Option<Position> {
        let action = self.redo_stack.pop()?;
        let cursor = action.before;
        let inverse = action.apply(doc);
        debug!(kind = %inverse.kind, redo = self.redo_stack.len(), "redo");
        self.push_undo(inverse);
        Some(cursor)
    }

    /// Forget everything (the document was replaced wholesale).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Indent;
    use pretty_assertions::assert_eq;

    /// Type `ch` at `pos` and record it the way the editor does.
    fn type_char(doc: &mut Document, h: &mut History, pos: Position, ch: char) -> Position {
        let snap = Snapshot::take(doc, ActionKind::Insert, pos.line, 1, pos);
        let after = doc.insert_char(pos, ch);
        h.record(snap.finish(doc, after));
        after
    }

    fn split(doc: &mut Document, h: &mut History, pos: Position) -> Position {
        let snap = Snapshot::take(doc, ActionKind::Split, pos.line, 1, pos);
        let after = doc.split_line(pos, Indent::Off);
        h.record(snap.finish(doc, after));
        after
    }

    // -- Basic undo / redo --------------------------------------------------

    #[test]
    fn undo_insert_restores_line_and_cursor() {
        let mut doc = Document::from_text("ab");
        let mut h = History::new();
        type_char(&mut doc, &mut h, Position::new(0, 1), 'x');
        assert_eq!(doc.lines(), &["axb"]);

        assert_eq!(h.undo(&mut doc), Some(Position::new(0, 1)));
        assert_eq!(doc.lines(), &["ab"]);
    }

    #[test]
    fn redo_restores_post_edit_state() {
        let mut doc = Document::from_text("ab");
        let mut h = History::new();
        type_char(&mut doc, &mut h, Position::new(0, 2), 'c');

        h.undo(&mut doc);
        assert_eq!(h.redo(&mut doc), Some(Position::new(0, 3)));
        assert_eq!(doc.lines(), &["abc"]);
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn undo_split_removes_new_line() {
        let mut doc = Document::from_text("hi");
        let mut h = History::new();
        let after = split(&mut doc, &mut h, Position::new(0, 2));
        assert_eq!(after, Position::new(1, 0));
        assert_eq!(doc.lines(), &["hi", ""]);

        assert_eq!(h.undo(&mut doc), Some(Position::new(0, 2)));
        assert_eq!(doc.lines(), &["hi"]);
        assert_eq!(h.redo(&mut doc), Some(Position::new(1, 0)));
        assert_eq!(doc.lines(), &["hi", ""]);
    }

    #[test]
    fn undo_join_restores_both_lines() {
        let mut doc = Document::from_text("ab\ncd\nef");
        let mut h = History::new();
        let pos = Position::new(1, 0);
        let snap = Snapshot::take(&doc, ActionKind::Join, 0, 2, pos);
        let after = doc.delete_char_before(pos).unwrap();
        h.record(snap.finish(&doc, after));
        assert_eq!(doc.lines(), &["abcd", "ef"]);

        assert_eq!(h.undo(&mut doc), Some(pos));
        assert_eq!(doc.lines(), &["ab", "cd", "ef"]);
        h.redo(&mut doc);
        assert_eq!(doc.lines(), &["abcd", "ef"]);
    }

    #[test]
    fn whole_document_snapshot() {
        let mut doc = Document::from_text("a\nb");
        let mut h = History::new();
        let snap = Snapshot::whole(&doc, ActionKind::Replace, Position::ZERO);
        doc.splice(0, 2, vec!["x".into(), "y".into(), "z".into()]);
        h.record(snap.finish(&doc, Position::ZERO));

        h.undo(&mut doc);
        assert_eq!(doc.lines(), &["a", "b"]);
        h.redo(&mut doc);
        assert_eq!(doc.lines(), &["x", "y", "z"]);
    }

    // -- Sequences ----------------------------------------------------------

    #[test]
    fn undo_steps_back_one_keystroke_at_a_time() {
        let mut doc = Document::new();
        let mut h = History::new();
        let p = type_char(&mut doc, &mut h, Position::ZERO, 'h');
        let p = type_char(&mut doc, &mut h, p, 'i');
        split(&mut doc, &mut h, p);
        assert_eq!(h.undo_count(), 3);

        assert_eq!(h.undo(&mut doc), Some(Position::new(0, 2)));
        assert_eq!(doc.lines(), &["hi"]);
        assert_eq!(h.undo(&mut doc), Some(Position::new(0, 1)));
        assert_eq!(doc.lines(), &["h"]);
        assert_eq!(h.undo(&mut doc), Some(Position::ZERO));
        assert_eq!(doc.lines(), &[String::new()]);
        assert_eq!(h.undo(&mut doc), None);
        assert_eq!(h.redo_count(), 3);
    }

    #[test]
    fn record_clears_redo() {
        let mut doc = Document::new();
        let mut h = History::new();
        type_char(&mut doc, &mut h, Position::ZERO, 'a');
        h.undo(&mut doc);
        assert!(h.can_redo());

        type_char(&mut doc, &mut h, Position::ZERO, 'b');
        assert!(!h.can_redo());
        assert_eq!(h.redo(&mut doc), None);
        assert_eq!(doc.lines(), &["b"]);
    }

    #[test]
    fn empty_stacks_change_nothing() {
        let mut doc = Document::from_text("keep");
        let mut h = History::new();
        assert_eq!(h.undo(&mut doc), None);
        assert_eq!(h.redo(&mut doc), None);
        assert_eq!(doc.lines(), &["keep"]);
        assert!(!doc.is_modified());
    }

    // -- Capacity -----------------------------------------------------------

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut doc = Document::new();
        let mut h = History::with_capacity(1000);
        let mut p = Position::ZERO;
        for _ in 0..1001 {
            p = type_char(&mut doc, &mut h, p, 'x');
        }
        assert_eq!(h.undo_count(), 1000);

        while h.undo(&mut doc).is_some() {}
        // The first keystroke fell off the bottom and cannot be undone.
        assert_eq!(doc.lines(), &["x"]);
    }

    #[test]
    fn redo_respects_capacity() {
        let mut doc = Document::new();
        let mut h = History::with_capacity(2);
        let mut p = Position::ZERO;
        for ch in ['a', 'b'] {
            p = type_char(&mut doc, &mut h, p, ch);
        }
        h.undo(&mut doc);
        h.redo(&mut doc);
        assert_eq!(h.undo_count(), 2);
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut doc = Document::new();
        let mut h = History::new();
        type_char(&mut doc, &mut h, Position::ZERO, 'a');
        type_char(&mut doc, &mut h, Position::new(0, 1), 'b');
        h.undo(&mut doc);
        h.clear();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }
}
