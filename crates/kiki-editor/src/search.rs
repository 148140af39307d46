//! Search: literal, case-sensitive, whole-document.
//!
//! [`find_all`] scans every line left to right and reports every position
//! where the term starts, overlapping matches included (`"aa"` in `"aaa"`
//! matches at columns 0 and 1). [`SearchState`] keeps the last term, its
//! matches and the current-match index for `n`/`N`, and rescans lazily when
//! the document's revision moves.
//!
//! [`replace_all`] is deliberately different: it replaces non-overlapping
//! occurrences, which is what `str::replace` does.

use tracing::debug;

use crate::document::Document;
use crate::position::Position;

/// Every start position of `term` in `doc`, in row-major order. Columns are
/// char offsets. An empty term matches nothing.
#[must_use]
pub fn find_all(doc: &Document, term: &str) -> Vec<Position> {
    if term.is_empty() {
        return Vec::new();
    }
    let mut matches = Vec::new();
    for (line_idx, line) in doc.lines().iter().enumerate() {
        for (col, (byte, _)) in line.char_indices().enumerate() {
            if line[byte..].starts_with(term) {
                matches.push(Position::new(line_idx, col));
            }
        }
    }
    matches
}

/// Replace every non-overlapping `old` with `new` in every line. Returns
/// the number of replacements; 0 (and no change at all) when `old` is empty
/// or absent.
pub fn replace_all(doc: &mut Document, old: &str, new: &str) -> usize {
    if old.is_empty() {
        return 0;
    }
    let mut count = 0;
    let lines: Vec<String> = doc
        .lines()
        .iter()
        .map(|line| {
            let n = line.matches(old).count();
            count += n;
            if n == 0 {
                line.clone()
            } else {
                line.replace(old, new)
            }
        })
        .collect();

    if count > 0 {
        let total = doc.line_count();
        doc.splice(0, total, lines);
    }
    debug!(old, new, count, "replace all");
    count
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The active search term and where we are among its matches.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    matches: Vec<Position>,
    current: usize,
    revision: Option<u64>,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    /// Start a new search and scan immediately. The current match resets
    /// to the first one.
    pub fn set_term(&mut self, term: &str, doc: &Document) {
        term.clone_into(&mut self.term);
        self.current = 0;
        self.rescan(doc);
    }

    /// Drop the term and all matches.
    pub fn clear(&mut self) {
        self.term.clear();
        self.matches.clear();
        self.current = 0;
        self.revision = None;
    }

    fn rescan(&mut self, doc: &Document) {
        self.matches = find_all(doc, &self.term);
        self.revision = Some(doc.revision());
        if self.current >= self.matches.len() {
            self.current = 0;
        }
    }

    /// Rescan if the document changed since the last scan.
    pub fn refresh(&mut self, doc: &Document) {
        if self.revision != Some(doc.revision()) {
            self.rescan(doc);
        }
    }

    /// Matches as of the last scan.
    #[inline]
    #[must_use]
    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    /// Match length in chars, for highlighting.
    #[must_use]
    pub fn match_len(&self) -> usize {
        self.term.chars().count()
    }

    /// Index of the current match.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<Position> {
        self.matches.get(self.current).copied()
    }

    /// Advance to the next match, wrapping after the last.
    pub fn next(&mut self, doc: &Document) -> Option<Position> {
        self.refresh(doc);
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.current()
    }

    /// Step back to the previous match, wrapping before the first.
    pub fn previous(&mut self, doc: &Document) -> Option<Position> {
        self.refresh(doc);
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.current = (self.current + n - 1) % n;
        self.current()
    }

    /// Make the first match strictly after `pos` current, wrapping to the
    /// first match when there is none after it.
    pub fn select_after(&mut self, pos: Position, doc: &Document) -> Option<Position> {
        self.refresh(doc);
        if self.matches.is_empty() {
            return None;
        }
        self.current = self.matches.iter().position(|m| *m > pos).unwrap_or(0);
        self.current()
    }

    /// `Match i of N`, or `No matches found`.
    #[must_use]
    pub fn status(&self) -> String {
        if self.matches.is_empty() {
            "No matches found".to_string()
        } else {
            format!("Match {} of {}", self.current + 1, self.matches.len())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::from_text(text)
    }

    // -- find_all -----------------------------------------------------------

    #[test]
    fn row_major_order() {
        let d = doc("ab\nba\nc");
        assert_eq!(
            find_all(&d, "b"),
            vec![Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn overlapping_matches() {
        let d = doc("aaa");
        assert_eq!(
            find_all(&d, "aa"),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn case_sensitive_and_literal() {
        let d = doc("Foo foo f.o");
        assert_eq!(find_all(&d, "foo"), vec![Position::new(0, 4)]);
        assert_eq!(find_all(&d, "f.o"), vec![Position::new(0, 8)]);
    }

    #[test]
    fn columns_are_chars() {
        let d = doc("\u{e9}t\u{e9}");
        assert_eq!(find_all(&d, "t"), vec![Position::new(0, 1)]);
    }

    #[test]
    fn empty_term_matches_nothing() {
        assert!(find_all(&doc("abc"), "").is_empty());
    }

    // -- Navigation ---------------------------------------------------------

    #[test]
    fn next_wraps_around() {
        let d = doc("ab\nba\nc");
        let mut s = SearchState::new();
        s.set_term("b", &d);
        assert_eq!(s.index(), 0);
        assert_eq!(s.next(&d), Some(Position::new(1, 0)));
        assert_eq!(s.next(&d), Some(Position::new(0, 1)));
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn previous_wraps_around() {
        let d = doc("x x x");
        let mut s = SearchState::new();
        s.set_term("x", &d);
        assert_eq!(s.previous(&d), Some(Position::new(0, 4)));
        assert_eq!(s.status(), "Match 3 of 3");
        assert_eq!(s.previous(&d), Some(Position::new(0, 2)));
    }

    #[test]
    fn navigation_without_matches() {
        let d = doc("abc");
        let mut s = SearchState::new();
        s.set_term("z", &d);
        assert_eq!(s.next(&d), None);
        assert_eq!(s.previous(&d), None);
        assert_eq!(s.status(), "No matches found");
    }

    #[test]
    fn select_after_cursor_wraps() {
        let d = doc("a\nb a\na");
        let mut s = SearchState::new();
        s.set_term("a", &d);
        assert_eq!(
            s.select_after(Position::new(1, 1), &d),
            Some(Position::new(1, 2))
        );
        assert_eq!(
            s.select_after(Position::new(1, 2), &d),
            Some(Position::new(2, 0))
        );
        assert_eq!(
            s.select_after(Position::new(2, 0), &d),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn rescans_after_edit() {
        let mut d = doc("ab");
        let mut s = SearchState::new();
        s.set_term("b", &d);
        assert_eq!(s.matches().len(), 1);

        d.insert_text(Position::ZERO, "bb");
        assert_eq!(s.next(&d), Some(Position::new(0, 1)));
        assert_eq!(s.matches().len(), 3);
    }

    #[test]
    fn clear_forgets_term() {
        let d = doc("ab");
        let mut s = SearchState::new();
        s.set_term("a", &d);
        s.clear();
        assert!(!s.is_active());
        assert!(s.matches().is_empty());
    }

    // -- replace_all --------------------------------------------------------

    #[test]
    fn replace_counts_every_occurrence() {
        let mut d = doc("banana");
        assert_eq!(replace_all(&mut d, "a", "b"), 3);
        assert_eq!(d.lines(), &["bbnbnb"]);
        assert!(find_all(&d, "a").is_empty());
    }

    #[test]
    fn replace_is_non_overlapping() {
        let mut d = doc("aaa\naa");
        assert_eq!(replace_all(&mut d, "aa", "x"), 2);
        assert_eq!(d.lines(), &["xa", "x"]);
    }

    #[test]
    fn replace_empty_old_is_noop() {
        let mut d = doc("abc");
        assert_eq!(replace_all(&mut d, "", "x"), 0);
        assert_eq!(d.lines(), &["abc"]);
        assert!(!d.is_modified());
    }

    #[test]
    fn replace_absent_leaves_document_clean() {
        let mut d = doc("abc");
        let rev = d.revision();
        assert_eq!(replace_all(&mut d, "z", "y"), 0);
        assert_eq!(d.revision(), rev);
    }
}
