//! The document: an ordered vector of lines plus file metadata.
//!
//! # Design choices
//!
//! - **Lines, not a rope.** Every edit the editor performs touches one line
//!   or shifts the line array, so a `Vec<String>` keeps each primitive at
//!   O(line length) or O(line count) and makes region snapshots for undo a
//!   plain slice clone.
//!
//! - **Never empty.** An empty file is one empty line. Every mutating method
//!   re-establishes `lines.len() >= 1` before returning, so callers never
//!   have to check.
//!
//! - **Columns are char offsets.** Byte offsets stay inside this module.
//!   Out-of-range coordinates are clamped, never rejected.
//!
//! - **Line endings are detected on load** from the first terminator and
//!   written back on save. Lines are stored without terminators.
//!
//! - **Large files are capped.** Files over [`LoadLimits::max_bytes`] load
//!   only their first [`LoadLimits::max_lines`] lines and the document is
//!   flagged [`truncated`](Document::is_truncated) so the editor can tell
//!   the user.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::files;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line terminator style of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Style of the first terminator in `text`; `Lf` when there is none.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => return Self::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return Self::CrLf,
                b'\r' => return Self::Cr,
                _ => {}
            }
        }
        Self::Lf
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("LF"),
            Self::CrLf => f.write_str("CRLF"),
            Self::Cr => f.write_str("CR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Load limits
// ---------------------------------------------------------------------------

/// Size policy applied by [`Document::from_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    /// Files larger than this (in bytes) are loaded partially.
    pub max_bytes: u64,
    /// How many lines a partial load keeps.
    pub max_lines: usize,
}

impl LoadLimits {
    pub const DEFAULT: Self = Self {
        max_bytes: 50 * 1024 * 1024,
        max_lines: 1000,
    };
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Indent
// ---------------------------------------------------------------------------

/// How [`Document::split_line`] indents the new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// The new line starts at column 0.
    Off,
    /// Carry the leading whitespace forward, plus `unit` spaces after a
    /// line ending in `{`.
    Auto { unit: usize },
}

// ---------------------------------------------------------------------------
// WordCount
// ---------------------------------------------------------------------------

/// Result of [`Document::word_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCount {
    pub lines: usize,
    pub words: usize,
    /// Chars across all lines, terminators excluded.
    pub chars: usize,
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lines: {} | Words: {} | Characters: {}",
            self.lines, self.words, self.chars
        )
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The text being edited.
///
/// Owns the lines (always at least one), the file path it is bound to, the
/// modified flag, and a revision counter that increases on every mutation.
/// Search results are keyed on the revision so they can tell when they went
/// stale.
pub struct Document {
    lines: Vec<String>,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
    revision: u64,
    truncated: bool,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// One empty line, no path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            path: None,
            modified: false,
            line_ending: LineEnding::Lf,
            revision: 0,
            truncated: false,
        }
    }

    /// Split `text` into lines. Any of `\n`, `\r\n`, `\r` ends a line; a
    /// final terminator does not start another line.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text),
            line_ending: LineEnding::detect(text),
            ..Self::new()
        }
    }

    /// Load a file with the default [`LoadLimits`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or read. Invalid
    /// UTF-8 is replaced, not reported.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_limited(path, LoadLimits::DEFAULT)
    }

    /// Load a file, reading only `limits.max_lines` lines when it is larger
    /// than `limits.max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or read.
    pub fn from_file_limited(path: &Path, limits: LoadLimits) -> Result<Self> {
        let size = fs::metadata(path).map_err(|e| Error::io(path, e))?.len();

        let mut doc = if size > limits.max_bytes {
            let mut doc = Self::read_head(path, limits.max_lines)?;
            doc.truncated = true;
            info!(path = %path.display(), size, lines = doc.line_count(), "large file loaded partially");
            doc
        } else {
            let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
            Self::from_text(&String::from_utf8_lossy(&bytes))
        };

        doc.path = Some(path.to_path_buf());
        debug!(path = %path.display(), lines = doc.line_count(), ending = %doc.line_ending, "loaded");
        Ok(doc)
    }

    fn read_head(path: &Path, max_lines: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut line_ending = None;
        let mut raw = Vec::new();

        while lines.len() < max_lines {
            raw.clear();
            let n = reader
                .read_until(b'\n', &mut raw)
                .map_err(|e| Error::io(path, e))?;
            if n == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&raw);
            if line_ending.is_none() {
                line_ending = Some(LineEnding::detect(&text));
            }
            lines.extend(split_lines(&text));
        }
        lines.truncate(max_lines);
        if lines.is_empty() {
            lines.push(String::new());
        }

        Ok(Self {
            lines,
            line_ending: line_ending.unwrap_or_default(),
            ..Self::new()
        })
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines; never zero.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Char length of `line`, or 0 past the end.
    #[must_use]
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    /// The nearest valid position to `pos`.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    /// The file content: every line followed by one terminator, the last
    /// line included.
    #[must_use]
    pub fn serialize(&self) -> String {
        let ending = self.line_ending.as_str();
        let mut out =
            String::with_capacity(self.lines.iter().map(|l| l.len() + ending.len()).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push_str(ending);
        }
        out
    }

    /// Byte size of [`serialize`](Self::serialize)'s output.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        let ending = self.line_ending.as_str().len();
        self.lines.iter().map(|l| l.len() + ending).sum()
    }

    #[must_use]
    pub fn word_count(&self) -> WordCount {
        WordCount {
            lines: self.lines.len(),
            words: self.lines.iter().map(|l| l.split_whitespace().count()).sum(),
            chars: self.lines.iter().map(|l| l.chars().count()).sum(),
        }
    }

    /// Copy of lines `[start, start + len)`, clipped to the document.
    #[must_use]
    pub fn lines_in(&self, start: usize, len: usize) -> Vec<String> {
        let start = start.min(self.lines.len());
        let end = start.saturating_add(len).min(self.lines.len());
        self.lines[start..end].to_vec()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` at `pos` (clamped). Returns the position after it.
    pub fn insert_char(&mut self, pos: Position, ch: char) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        line.insert(at, ch);
        self.touch();
        pos.with_col(pos.col + 1)
    }

    /// Insert single-line `text` at `pos` (clamped). Returns the position
    /// after it. Line breaks in `text` are not interpreted.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        line.insert_str(at, text);
        self.touch();
        pos.with_col(pos.col + text.chars().count())
    }

    /// Backspace. Removes the char before `pos`, or joins the line onto the
    /// previous one at column 0. Returns the new cursor, or `None` at the
    /// very start of the document.
    pub fn delete_char_before(&mut self, pos: Position) -> Option<Position> {
        let pos = self.clamp(pos);
        if pos.col > 0 {
            let line = &mut self.lines[pos.line];
            let at = byte_index(line, pos.col - 1);
            line.remove(at);
            self.touch();
            Some(pos.with_col(pos.col - 1))
        } else if pos.line > 0 {
            self.join_with_next(pos.line - 1)
        } else {
            None
        }
    }

    /// Forward delete. Removes the char at `pos`, or joins the next line at
    /// the end of a line. `None` when there is nothing after `pos`.
    pub fn delete_char_at(&mut self, pos: Position) -> Option<Position> {
        let pos = self.clamp(pos);
        if pos.col < self.line_len(pos.line) {
            let line = &mut self.lines[pos.line];
            let at = byte_index(line, pos.col);
            line.remove(at);
            self.touch();
            Some(pos)
        } else {
            self.join_with_next(pos.line).map(|_| pos)
        }
    }

    /// Break the line at `pos` (clamped). The tail moves to a new line
    /// below, indented according to `indent`. Returns the start of the text
    /// on the new line.
    pub fn split_line(&mut self, pos: Position, indent: Indent) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        let tail = line.split_off(at);

        let mut prefix = String::new();
        if let Indent::Auto { unit } = indent {
            prefix.extend(line.chars().take_while(|c| *c == ' ' || *c == '\t'));
            if line.trim_end().ends_with('{') {
                prefix.extend(std::iter::repeat_n(' ', unit));
            }
        }

        let col = prefix.chars().count();
        prefix.push_str(&tail);
        self.lines.insert(pos.line + 1, prefix);
        self.touch();
        Position::new(pos.line + 1, col)
    }

    /// Append the next line onto `line` and remove it. Returns the join
    /// point, or `None` when `line` is the last line.
    pub fn join_with_next(&mut self, line: usize) -> Option<Position> {
        if line + 1 >= self.lines.len() {
            return None;
        }
        let next = self.lines.remove(line + 1);
        let col = self.line_len(line);
        self.lines[line].push_str(&next);
        self.touch();
        Some(Position::new(line, col))
    }

    /// Replace lines `[start, start + remove)` with `with`. Used by history
    /// to restore snapshots and by whole-buffer rewrites. An empty result is
    /// repaired to a single empty line.
    pub fn splice(&mut self, start: usize, remove: usize, with: Vec<String>) {
        let start = start.min(self.lines.len());
        let end = start.saturating_add(remove).min(self.lines.len());
        self.lines.splice(start..end, with);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision += 1;
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Forget the path (the file was deleted under us). The content now
    /// exists only in memory, so it counts as modified.
    pub fn detach(&mut self) {
        self.path = None;
        self.modified = true;
    }

    /// Short display name: the file name, or `[No Name]`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "[No Name]".to_string(), |n| n.to_string_lossy().into_owned())
    }

    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Increases on every mutation.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// True when the file on disk has more lines than were loaded.
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    // -- File I/O -----------------------------------------------------------

    /// Write to the bound path. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`Error::NoFileName`] without a path, otherwise whatever
    /// [`files::write_atomic`] reports. On error nothing changes.
    pub fn save(&mut self, backup: bool) -> Result<usize> {
        let path = self.path.clone().ok_or(Error::NoFileName)?;
        self.save_as(&path, backup)
    }

    /// Write to `path` and bind the document to it.
    ///
    /// # Errors
    ///
    /// See [`files::write_atomic`]. On error the document keeps its old
    /// path and modified flag.
    pub fn save_as(&mut self, path: &Path, backup: bool) -> Result<usize> {
        let content = self.serialize();
        files::write_atomic(path, content.as_bytes(), backup)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        self.truncated = false;
        info!(path = %path.display(), bytes = content.len(), "saved");
        Ok(content.len())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.lines.len())
            .field("modified", &self.modified)
            .field("revision", &self.revision)
            .field("line_ending", &self.line_ending)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Byte offset of char `col` in `line`, or `line.len()` past the end.
#[must_use]
pub fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

/// Split on `\n`, `\r\n` and `\r`. Always yields at least one line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
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

    // -- LineEnding ---------------------------------------------------------

    #[test]
    fn line_ending_detect() {
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb\r"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("no newline"), LineEnding::Lf);
    }

    // -- Load / serialize ---------------------------------------------------

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(doc("").lines(), &[String::new()]);
    }

    #[test]
    fn load_strips_terminators() {
        assert_eq!(doc("a\nb\nc\n").lines(), &["a", "b", "c"]);
    }

    #[test]
    fn load_keeps_trailing_blank_line() {
        assert_eq!(doc("a\n\n").lines(), &["a", ""]);
    }

    #[test]
    fn load_without_final_newline() {
        assert_eq!(doc("a\nb").lines(), &["a", "b"]);
    }

    #[test]
    fn serialize_round_trips_terminated_text() {
        for text in ["a\nb\nc\n", "\n", "x\n\n\ny\n", "caf\u{e9}\n"] {
            assert_eq!(doc(text).serialize(), text);
        }
    }

    #[test]
    fn serialize_terminates_last_line() {
        assert_eq!(doc("a").serialize(), "a\n");
        assert_eq!(Document::new().serialize(), "\n");
    }

    #[test]
    fn crlf_is_preserved() {
        let d = doc("a\r\nb\r\n");
        assert_eq!(d.lines(), &["a", "b"]);
        assert_eq!(d.serialize(), "a\r\nb\r\n");
        assert_eq!(d.byte_len(), 6);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_char_clamps_column() {
        let mut d = doc("ab");
        let p = d.insert_char(Position::new(0, 99), 'c');
        assert_eq!(d.line(0), Some("abc"));
        assert_eq!(p, Position::new(0, 3));
        assert!(d.is_modified());
    }

    #[test]
    fn insert_char_multibyte() {
        let mut d = doc("caf\u{e9}");
        d.insert_char(Position::new(0, 4), '!');
        d.insert_char(Position::new(0, 0), '\u{e9}');
        assert_eq!(d.line(0), Some("\u{e9}caf\u{e9}!"));
    }

    #[test]
    fn insert_text_advances_by_chars() {
        let mut d = doc("fn");
        let p = d.insert_text(Position::new(0, 0), "pub ");
        assert_eq!(d.line(0), Some("pub fn"));
        assert_eq!(p, Position::new(0, 4));
    }

    #[test]
    fn backspace_removes_previous_char() {
        let mut d = doc("abc");
        assert_eq!(
            d.delete_char_before(Position::new(0, 2)),
            Some(Position::new(0, 1))
        );
        assert_eq!(d.line(0), Some("ac"));
    }

    #[test]
    fn backspace_at_line_start_joins() {
        let mut d = doc("ab\ncd");
        let p = d.delete_char_before(Position::new(1, 0));
        assert_eq!(d.lines(), &["abcd"]);
        assert_eq!(p, Some(Position::new(0, 2)));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut d = doc("ab");
        assert_eq!(d.delete_char_before(Position::ZERO), None);
        assert_eq!(d.lines(), &["ab"]);
        assert!(!d.is_modified());
    }

    #[test]
    fn delete_at_end_joins_next() {
        let mut d = doc("ab\ncd");
        assert_eq!(
            d.delete_char_at(Position::new(0, 2)),
            Some(Position::new(0, 2))
        );
        assert_eq!(d.lines(), &["abcd"]);
        assert_eq!(d.delete_char_at(Position::new(0, 4)), None);
    }

    #[test]
    fn split_without_indent() {
        let mut d = doc("  hello");
        let p = d.split_line(Position::new(0, 4), Indent::Off);
        assert_eq!(d.lines(), &["  he", "llo"]);
        assert_eq!(p, Position::new(1, 0));
    }

    #[test]
    fn split_carries_indent() {
        let mut d = doc("    let x;");
        let p = d.split_line(Position::new(0, 10), Indent::Auto { unit: 4 });
        assert_eq!(d.lines(), &["    let x;", "    "]);
        assert_eq!(p, Position::new(1, 4));
    }

    #[test]
    fn split_after_brace_adds_unit() {
        let mut d = doc("\tfn main() {}");
        let p = d.split_line(Position::new(0, 12), Indent::Auto { unit: 2 });
        assert_eq!(d.lines(), &["\tfn main() {", "\t  }"]);
        assert_eq!(p, Position::new(1, 3));
    }

    #[test]
    fn split_inside_indent_does_not_double_it() {
        let mut d = doc("    x");
        d.split_line(Position::new(0, 2), Indent::Auto { unit: 4 });
        assert_eq!(d.lines(), &["  ", "    x"]);
    }

    #[test]
    fn join_last_line_is_noop() {
        let mut d = doc("a\nb");
        assert_eq!(d.join_with_next(1), None);
        assert_eq!(d.join_with_next(0), Some(Position::new(0, 1)));
        assert_eq!(d.lines(), &["ab"]);
    }

    #[test]
    fn line_count_never_reaches_zero() {
        let mut d = doc("a\nb");
        d.delete_char_before(Position::new(1, 1));
        d.delete_char_before(Position::new(1, 0));
        d.delete_char_before(Position::new(0, 1));
        assert_eq!(d.lines(), &[String::new()]);
        d.splice(0, 1, Vec::new());
        assert_eq!(d.line_count(), 1);
    }

    #[test]
    fn revision_moves_on_every_edit() {
        let mut d = doc("a");
        let r0 = d.revision();
        d.insert_char(Position::ZERO, 'x');
        d.split_line(Position::new(0, 1), Indent::Off);
        assert_eq!(d.revision(), r0 + 2);
    }

    #[test]
    fn clamp_pulls_into_bounds() {
        let d = doc("abc\nd");
        assert_eq!(d.clamp(Position::new(9, 9)), Position::new(1, 1));
        assert_eq!(d.clamp(Position::new(0, 2)), Position::new(0, 2));
    }

    #[test]
    fn lines_in_is_clipped() {
        let d = doc("a\nb\nc");
        assert_eq!(d.lines_in(1, 5), vec!["b", "c"]);
        assert!(d.lines_in(7, 2).is_empty());
    }

    // -- Word count ---------------------------------------------------------

    #[test]
    fn word_count_display() {
        let wc = doc("hello world\n  two  words here\n").word_count();
        assert_eq!(wc.to_string(), "Lines: 2 | Words: 5 | Characters: 28");
    }

    // -- Metadata -----------------------------------------------------------

    #[test]
    fn display_name_falls_back() {
        let mut d = Document::new();
        assert_eq!(d.display_name(), "[No Name]");
        d.set_path(PathBuf::from("/tmp/dir/notes.md"));
        assert_eq!(d.display_name(), "notes.md");
    }

    #[test]
    fn detach_marks_modified() {
        let mut d = Document::new();
        d.set_path(PathBuf::from("x.txt"));
        d.detach();
        assert!(d.path().is_none());
        assert!(d.is_modified());
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        let mut d = Document::from_file(&path).unwrap();
        assert_eq!(d.lines(), &["one", "two"]);
        assert!(!d.is_modified());

        d.insert_char(Position::new(1, 3), '!');
        assert_eq!(d.save(false).unwrap(), 9);
        assert!(!d.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo!\n");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        fs::write(&path, b"ok\xff\n").unwrap();
        let d = Document::from_file(&path).unwrap();
        assert_eq!(d.line(0), Some("ok\u{fffd}"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::from_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn large_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        let text: String = (0..50).map(|i| format!("line {i}\n")).collect();
        fs::write(&path, &text).unwrap();

        let limits = LoadLimits {
            max_bytes: 64,
            max_lines: 10,
        };
        let d = Document::from_file_limited(&path, limits).unwrap();
        assert!(d.is_truncated());
        assert_eq!(d.line_count(), 10);
        assert_eq!(d.line(9), Some("line 9"));

        let small = Document::from_file(&path).unwrap();
        assert!(!small.is_truncated());
        assert_eq!(small.line_count(), 50);
    }

    #[test]
    fn save_without_path_fails_cleanly() {
        let mut d = doc("x");
        d.insert_char(Position::ZERO, 'y');
        assert!(matches!(d.save(false), Err(Error::NoFileName)));
        assert!(d.is_modified());
    }

    #[test]
    fn save_as_adopts_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut d = doc("hi\n");
        d.save_as(&path, false).unwrap();
        assert_eq!(d.path(), Some(path.as_path()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");
    }
}
