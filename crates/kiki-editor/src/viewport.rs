//! Viewport: which slice of the document is on screen.
//!
//! The terminal size comes from outside (resize events); the viewport only
//! keeps the scroll offsets consistent with the cursor. After every
//! cursor-affecting operation the editor calls [`Viewport::reconcile`], which
//! guarantees:
//!
//! ```text
//! top  <= cursor.line        < top  + height
//! left <= cursor display col < left + text_width
//! ```
//!
//! Display columns differ from char columns: tabs expand to the next tab
//! stop and wide characters take two cells.

use unicode_width::UnicodeWidthChar;

/// Width of the line-number gutter: digits of the highest line number plus
/// one separator column, or 0 when numbers are hidden.
#[must_use]
pub fn gutter_width(line_count: usize, show_numbers: bool) -> usize {
    if !show_numbers {
        return 0;
    }
    let digits = line_count.max(1).ilog10() as usize + 1;
    digits + 1
}

/// Screen column of char column `char_col` in `line`.
#[must_use]
pub fn display_col(line: &str, char_col: usize, tab_width: usize) -> usize {
    let tab_w = tab_width.max(1);
    let mut col = 0;
    for ch in line.chars().take(char_col) {
        col = advance(col, ch, tab_w);
    }
    col
}

/// Screen column after drawing `ch` at `col`.
#[inline]
#[must_use]
pub fn advance(col: usize, ch: char, tab_width: usize) -> usize {
    if ch == '\t' {
        (col / tab_width.max(1) + 1) * tab_width.max(1)
    } else {
        col + ch.width().unwrap_or(0)
    }
}

/// Char column that lands on screen column `target` (for mouse clicks).
/// Past the end of the line this is the line length.
#[must_use]
pub fn char_col_at(line: &str, target: usize, tab_width: usize) -> usize {
    let mut col = 0;
    for (i, ch) in line.chars().enumerate() {
        let next = advance(col, ch, tab_width);
        if target < next {
            return i;
        }
        col = next;
    }
    line.chars().count()
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Scroll offsets plus the size of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    left: usize,
    height: usize,
    width: usize,
    gutter: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            top: 0,
            left: 0,
            height,
            width,
            gutter: 0,
        }
    }

    /// First visible line.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    /// First visible display column.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> usize {
        self.left
    }

    /// Visible text rows; never less than 1.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height.max(1)
    }

    /// Full width including the gutter.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn gutter(&self) -> usize {
        self.gutter
    }

    /// Columns left for text after the gutter; never less than 1.
    #[inline]
    #[must_use]
    pub fn text_width(&self) -> usize {
        self.width.saturating_sub(self.gutter).max(1)
    }

    pub const fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub const fn set_gutter(&mut self, gutter: usize) {
        self.gutter = gutter;
    }

    /// Vertical rule only: scroll so `line` is on screen.
    pub fn reconcile_rows(&mut self, line: usize) {
        let h = self.height();
        if line < self.top {
            self.top = line;
        }
        if line >= self.top + h {
            self.top = line - h + 1;
        }
    }

    /// Scroll both ways so the cursor cell is on screen. Idempotent.
    pub fn reconcile(&mut self, line: usize, display_col: usize) {
        self.reconcile_rows(line);

        let w = self.text_width();
        if display_col < self.left {
            self.left = display_col;
        }
        if display_col >= self.left + w {
            self.left = display_col - w + 1;
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 22)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- gutter_width -------------------------------------------------------

    #[test]
    fn gutter_widths() {
        assert_eq!(gutter_width(1, true), 2);
        assert_eq!(gutter_width(9, true), 2);
        assert_eq!(gutter_width(10, true), 3);
        assert_eq!(gutter_width(1000, true), 5);
        assert_eq!(gutter_width(1000, false), 0);
    }

    // -- display columns ----------------------------------------------------

    #[test]
    fn display_col_plain() {
        assert_eq!(display_col("hello", 3, 4), 3);
    }

    #[test]
    fn display_col_tabs_snap_to_stops() {
        assert_eq!(display_col("\tx", 1, 4), 4);
        assert_eq!(display_col("ab\tx", 3, 4), 4);
        assert_eq!(display_col("ab\tx", 4, 8), 9);
    }

    #[test]
    fn display_col_wide_chars() {
        assert_eq!(display_col("\u{4e16}\u{754c}!", 2, 4), 4);
    }

    #[test]
    fn char_col_at_inverts_display_col() {
        assert_eq!(char_col_at("\tab", 0, 4), 0);
        assert_eq!(char_col_at("\tab", 3, 4), 0);
        assert_eq!(char_col_at("\tab", 4, 4), 1);
        assert_eq!(char_col_at("\tab", 40, 4), 3);
    }

    // -- reconcile ----------------------------------------------------------

    #[test]
    fn scrolls_down_to_cursor() {
        let mut v = Viewport::new(80, 10);
        v.reconcile_rows(15);
        assert_eq!(v.top(), 6);
    }

    #[test]
    fn scrolls_up_to_cursor() {
        let mut v = Viewport::new(80, 10);
        v.reconcile_rows(30);
        v.reconcile_rows(3);
        assert_eq!(v.top(), 3);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut v = Viewport::new(20, 5);
        v.reconcile(12, 40);
        let once = v;
        v.reconcile(12, 40);
        assert_eq!(v, once);
        assert!(v.top() <= 12 && 12 < v.top() + v.height());
    }

    #[test]
    fn horizontal_respects_gutter() {
        let mut v = Viewport::new(20, 5);
        v.set_gutter(4);
        v.reconcile(0, 16);
        assert_eq!(v.left(), 1);
        v.reconcile(0, 0);
        assert_eq!(v.left(), 0);
    }

    #[test]
    fn zero_height_acts_as_one() {
        let mut v = Viewport::new(10, 0);
        v.reconcile_rows(5);
        assert_eq!(v.top(), 5);
    }
}
