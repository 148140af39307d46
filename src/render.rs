// SPDX-License-Identifier: MIT
//
// Screen painter. Every frame is drawn top to bottom from the editor's
// state:
//
//   ┌──────────────────────────────┐
//   │ gutter │ text                │  ← viewport height rows
//   ├──────────────────────────────┤
//   │ status line (reverse video)  │  ← 1 row
//   ├──────────────────────────────┤
//   │ notice / prompt line         │  ← 1 row
//   └──────────────────────────────┘
//
// The editor reconciles its viewport after each event, so painting only
// reads. Layout math lives in small pure functions that the tests cover;
// the `draw_*` functions just queue crossterm commands.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, SetCursorStyle, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use unicode_width::UnicodeWidthStr;

use kiki_editor::editor::{Editor, HELP_TEXT, NoticeLevel};
use kiki_editor::mode::{CursorShape, Mode};
use kiki_editor::viewport;

/// Widest the completion popup gets.
const MENU_WIDTH: usize = 40;

// ─── Spans ──────────────────────────────────────────────────────────────────

/// A run of visible text drawn with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub highlight: bool,
}

fn push_span(spans: &mut Vec<Span>, text: &str, highlight: bool) {
    match spans.last_mut() {
        Some(last) if last.highlight == highlight => last.text.push_str(text),
        _ => spans.push(Span {
            text: text.to_string(),
            highlight,
        }),
    }
}

/// The part of `line` between screen columns `left` and `left + width`,
/// with tabs expanded. `marks` are char ranges to highlight. A tab or wide
/// char cut by the left edge shows as spaces; one cut by the right edge is
/// dropped.
#[must_use]
pub fn line_spans(
    line: &str,
    left: usize,
    width: usize,
    tab_width: usize,
    marks: &[(usize, usize)],
) -> Vec<Span> {
    let right = left + width;
    let mut spans = Vec::new();
    let mut col = 0;

    for (i, ch) in line.chars().enumerate() {
        if ch != '\t' && ch.is_control() {
            continue;
        }
        let next = viewport::advance(col, ch, tab_width);
        if next > right {
            break;
        }
        if col >= left {
            let highlight = marks.iter().any(|&(start, end)| (start..end).contains(&i));
            if ch == '\t' {
                push_span(&mut spans, &" ".repeat(next - col), highlight);
            } else {
                let mut buf = [0; 4];
                push_span(&mut spans, ch.encode_utf8(&mut buf), highlight);
            }
        } else if next > left {
            push_span(&mut spans, &" ".repeat(next - left), false);
        }
        col = next;
    }
    spans
}

/// Right-aligned line number plus a separator column.
#[must_use]
pub fn gutter_text(number: usize, gutter: usize) -> String {
    let digits = gutter.saturating_sub(1);
    format!("{number:>digits$} ")
}

// ─── Status and prompt lines ────────────────────────────────────────────────

/// ` MODE  name [+]` on the left, `language  line:col ` on the right,
/// padded or cut to exactly `width` columns.
#[must_use]
pub fn status_line(editor: &Editor, width: usize) -> String {
    let doc = editor.doc();
    let dirty = if doc.is_modified() { " [+]" } else { "" };
    let left = format!(" {}  {}{dirty}", editor.mode(), doc.display_name());
    let right = format!(
        "{}  {} ",
        editor.language(),
        editor.cursor().position()
    );
    fit(&left, &right, width)
}

fn fit(left: &str, right: &str, width: usize) -> String {
    let used = left.width() + right.width();
    if used <= width {
        format!("{left}{}{right}", " ".repeat(width - used))
    } else {
        truncate(left, width)
    }
}

fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// The bottom row for prompt modes: label plus input, and the screen
/// column of the input cursor.
#[must_use]
pub fn prompt_line(mode: &Mode) -> Option<(String, usize)> {
    if let Mode::ConfirmPrompt(action) = mode {
        let question = action.question();
        let col = question.width();
        return Some((question, col));
    }
    let (label, input) = mode.prompt()?;
    let before: String = input.input().chars().take(input.cursor()).collect();
    Some((
        format!("{label}{}", input.input()),
        label.width() + before.width(),
    ))
}

// ─── Drawing ────────────────────────────────────────────────────────────────

fn cell(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Paint one frame.
pub fn draw(out: &mut impl Write, editor: &Editor) -> io::Result<()> {
    queue!(out, Hide)?;
    if editor.show_help() {
        draw_help(out, editor)?;
        return out.flush();
    }

    draw_text(out, editor)?;
    draw_status(out, editor)?;
    let prompt_cursor = draw_bottom(out, editor)?;
    draw_menu(out, editor)?;

    let (x, y) = prompt_cursor.unwrap_or_else(|| text_cursor(editor));
    let shape = match editor.mode().cursor_shape() {
        CursorShape::SteadyBlock => SetCursorStyle::SteadyBlock,
        CursorShape::SteadyBar => SetCursorStyle::SteadyBar,
    };
    queue!(out, MoveTo(x, y), shape, Show)?;
    out.flush()
}

/// Screen cell of the text cursor.
fn text_cursor(editor: &Editor) -> (u16, u16) {
    let vp = editor.viewport();
    let pos = editor.cursor().position();
    let line = editor.doc().line(pos.line).unwrap_or_default();
    let col = viewport::display_col(line, pos.col, editor.options().tab_size);
    let x = vp.gutter() + col.saturating_sub(vp.left());
    let y = pos.line.saturating_sub(vp.top());
    (cell(x), cell(y))
}

fn draw_text(out: &mut impl Write, editor: &Editor) -> io::Result<()> {
    let doc = editor.doc();
    let vp = editor.viewport();
    let search = editor.search();
    let match_len = search.match_len();

    for row in 0..vp.height() {
        let index = vp.top() + row;
        queue!(out, MoveTo(0, cell(row)))?;
        if let Some(text) = doc.line(index) {
            if vp.gutter() > 0 {
                queue!(
                    out,
                    SetForegroundColor(Color::DarkGrey),
                    Print(gutter_text(index + 1, vp.gutter())),
                    ResetColor
                )?;
            }
            let marks: Vec<(usize, usize)> = search
                .matches()
                .iter()
                .filter(|m| m.line == index)
                .map(|m| (m.col, m.col + match_len))
                .collect();
            let spans = line_spans(text, vp.left(), vp.text_width(), editor.options().tab_size, &marks);
            for span in spans {
                if span.highlight {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reverse),
                        Print(span.text),
                        SetAttribute(Attribute::NoReverse)
                    )?;
                } else {
                    queue!(out, Print(span.text))?;
                }
            }
        } else {
            queue!(out, SetForegroundColor(Color::DarkBlue), Print("~"), ResetColor)?;
        }
        queue!(out, Clear(ClearType::UntilNewLine))?;
    }
    Ok(())
}

fn draw_status(out: &mut impl Write, editor: &Editor) -> io::Result<()> {
    let vp = editor.viewport();
    queue!(
        out,
        MoveTo(0, cell(vp.height())),
        SetAttribute(Attribute::Reverse),
        Print(status_line(editor, vp.width())),
        SetAttribute(Attribute::Reset)
    )
}

/// Notice or prompt. Returns the prompt cursor cell when a prompt is up.
fn draw_bottom(out: &mut impl Write, editor: &Editor) -> io::Result<Option<(u16, u16)>> {
    let vp = editor.viewport();
    let y = cell(vp.height() + 1);
    queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;

    if let Some((text, col)) = prompt_line(editor.mode()) {
        queue!(out, Print(truncate(&text, vp.width())))?;
        return Ok(Some((cell(col.min(vp.width().saturating_sub(1))), y)));
    }

    if let Some(notice) = editor.notice() {
        let color = match notice.level {
            NoticeLevel::Info => Color::Reset,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        queue!(
            out,
            SetForegroundColor(color),
            Print(truncate(&notice.text, vp.width())),
            ResetColor
        )?;
    } else {
        let hint = editor.mode().hint();
        let pad = vp.width().saturating_sub(hint.width());
        queue!(
            out,
            MoveTo(cell(pad), y),
            SetForegroundColor(Color::DarkGrey),
            Print(truncate(hint, vp.width())),
            ResetColor
        )?;
    }
    Ok(None)
}

/// Completion popup just below the cursor, or above it near the bottom.
fn draw_menu(out: &mut impl Write, editor: &Editor) -> io::Result<()> {
    let Mode::Insert { menu: Some(menu) } = editor.mode() else {
        return Ok(());
    };
    let vp = editor.viewport();
    let (x, y) = text_cursor(editor);
    let rows = menu.items().len();
    let below = usize::from(y) + 1;
    let top = if below + rows <= vp.height() {
        below
    } else {
        usize::from(y).saturating_sub(rows)
    };
    let width = MENU_WIDTH.min(vp.width().saturating_sub(usize::from(x)).max(1));

    for (i, item) in menu.items().iter().enumerate() {
        let text = truncate(&format!(" {}  {} ", item.text, item.description), width);
        let padded = format!("{text}{}", " ".repeat(width - text.width()));
        queue!(out, MoveTo(x, cell(top + i)))?;
        if i == menu.selected_index() {
            queue!(out, SetAttribute(Attribute::Reverse), Print(padded), SetAttribute(Attribute::Reset))?;
        } else {
            queue!(out, SetForegroundColor(Color::Grey), Print(padded), ResetColor)?;
        }
    }
    Ok(())
}

fn draw_help(out: &mut impl Write, editor: &Editor) -> io::Result<()> {
    let vp = editor.viewport();
    let rows = vp.height() + 2;
    let width = vp.width();
    for row in 0..rows {
        queue!(out, MoveTo(0, cell(row)), Clear(ClearType::CurrentLine))?;
        if let Some(line) = HELP_TEXT.get(row) {
            let x = width.saturating_sub(line.width()) / 2;
            queue!(out, MoveTo(cell(x), cell(row)), Print(truncate(line, width)))?;
        }
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
