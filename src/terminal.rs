// SPDX-License-Identifier: MIT
//
// Terminal session and event loop.
//
// `Terminal` owns the raw-mode state: entering switches to the alternate
// screen with mouse capture, and dropping it puts everything back, even
// when the editor panics mid-frame. `run` is the loop itself:
//
//   crossterm event → translate → Editor::handle_event → render::draw
//
// crossterm's types stop at this file. The editor crate only sees its own
// backend-neutral `input::Event`.

use std::io::{self, Stdout, Write};
use std::sync::Once;

use anyhow::Result;
use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CtEvent, KeyCode as CtKeyCode,
    KeyEvent as CtKeyEvent, KeyEventKind as CtKeyEventKind, KeyModifiers, MouseButton,
    MouseEvent as CtMouseEvent, MouseEventKind as CtMouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use tracing::{debug, info};

use kiki_editor::Editor;
use kiki_editor::input::{
    Event, Flow, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseEvent, MouseEventKind,
};

use crate::render;

// ─── Terminal guard ─────────────────────────────────────────────────────────

/// Raw mode plus alternate screen for as long as this value lives.
pub struct Terminal {
    out: Stdout,
    active: bool,
}

impl Terminal {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Fails when stdout is not a terminal or raw mode cannot be set.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self { out, active: true })
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn leave(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        restore(&mut self.out);
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave();
    }
}

/// Best effort: errors here have nowhere to go.
fn restore(out: &mut impl Write) {
    let _ = execute!(
        out,
        DisableMouseCapture,
        SetCursorStyle::DefaultUserShape,
        Show,
        LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

static PANIC_HOOK: Once = Once::new();

/// Restore the screen before the panic message prints, so it lands on a
/// usable terminal.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore(&mut io::stdout());
            tracing::error!(%info, "panic");
            original(info);
        }));
    });
}

// ─── Event loop ─────────────────────────────────────────────────────────────

/// Edit until the editor asks to quit.
///
/// # Errors
///
/// Terminal I/O failures. Editing errors are shown as notices instead.
pub fn run(editor: &mut Editor) -> Result<()> {
    let mut term = Terminal::enter()?;
    let (width, height) = terminal::size()?;
    editor.resize(usize::from(width), usize::from(height));
    info!(width, height, "terminal ready");

    loop {
        render::draw(term.out(), editor)?;
        let raw = event::read()?;
        let Some(event) = translate(&raw) else {
            continue;
        };
        if editor.handle_event(&event) == Flow::Quit {
            debug!("quit requested");
            break;
        }
    }

    term.leave();
    Ok(())
}

// ─── Translation ────────────────────────────────────────────────────────────

/// Map a crossterm event onto the editor's own input types. Events the
/// editor has no use for map to `None`.
#[must_use]
pub fn translate(event: &CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(key) => translate_key(key).map(Event::Key),
        CtEvent::Mouse(mouse) => translate_mouse(mouse).map(Event::Mouse),
        CtEvent::Resize(width, height) => Some(Event::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn translate_key(key: &CtKeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    let mut modifiers = Modifiers::empty();
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CTRL;
    }
    if key.modifiers.contains(KeyModifiers::SUPER) {
        modifiers |= Modifiers::SUPER;
    }

    let kind = match key.kind {
        CtKeyEventKind::Press => KeyEventKind::Press,
        CtKeyEventKind::Repeat => KeyEventKind::Repeat,
        CtKeyEventKind::Release => KeyEventKind::Release,
    };

    Some(KeyEvent {
        code,
        modifiers,
        kind,
    })
}

fn translate_mouse(mouse: &CtMouseEvent) -> Option<MouseEvent> {
    let kind = match mouse.kind {
        CtMouseEventKind::Down(MouseButton::Left) => MouseEventKind::Click,
        CtMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        CtMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent {
        kind,
        x: mouse.column,
        y: mouse.row,
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;

    fn ct_key(code: CtKeyCode, modifiers: KeyModifiers, kind: CtKeyEventKind) -> CtEvent {
        CtEvent::Key(CtKeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn plain_char() {
        let ev = translate(&ct_key(
            CtKeyCode::Char('x'),
            KeyModifiers::NONE,
            CtKeyEventKind::Press,
        ));
        assert_eq!(
            ev,
            Some(Event::Key(KeyEvent::new(KeyCode::Char('x'), Modifiers::empty())))
        );
    }

    #[test]
    fn ctrl_chord_keeps_modifier() {
        let ev = translate(&ct_key(
            CtKeyCode::Char('s'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            CtKeyEventKind::Press,
        ));
        let Some(Event::Key(key)) = ev else {
            panic!("expected a key event");
        };
        assert!(key.is_ctrl('s'));
        assert!(key.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn release_kind_is_carried() {
        let ev = translate(&ct_key(
            CtKeyCode::Esc,
            KeyModifiers::NONE,
            CtKeyEventKind::Release,
        ));
        let Some(Event::Key(key)) = ev else {
            panic!("expected a key event");
        };
        assert_eq!(key.code, KeyCode::Escape);
        assert_eq!(key.kind, KeyEventKind::Release);
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let ev = translate(&ct_key(
            CtKeyCode::Insert,
            KeyModifiers::NONE,
            CtKeyEventKind::Press,
        ));
        assert_eq!(ev, None);
    }

    #[test]
    fn mouse_events() {
        let click = CtEvent::Mouse(CtMouseEvent {
            kind: CtMouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            translate(&click),
            Some(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Click,
                x: 5,
                y: 2
            }))
        );

        let right = CtEvent::Mouse(CtMouseEvent {
            kind: CtMouseEventKind::Down(MouseButton::Right),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(&right), None);
    }

    #[test]
    fn resize_and_focus() {
        assert_eq!(
            translate(&CtEvent::Resize(100, 30)),
            Some(Event::Resize {
                width: 100,
                height: 30
            })
        );
        assert_eq!(translate(&CtEvent::FocusGained), None);
    }
}
