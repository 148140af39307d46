//! The editor: one value owning all editing state, driven by input events.
//!
//! The front end owns an [`Editor`], feeds it one [`Event`] at a time via
//! [`Editor::handle_event`], and redraws from its accessors afterwards.
//! Every handler works on `&mut self`; there is no other mutable state.
//!
//! Each keystroke that changes the document records exactly one history
//! [`Action`](crate::history::Action), so `u` steps back one keystroke.
//!
//! ```text
//! Event ─▶ handle_event ─▶ match mode ─▶ handler ─▶ Document / Cursor /
//!                                                   History / SearchState
//!                                         └──▶ scroll() (viewport follows cursor)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult, LineInput};
use crate::completion::{
    CompletionMenu, CompletionProvider, KeywordProvider, Language, identifier_prefix,
};
use crate::config;
use crate::cursor::Cursor;
use crate::document::{Document, Indent};
use crate::error::{CommandError, Error, Result};
use crate::files;
use crate::history::{ActionKind, History, Snapshot};
use crate::input::{Event, Flow, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseEvent, MouseEventKind};
use crate::mode::{Mode, PendingAction};
use crate::options::Options;
use crate::position::Position;
use crate::search::{self, SearchState};
use crate::viewport::{self, Viewport};

/// Rows the mouse wheel moves the cursor.
const WHEEL_STEP: isize = 3;

/// Rows below the text area: status line and notice line.
pub const CHROME_ROWS: usize = 2;

/// Key reference shown by `?` and `:help`.
pub const HELP_TEXT: &[&str] = &[
    "kiki help",
    "",
    "Normal mode",
    "  h j k l / arrows   move",
    "  0 $ / Home End     line start / end",
    "  g G                first / last line",
    "  PageUp PageDown    scroll a screen",
    "  i a o              insert / append / open line",
    "  u  r / Ctrl-R      undo / redo",
    "  /  n N             search / next / previous",
    "  :                  command line",
    "  Ctrl-S Ctrl-Q      save / quit",
    "",
    "Insert mode",
    "  Tab                complete word or indent",
    "  Esc                back to normal mode",
    "",
    "Commands",
    "  :w  :saveas <file>  :q  :q!  :wq",
    "  :line <n>  :find <text>  :replace <old> <new>",
    "  :set [tabsize N | number | nonumber | syntax on|off | wrap]",
    "  :wc  :info  :reload  :new  :rename  :delete [file]",
    "",
    "Press any key to close help",
];

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of the bottom-line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message. Cleared by the next key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Result of one keystroke on a prompt's text field.
enum PromptEdit {
    Edited,
    Submit,
    Cancel,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// The whole editing session.
pub struct Editor {
    doc: Document,
    cursor: Cursor,
    viewport: Viewport,
    history: History,
    search: SearchState,
    options: Options,
    mode: Mode,
    notice: Option<Notice>,
    /// Help overlay is up; the next key closes it.
    show_help: bool,
    provider: Box<dyn CompletionProvider>,
    /// Where `:set` persists options. `None` disables persistence.
    config_path: Option<PathBuf>,
}

impl Editor {
    /// An empty, unnamed document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Edit `doc`. Warns when it was only partially loaded.
    #[must_use]
    pub fn with_document(doc: Document) -> Self {
        let mut editor = Self {
            doc,
            cursor: Cursor::new(),
            viewport: Viewport::default(),
            history: History::new(),
            search: SearchState::new(),
            options: Options::default(),
            mode: Mode::Normal,
            notice: None,
            show_help: false,
            provider: Box::new(KeywordProvider),
            config_path: None,
        };
        if editor.doc.is_truncated() {
            editor.set_warning(truncated_notice(editor.doc.line_count()));
        }
        editor.scroll();
        editor
    }

    /// Open `path`. A path that does not exist yet gives an empty document
    /// bound to it, created on first save.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file exists but cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut doc = Document::new();
            doc.set_path(path.to_path_buf());
            let mut editor = Self::with_document(doc);
            editor.set_message(format!("New file: {}", path.display()));
            return Ok(editor);
        }

        let mut editor = Self::with_document(Document::from_file(path)?);
        if !editor.doc.is_truncated() {
            editor.set_message(format!(
                "Loaded {} ({} lines)",
                editor.doc.display_name(),
                editor.doc.line_count()
            ));
        }
        Ok(editor)
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self.options.tab_size = self.options.tab_size.clamp(1, crate::options::MAX_TAB_SIZE);
        self.scroll();
        self
    }

    /// Persist options to `path` after every successful `:set`.
    #[must_use]
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn CompletionProvider>) -> Self {
        self.provider = provider;
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn doc(&self) -> &Document {
        &self.doc
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    #[must_use]
    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn show_help(&self) -> bool {
        self.show_help
    }

    /// Language of the current file, by extension.
    #[must_use]
    pub fn language(&self) -> Language {
        Language::detect(self.doc.path())
    }

    // -- Notices ------------------------------------------------------------

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.set_notice(NoticeLevel::Info, text);
    }

    pub fn set_warning(&mut self, text: impl Into<String>) {
        self.set_notice(NoticeLevel::Warning, text);
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.set_notice(NoticeLevel::Error, text);
    }

    fn set_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // -- Event dispatch -----------------------------------------------------

    /// Process one event. The viewport is reconciled before returning.
    pub fn handle_event(&mut self, event: &Event) -> Flow {
        let flow = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(*mouse);
                Flow::Continue
            }
            Event::Resize { width, height } => {
                self.resize(usize::from(*width), usize::from(*height));
                Flow::Continue
            }
        };
        if self.search.is_active() {
            self.search.refresh(&self.doc);
        }
        self.scroll();
        flow
    }

    /// Terminal size in cells; the text area is what is left after the
    /// status and notice lines.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport
            .resize(width, height.saturating_sub(CHROME_ROWS));
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        if self.show_help {
            self.show_help = false;
            return Flow::Continue;
        }
        self.clear_notice();

        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert { .. } => self.handle_insert(key),
            Mode::Command(_)
            | Mode::Search(_)
            | Mode::FilenamePrompt(_)
            | Mode::RenamePrompt { .. } => self.handle_prompt(key),
            Mode::ConfirmPrompt(_) => {
                self.handle_confirm(key);
                Flow::Continue
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if std::mem::discriminant(&self.mode) != std::mem::discriminant(&mode) {
            debug!(from = %self.mode, to = %mode, "mode");
        }
        self.mode = mode;
    }

    /// Keep the cursor on screen and the gutter sized to the document.
    fn scroll(&mut self) {
        let gutter = viewport::gutter_width(self.doc.line_count(), self.options.show_line_numbers);
        self.viewport.set_gutter(gutter);
        let line = self.doc.line(self.cursor.line()).unwrap_or_default();
        let col = viewport::display_col(line, self.cursor.col(), self.options.tab_size);
        self.viewport.reconcile(self.cursor.line(), col);
    }

    // -- Normal mode --------------------------------------------------------

    fn handle_normal(&mut self, key: &KeyEvent) -> Flow {
        if key.modifiers.contains(Modifiers::CTRL) {
            return self.handle_ctrl(key);
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.cursor.move_by(0, -1, &self.doc),
            KeyCode::Char('j') | KeyCode::Down => self.cursor.move_by(1, 0, &self.doc),
            KeyCode::Char('k') | KeyCode::Up => self.cursor.move_by(-1, 0, &self.doc),
            KeyCode::Char('l') | KeyCode::Right => self.cursor.move_by(0, 1, &self.doc),
            KeyCode::Char('0') | KeyCode::Home => self.cursor.line_start(),
            KeyCode::Char('$') | KeyCode::End => self.cursor.line_end(&self.doc),
            KeyCode::Char('g') => self.cursor.document_start(),
            KeyCode::Char('G') => self.cursor.document_end(&self.doc),
            KeyCode::PageDown => self.cursor.page_down(self.viewport.height(), &self.doc),
            KeyCode::PageUp => self.cursor.page_up(self.viewport.height(), &self.doc),

            KeyCode::Char('i') => self.set_mode(Mode::insert()),
            KeyCode::Char('a') => {
                self.cursor.move_by(0, 1, &self.doc);
                self.set_mode(Mode::insert());
            }
            KeyCode::Char('o') => self.open_line_below(),

            KeyCode::Char(':') => self.set_mode(Mode::Command(LineInput::new())),
            KeyCode::Char('/') => self.set_mode(Mode::Search(LineInput::new())),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('r') => self.redo(),
            KeyCode::Char('n') => self.search_next(),
            KeyCode::Char('N') => self.search_previous(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        Flow::Continue
    }

    /// Ctrl chords shared by Normal and Insert mode.
    fn handle_ctrl(&mut self, key: &KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('s') => self.execute_command(Command::Write),
            KeyCode::Char('q') => self.execute_command(Command::Quit),
            KeyCode::Char('r') => {
                self.redo();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn open_line_below(&mut self) {
        let indent = self.indent();
        let line = self.cursor.line();
        self.edit(ActionKind::Split, line, 1, |doc, pos| {
            let end = pos.with_col(doc.line_len(pos.line));
            Some(doc.split_line(end, indent))
        });
        self.set_mode(Mode::insert());
    }

    fn undo(&mut self) {
        match self.history.undo(&mut self.doc) {
            Some(pos) => self.cursor.set_position(pos, &self.doc),
            None => self.set_warning("Already at oldest change"),
        }
    }

    fn redo(&mut self) {
        match self.history.redo(&mut self.doc) {
            Some(pos) => self.cursor.set_position(pos, &self.doc),
            None => self.set_warning("Already at newest change"),
        }
    }

    // -- Editing ------------------------------------------------------------

    /// Run one document edit as one history action. `f` gets the cursor
    /// position and returns where the cursor goes, or `None` when it changed
    /// nothing (then nothing is recorded). `start`/`len` bound the lines the
    /// edit may touch.
    fn edit(
        &mut self,
        kind: ActionKind,
        start: usize,
        len: usize,
        f: impl FnOnce(&mut Document, Position) -> Option<Position>,
    ) -> bool {
        let before = self.cursor.position();
        let snap = Snapshot::take(&self.doc, kind, start, len, before);
        let Some(after) = f(&mut self.doc, before) else {
            return false;
        };
        self.history.record(snap.finish(&self.doc, after));
        self.cursor.set_position(after, &self.doc);
        true
    }

    const fn indent(&self) -> Indent {
        if self.options.auto_indent {
            Indent::Auto {
                unit: self.options.tab_size,
            }
        } else {
            Indent::Off
        }
    }

    fn insert_char(&mut self, ch: char) {
        let line = self.cursor.line();
        self.edit(ActionKind::Insert, line, 1, |doc, pos| {
            Some(doc.insert_char(pos, ch))
        });
    }

    fn insert_newline(&mut self) {
        let indent = self.indent();
        let line = self.cursor.line();
        self.edit(ActionKind::Split, line, 1, |doc, pos| {
            Some(doc.split_line(pos, indent))
        });
    }

    fn backspace(&mut self) {
        let pos = self.cursor.position();
        if pos.col > 0 {
            self.edit(ActionKind::Delete, pos.line, 1, |doc, pos| {
                doc.delete_char_before(pos)
            });
        } else if pos.line > 0 {
            self.edit(ActionKind::Join, pos.line - 1, 2, |doc, pos| {
                doc.delete_char_before(pos)
            });
        }
    }

    fn delete_forward(&mut self) {
        let pos = self.cursor.position();
        if pos.col < self.doc.line_len(pos.line) {
            self.edit(ActionKind::Delete, pos.line, 1, |doc, pos| {
                doc.delete_char_at(pos)
            });
        } else {
            self.edit(ActionKind::Join, pos.line, 2, |doc, pos| {
                doc.delete_char_at(pos)
            });
        }
    }

    // -- Insert mode --------------------------------------------------------

    fn handle_insert(&mut self, key: &KeyEvent) -> Flow {
        if self.handle_menu(key) {
            return Flow::Continue;
        }
        if key.modifiers.contains(Modifiers::CTRL) {
            return self.handle_ctrl(key);
        }

        match key.code {
            KeyCode::Escape => self.set_mode(Mode::Normal),
            KeyCode::Char(ch) if !key.modifiers.contains(Modifiers::ALT) => self.insert_char(ch),
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Tab => self.complete_or_indent(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),

            KeyCode::Left => self.cursor.move_by(0, -1, &self.doc),
            KeyCode::Right => self.cursor.move_by(0, 1, &self.doc),
            KeyCode::Up => self.cursor.move_by(-1, 0, &self.doc),
            KeyCode::Down => self.cursor.move_by(1, 0, &self.doc),
            KeyCode::Home => self.cursor.line_start(),
            KeyCode::End => self.cursor.line_end(&self.doc),
            KeyCode::PageDown => self.cursor.page_down(self.viewport.height(), &self.doc),
            KeyCode::PageUp => self.cursor.page_up(self.viewport.height(), &self.doc),
            _ => {}
        }
        Flow::Continue
    }

    /// Keys for an open completion menu. Returns `false` when the key
    /// should be handled as ordinary Insert input (the menu is closed first).
    fn handle_menu(&mut self, key: &KeyEvent) -> bool {
        let Mode::Insert { menu: Some(menu) } = &mut self.mode else {
            return false;
        };
        match key.code {
            KeyCode::Up => menu.select_previous(),
            KeyCode::Down | KeyCode::Tab => menu.select_next(),
            KeyCode::Enter => {
                let anchor = menu.anchor();
                let text = menu.selected().text.clone();
                self.mode = Mode::insert();
                self.accept_completion(anchor, &text);
            }
            KeyCode::Escape => self.mode = Mode::insert(),
            _ => {
                self.mode = Mode::insert();
                return false;
            }
        }
        true
    }

    /// Tab: open the completion menu for the word left of the cursor, or
    /// indent with spaces when there is nothing to complete.
    fn complete_or_indent(&mut self) {
        let pos = self.cursor.position();
        if self.options.auto_complete {
            let line = self.doc.line(pos.line).unwrap_or_default();
            let (start, prefix) = identifier_prefix(line, pos.col);
            if !prefix.is_empty() {
                let items = self.provider.complete(self.language(), &prefix, &self.doc);
                if let Some(menu) = CompletionMenu::new(items, Position::new(pos.line, start)) {
                    debug!(%prefix, items = menu.items().len(), "completion menu");
                    self.mode = Mode::Insert { menu: Some(menu) };
                    return;
                }
            }
        }

        let spaces = " ".repeat(self.options.tab_size);
        self.edit(ActionKind::Insert, pos.line, 1, |doc, pos| {
            Some(doc.insert_text(pos, &spaces))
        });
    }

    /// Replace the text between `anchor` and the cursor with `text`.
    fn accept_completion(&mut self, anchor: Position, text: &str) {
        let line = self.cursor.line();
        self.edit(ActionKind::Replace, line, 1, |doc, pos| {
            let current = doc.line(pos.line)?;
            let head: String = current.chars().take(anchor.col).collect();
            let tail: String = current.chars().skip(pos.col).collect();
            doc.splice(pos.line, 1, vec![format!("{head}{text}{tail}")]);
            Some(pos.with_col(anchor.col + text.chars().count()))
        });
    }

    // -- Prompts ------------------------------------------------------------

    fn handle_prompt(&mut self, key: &KeyEvent) -> Flow {
        let Some(input) = self.mode.prompt_input_mut() else {
            return Flow::Continue;
        };
        match edit_prompt(input, key) {
            PromptEdit::Edited => Flow::Continue,
            PromptEdit::Cancel => {
                if matches!(self.mode, Mode::Search(_)) {
                    self.search.clear();
                }
                self.set_mode(Mode::Normal);
                Flow::Continue
            }
            PromptEdit::Submit => {
                let mode = std::mem::take(&mut self.mode);
                debug!(from = %mode, "submit");
                self.submit_prompt(mode)
            }
        }
    }

    fn submit_prompt(&mut self, mode: Mode) -> Flow {
        match mode {
            Mode::Command(mut input) => match Command::parse(&input.take()) {
                Ok(cmd) => return self.execute_command(cmd),
                Err(err) => self.set_error(err.to_string()),
            },
            Mode::Search(mut input) => self.confirm_search(&input.take()),
            Mode::FilenamePrompt(mut input) => self.create_file(input.take().trim()),
            Mode::RenamePrompt { from, mut input } => self.rename_file(&from, input.take().trim()),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_confirm(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                if let Mode::ConfirmPrompt(action) = std::mem::take(&mut self.mode) {
                    self.run_pending(action);
                }
            }
            KeyCode::Char('n' | 'N') | KeyCode::Escape => {
                if let Mode::ConfirmPrompt(action) = std::mem::take(&mut self.mode) {
                    self.set_message(match action {
                        PendingAction::DeleteFile(_) => "Delete cancelled",
                        PendingAction::OverwriteFile(_) => "Save cancelled",
                    });
                }
            }
            _ => {}
        }
    }

    fn run_pending(&mut self, action: PendingAction) {
        debug!(?action, "confirmed");
        match action {
            PendingAction::DeleteFile(path) => match files::delete(&path) {
                Ok(()) => {
                    if self.doc.path() == Some(path.as_path()) {
                        self.doc.detach();
                    }
                    info!(path = %path.display(), "deleted");
                    self.set_message(format!("Deleted {}", path.display()));
                }
                Err(err) => self.set_error(format!("Error deleting file: {err}")),
            },
            PendingAction::OverwriteFile(path) => {
                let result = self.save_as(&path);
                self.show_result(result);
            }
        }
    }

    fn create_file(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        let path = PathBuf::from(name);
        match files::create_new(&path) {
            Ok(()) => {
                info!(path = %path.display(), "created");
                self.set_message(format!("Created {}", path.display()));
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    /// A bare name stays in `from`'s directory.
    fn rename_file(&mut self, from: &Path, name: &str) {
        if name.is_empty() {
            return;
        }
        let mut to = PathBuf::from(name);
        if to.parent().is_none_or(|p| p.as_os_str().is_empty()) {
            to = from.with_file_name(name);
        }
        match files::rename(from, &to) {
            Ok(()) => {
                if self.doc.path() == Some(from) {
                    self.doc.set_path(to.clone());
                }
                info!(from = %from.display(), to = %to.display(), "renamed");
                self.set_message(format!("Renamed to {}", to.display()));
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    // -- Search -------------------------------------------------------------

    fn confirm_search(&mut self, term: &str) {
        if term.is_empty() {
            self.search.clear();
            return;
        }
        self.search.set_term(term, &self.doc);
        match self.search.current() {
            Some(pos) => {
                self.cursor.set_position(pos, &self.doc);
                self.set_message(self.search.status());
            }
            None => self.set_warning(self.search.status()),
        }
    }

    fn search_next(&mut self) {
        self.step_search(SearchState::next);
    }

    fn search_previous(&mut self) {
        self.step_search(SearchState::previous);
    }

    fn step_search(&mut self, step: fn(&mut SearchState, &Document) -> Option<Position>) {
        if !self.search.is_active() {
            self.set_warning("No previous search");
            return;
        }
        match step(&mut self.search, &self.doc) {
            Some(pos) => {
                self.cursor.set_position(pos, &self.doc);
                self.set_message(self.search.status());
            }
            None => self.set_warning(self.search.status()),
        }
    }

    // -- Commands -----------------------------------------------------------

    /// Execute a parsed command and report its outcome on the notice line.
    pub fn execute_command(&mut self, cmd: Command) -> Flow {
        debug!(?cmd, "command");
        match self.run_command(cmd) {
            CommandResult::Ok(Some(msg)) => {
                self.set_message(msg);
                Flow::Continue
            }
            CommandResult::Ok(None) => Flow::Continue,
            CommandResult::Err(msg) => {
                self.set_error(msg);
                Flow::Continue
            }
            CommandResult::Quit => Flow::Quit,
        }
    }

    fn run_command(&mut self, cmd: Command) -> CommandResult {
        match cmd {
            Command::Write => self.cmd_write(),
            Command::SaveAs(path) => self.cmd_save_as(path),
            Command::Quit => self.cmd_quit(),
            Command::ForceQuit => CommandResult::Quit,
            Command::WriteQuit => match self.cmd_write() {
                CommandResult::Ok(_) => CommandResult::Quit,
                err => err,
            },
            Command::Line(n) => self.cmd_line(n),
            Command::Set(args) => self.cmd_set(&args),
            Command::Find(term) => self.cmd_find(&term),
            Command::Replace { old, new } => self.cmd_replace(&old, &new),
            Command::WordCount => CommandResult::Ok(Some(self.doc.word_count().to_string())),
            Command::Info => CommandResult::Ok(Some(self.info())),
            Command::Reload => self.cmd_reload(),
            Command::Help => {
                self.show_help = true;
                CommandResult::Ok(None)
            }
            Command::New => {
                self.set_mode(Mode::FilenamePrompt(LineInput::new()));
                CommandResult::Ok(None)
            }
            Command::Rename => match self.doc.path() {
                Some(path) => {
                    let from = path.to_path_buf();
                    let input = LineInput::with_text(&self.doc.display_name());
                    self.set_mode(Mode::RenamePrompt { from, input });
                    CommandResult::Ok(None)
                }
                None => Error::NoFileName.into(),
            },
            Command::Delete(path) => match path.or_else(|| self.doc.path().map(Path::to_path_buf)) {
                Some(path) => {
                    self.set_mode(Mode::ConfirmPrompt(PendingAction::DeleteFile(path)));
                    CommandResult::Ok(None)
                }
                None => CommandError::Usage("delete <filename>").into(),
            },
            Command::Empty => CommandResult::Ok(None),
        }
    }

    /// `:w`
    fn cmd_write(&mut self) -> CommandResult {
        let Some(path) = self.doc.path().map(Path::to_path_buf) else {
            return Error::NoFileName.into();
        };
        if self.doc.is_truncated() {
            warn!(path = %path.display(), "refusing to overwrite partially loaded file");
            return CommandResult::Err(
                "File was only partially loaded (use :saveas <path>)".to_string(),
            );
        }
        match self.doc.save(self.options.backup) {
            Ok(bytes) => {
                CommandResult::Ok(Some(format!("\"{}\" written, {bytes}B", self.doc.display_name())))
            }
            Err(err) => {
                warn!(%err, "save failed");
                CommandResult::Err(format!("Error saving: {err}"))
            }
        }
    }

    /// `:saveas <path>`. Asks before replacing a different existing file.
    fn cmd_save_as(&mut self, path: PathBuf) -> CommandResult {
        let same_file = self.doc.path() == Some(path.as_path());
        if same_file && self.doc.is_truncated() {
            warn!(path = %path.display(), "refusing to overwrite partially loaded file");
            return CommandResult::Err(
                "File was only partially loaded (save it under another name)".to_string(),
            );
        }
        if path.exists() && !same_file {
            self.set_mode(Mode::ConfirmPrompt(PendingAction::OverwriteFile(path)));
            return CommandResult::Ok(None);
        }
        self.save_as(&path)
    }

    fn save_as(&mut self, path: &Path) -> CommandResult {
        match self.doc.save_as(path, self.options.backup) {
            Ok(_) => CommandResult::Ok(Some(format!("File saved as {}", path.display()))),
            Err(err) => {
                warn!(%err, "save as failed");
                CommandResult::Err(format!("Error saving as: {err}"))
            }
        }
    }

    /// `:q`
    fn cmd_quit(&self) -> CommandResult {
        if self.doc.is_modified() {
            warn!("quit refused: unsaved changes");
            CommandError::UnsavedChanges.into()
        } else {
            CommandResult::Quit
        }
    }

    /// `:line <n>`, 1-based.
    fn cmd_line(&mut self, n: usize) -> CommandResult {
        if n == 0 || n > self.doc.line_count() {
            return CommandError::InvalidLine(n.to_string()).into();
        }
        self.cursor.set_position(Position::new(n - 1, 0), &self.doc);
        CommandResult::Ok(Some(format!("Jumped to line {n}")))
    }

    /// `:set`. Changes are written to the config file.
    fn cmd_set(&mut self, args: &str) -> CommandResult {
        let msg = match self.options.apply(args) {
            Ok(msg) => msg,
            Err(err) => return err.into(),
        };
        if args.trim().is_empty() {
            return CommandResult::Ok(Some(msg));
        }
        if let Some(path) = &self.config_path {
            if let Err(err) = config::save(path, &self.options) {
                warn!(%err, "could not save settings");
                return CommandResult::Err(format!("Error saving settings: {err}"));
            }
        }
        CommandResult::Ok(Some(msg))
    }

    /// `:find <text>`: the first match after the cursor, wrapping.
    fn cmd_find(&mut self, term: &str) -> CommandResult {
        self.search.set_term(term, &self.doc);
        match self.search.select_after(self.cursor.position(), &self.doc) {
            Some(pos) => {
                self.cursor.set_position(pos, &self.doc);
                CommandResult::Ok(Some(self.search.status()))
            }
            None => {
                self.set_warning(self.search.status());
                CommandResult::Ok(None)
            }
        }
    }

    /// `:replace <old> <new>`: one history action for the whole document.
    fn cmd_replace(&mut self, old: &str, new: &str) -> CommandResult {
        let before = self.cursor.position();
        let snap = Snapshot::whole(&self.doc, ActionKind::Replace, before);
        let count = search::replace_all(&mut self.doc, old, new);
        if count > 0 {
            self.cursor.clamp(&self.doc);
            self.history
                .record(snap.finish(&self.doc, self.cursor.position()));
        }
        CommandResult::Ok(Some(format!("Replaced {count} occurrences")))
    }

    /// `:reload`: discard edits and history.
    fn cmd_reload(&mut self) -> CommandResult {
        let Some(path) = self.doc.path().map(Path::to_path_buf) else {
            return CommandResult::Err("No file to reload".to_string());
        };
        match Document::from_file(&path) {
            Ok(doc) => {
                self.doc = doc;
                self.history.clear();
                self.search.clear();
                self.cursor.clamp(&self.doc);
                info!(path = %path.display(), "reloaded");
                if self.doc.is_truncated() {
                    self.set_warning(truncated_notice(self.doc.line_count()));
                    return CommandResult::Ok(None);
                }
                CommandResult::Ok(Some(format!("Reloaded: {}", self.doc.display_name())))
            }
            Err(err) => CommandResult::Err(format!("Error reloading file: {err}")),
        }
    }

    /// `File: NAME | Lines: L | Size: B bytes | Type: T`
    fn info(&self) -> String {
        let kind = if self.doc.path().is_some() {
            self.language().name()
        } else {
            "New File"
        };
        format!(
            "File: {} | Lines: {} | Size: {} bytes | Type: {kind}",
            self.doc.display_name(),
            self.doc.line_count(),
            self.doc.byte_len()
        )
    }

    fn show_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Ok(Some(msg)) => self.set_message(msg),
            CommandResult::Err(msg) => self.set_error(msg),
            CommandResult::Ok(None) | CommandResult::Quit => {}
        }
    }

    // -- Mouse --------------------------------------------------------------

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !(self.mode.is_normal() || self.mode.is_insert()) {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.cursor.move_by(-WHEEL_STEP, 0, &self.doc),
            MouseEventKind::ScrollDown => self.cursor.move_by(WHEEL_STEP, 0, &self.doc),
            MouseEventKind::Click => {
                let row = usize::from(mouse.y);
                if row >= self.viewport.height() {
                    return;
                }
                let line = (self.viewport.top() + row).min(self.doc.line_count() - 1);
                let x = usize::from(mouse.x).saturating_sub(self.viewport.gutter());
                let text = self.doc.line(line).unwrap_or_default();
                let col = viewport::char_col_at(text, self.viewport.left() + x, self.options.tab_size);
                self.cursor.set_position(Position::new(line, col), &self.doc);
                if self.mode.is_insert() {
                    self.mode = Mode::insert();
                }
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("doc", &self.doc)
            .field("cursor", &self.cursor)
            .field("mode", &self.mode)
            .field("history", &self.history.undo_count())
            .finish_non_exhaustive()
    }
}

fn truncated_notice(lines: usize) -> String {
    format!("Large file: only first {lines} lines loaded")
}

/// Apply one key to a prompt's text field.
fn edit_prompt(input: &mut LineInput, key: &KeyEvent) -> PromptEdit {
    if key.is_ctrl('c') {
        return PromptEdit::Cancel;
    }
    match key.code {
        KeyCode::Escape => return PromptEdit::Cancel,
        KeyCode::Enter => return PromptEdit::Submit,
        KeyCode::Char(ch) if !key.modifiers.contains(Modifiers::CTRL) => input.insert_char(ch),
        KeyCode::Backspace => {
            // Backspace on an empty field leaves the prompt.
            if !input.backspace() && input.is_empty() {
                return PromptEdit::Cancel;
            }
        }
        KeyCode::Delete => {
            input.delete();
        }
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
    PromptEdit::Edited
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
