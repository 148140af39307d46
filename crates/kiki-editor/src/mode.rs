//! Modal editing states.
//!
//! The editor is always in exactly one [`Mode`], and each mode carries its
//! own scratch state, so leaving a mode drops that state with it:
//!
//! | Mode             | Payload                     | Cursor shape | Bottom line          |
//! |------------------|-----------------------------|--------------|----------------------|
//! | `Normal`         | none                        | Block        | notice               |
//! | `Insert`         | optional completion menu    | Bar          | notice               |
//! | `Command`        | `:` text                    | Bar          | `:` + text           |
//! | `Search`         | `/` text                    | Bar          | `/` + text           |
//! | `FilenamePrompt` | new file path               | Bar          | `New file: ` + text  |
//! | `RenamePrompt`   | source path + new name      | Bar          | `Rename to: ` + text |
//! | `ConfirmPrompt`  | the pending action          | Block        | question             |

use std::fmt;
use std::path::{Path, PathBuf};

use crate::command::LineInput;
use crate::completion::CompletionMenu;

// ---------------------------------------------------------------------------
// PendingAction
// ---------------------------------------------------------------------------

/// An operation waiting for `y` in [`Mode::ConfirmPrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Remove this file from disk.
    DeleteFile(PathBuf),
    /// `:saveas` onto a file that already exists.
    OverwriteFile(PathBuf),
}

impl PendingAction {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::DeleteFile(p) | Self::OverwriteFile(p) => p,
        }
    }

    /// The question shown while waiting.
    #[must_use]
    pub fn question(&self) -> String {
        match self {
            Self::DeleteFile(p) => format!("Delete {}? (y/n)", p.display()),
            Self::OverwriteFile(p) => format!("Overwrite {}? (y/n)", p.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode and its scratch state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Keys are commands.
    #[default]
    Normal,
    /// Keys are text. `menu` is the open completion popup, if any.
    Insert { menu: Option<CompletionMenu> },
    /// Typing a `:` command.
    Command(LineInput),
    /// Typing a `/` search term.
    Search(LineInput),
    /// Typing the path of a file to create.
    FilenamePrompt(LineInput),
    /// Typing a new name for `from`.
    RenamePrompt { from: PathBuf, input: LineInput },
    /// Waiting for `y` or `n`.
    ConfirmPrompt(PendingAction),
}

impl Mode {
    /// Insert mode with no menu open.
    #[must_use]
    pub const fn insert() -> Self {
        Self::Insert { menu: None }
    }

    /// Name for the status line.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert { .. } => "INSERT",
            Self::Command(_) => "COMMAND",
            Self::Search(_) => "SEARCH",
            Self::FilenamePrompt(_) => "NEW FILE",
            Self::RenamePrompt { .. } => "RENAME",
            Self::ConfirmPrompt(_) => "CONFIRM",
        }
    }

    #[must_use]
    pub const fn cursor_shape(&self) -> CursorShape {
        match self {
            Self::Normal | Self::ConfirmPrompt(_) => CursorShape::SteadyBlock,
            _ => CursorShape::SteadyBar,
        }
    }

    /// The text field of a prompt mode, with the label drawn before it.
    #[must_use]
    pub const fn prompt(&self) -> Option<(&'static str, &LineInput)> {
        match self {
            Self::Command(input) => Some((":", input)),
            Self::Search(input) => Some(("/", input)),
            Self::FilenamePrompt(input) => Some(("New file: ", input)),
            Self::RenamePrompt { input, .. } => Some(("Rename to: ", input)),
            _ => None,
        }
    }

    /// Mutable access to the active prompt's text field.
    pub const fn prompt_input_mut(&mut self) -> Option<&mut LineInput> {
        match self {
            Self::Command(input)
            | Self::Search(input)
            | Self::FilenamePrompt(input)
            | Self::RenamePrompt { input, .. } => Some(input),
            _ => None,
        }
    }

    /// Key reminder shown on the status line.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::Normal => "i:insert ::command /:search ?:help",
            Self::Insert { menu: Some(_) } => "Up/Down:select Enter:accept Esc:close",
            Self::Insert { menu: None } => "Esc:normal Tab:complete",
            Self::Command(_) => "Enter:run Esc:cancel",
            Self::Search(_) => "Enter:search Esc:cancel",
            Self::FilenamePrompt(_) => "Enter:create Esc:cancel",
            Self::RenamePrompt { .. } => "Enter:rename Esc:cancel",
            Self::ConfirmPrompt(_) => "y:confirm n:cancel",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }

    #[inline]
    #[must_use]
    pub const fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// CursorShape
// ---------------------------------------------------------------------------

/// Cursor shape for terminal display. The front end maps this onto its
/// terminal library's cursor styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    SteadyBlock,
    SteadyBar,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
        assert!(Mode::default().is_normal());
    }

    #[test]
    fn display_names() {
        assert_eq!(Mode::Normal.to_string(), "NORMAL");
        assert_eq!(Mode::insert().to_string(), "INSERT");
        assert_eq!(Mode::Command(LineInput::new()).to_string(), "COMMAND");
        assert_eq!(
            Mode::ConfirmPrompt(PendingAction::DeleteFile("a".into())).to_string(),
            "CONFIRM"
        );
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(Mode::Normal.cursor_shape(), CursorShape::SteadyBlock);
        assert_eq!(Mode::insert().cursor_shape(), CursorShape::SteadyBar);
        assert_eq!(
            Mode::Search(LineInput::new()).cursor_shape(),
            CursorShape::SteadyBar
        );
    }

    #[test]
    fn prompts_expose_their_input() {
        let mut mode = Mode::RenamePrompt {
            from: "a.txt".into(),
            input: LineInput::with_text("a.txt"),
        };
        let (label, input) = mode.prompt().unwrap();
        assert_eq!(label, "Rename to: ");
        assert_eq!(input.input(), "a.txt");

        mode.prompt_input_mut().unwrap().insert_char('x');
        assert_eq!(mode.prompt().unwrap().1.input(), "a.txtx");
        assert!(Mode::Normal.prompt().is_none());
    }

    #[test]
    fn prompt_hints() {
        assert_eq!(
            Mode::FilenamePrompt(LineInput::new()).hint(),
            "Enter:create Esc:cancel"
        );
        assert_eq!(
            Mode::RenamePrompt {
                from: PathBuf::new(),
                input: LineInput::new()
            }
            .hint(),
            "Enter:rename Esc:cancel"
        );
    }

    #[test]
    fn pending_action_question() {
        let a = PendingAction::OverwriteFile("/tmp/x".into());
        assert_eq!(a.question(), "Overwrite /tmp/x? (y/n)");
        assert_eq!(a.path(), Path::new("/tmp/x"));
    }
}
