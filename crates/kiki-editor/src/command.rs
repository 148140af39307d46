//! Command-line mode: the `:` prompt and its verbs.
//!
//! The prompt line is a [`LineInput`]: a string plus a char cursor. The same
//! type backs the search prompt and the filename/rename prompts. On Enter
//! the `:` text is parsed by [`Command::parse`] as `verb [args]`.
//!
//! # Supported commands
//!
//! | Command                | Action                                        |
//! |------------------------|-----------------------------------------------|
//! | `:w`                   | Save to the current path                      |
//! | `:saveas <path>`       | Save to `path` and adopt it                   |
//! | `:q` / `:q!`           | Quit (refused when modified) / force quit     |
//! | `:wq`                  | Save, then quit                               |
//! | `:line <n>`            | Jump to line `n` (1-based)                    |
//! | `:set [name [value]]`  | Show or change options                        |
//! | `:find <text>`         | Jump to the next occurrence of `text`         |
//! | `:replace <old> <new>` | Replace every occurrence, report the count    |
//! | `:wc`                  | Line, word, char counts                       |
//! | `:info`                | Name, lines, size, type                       |
//! | `:reload`              | Re-read the file, dropping edits              |
//! | `:help`                | Show the key reference                        |
//! | `:new`                 | Prompt for a file to create                   |
//! | `:rename`              | Prompt for a new name for the current file    |
//! | `:delete [path]`       | Delete a file after confirmation (`:rm` too)  |

use std::path::PathBuf;

use crate::error::CommandError;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write,
    SaveAs(PathBuf),
    Quit,
    ForceQuit,
    WriteQuit,
    /// 1-based line number, not yet range-checked.
    Line(usize),
    /// Raw arguments to `:set`, interpreted by
    /// [`Options::apply`](crate::options::Options::apply).
    Set(String),
    Find(String),
    Replace { old: String, new: String },
    WordCount,
    Info,
    Reload,
    Help,
    New,
    Rename,
    /// `None` means the current file.
    Delete(Option<PathBuf>),
    /// Blank input. Does nothing.
    Empty,
}

/// The result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Succeeded, with an optional notice.
    Ok(Option<String>),
    /// Failed; the message goes to the notice line as an error.
    Err(String),
    /// The editor should exit.
    Quit,
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        Self::Err(err.to_string())
    }
}

impl From<crate::error::Error> for CommandResult {
    fn from(err: crate::error::Error) -> Self {
        Self::Err(err.to_string())
    }
}

impl Command {
    /// Parse command-line text (without the leading `:`).
    ///
    /// # Errors
    ///
    /// [`CommandError::UnknownCommand`] for an unrecognized verb,
    /// [`CommandError::Usage`] when required arguments are missing, and
    /// [`CommandError::InvalidLine`] for a non-numeric or zero line.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let trimmed = input.trim();
        let (verb, arg) = trimmed
            .find(char::is_whitespace)
            .map_or((trimmed, ""), |pos| {
                (&trimmed[..pos], trimmed[pos..].trim_start())
            });

        let cmd = match verb {
            "" => Self::Empty,
            "w" | "write" => Self::Write,
            "saveas" => Self::SaveAs(PathBuf::from(required(arg, "saveas <filename>")?)),
            "q" | "quit" => Self::Quit,
            "q!" | "quit!" => Self::ForceQuit,
            "wq" | "x" => Self::WriteQuit,
            "line" => {
                let n = required(arg, "line <number>")?;
                match n.parse::<usize>() {
                    Ok(line) if line > 0 => Self::Line(line),
                    _ => return Err(CommandError::InvalidLine(n.to_string())),
                }
            }
            "set" => Self::Set(arg.to_string()),
            "find" => Self::Find(required(arg, "find <text>")?.to_string()),
            "replace" => {
                let usage = "replace <old> <new>";
                let (old, new) = arg
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage(usage))?;
                let new = new.trim_start();
                if new.is_empty() {
                    return Err(CommandError::Usage(usage));
                }
                Self::Replace {
                    old: old.to_string(),
                    new: new.to_string(),
                }
            }
            "wc" => Self::WordCount,
            "info" => Self::Info,
            "reload" => Self::Reload,
            "help" => Self::Help,
            "new" => Self::New,
            "rename" => Self::Rename,
            "delete" | "rm" => Self::Delete((!arg.is_empty()).then(|| PathBuf::from(arg))),
            _ => return Err(CommandError::UnknownCommand(trimmed.to_string())),
        };
        Ok(cmd)
    }
}

fn required<'a>(arg: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(arg)
    }
}

// ---------------------------------------------------------------------------
// LineInput
// ---------------------------------------------------------------------------

/// A one-line text field with a cursor, used by every prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    input: String,
    /// Char offset into `input`.
    cursor: usize,
}

impl LineInput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    /// Prefilled, cursor at the end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            input: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Returns `false` when there was nothing before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Take the text, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        crate::document::byte_index(&self.input, char_idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
