//! Editor options and the `:set` command.
//!
//! # Supported syntax
//!
//! | Syntax                      | Effect                          |
//! |-----------------------------|---------------------------------|
//! | `:set`                      | Show all options                |
//! | `:set tabsize N`            | Indent width, 1 to 16           |
//! | `:set number` / `nonumber`  | Show / hide line numbers        |
//! | `:set syntax on\|off`       | Highlighting flag               |
//! | `:set wrap`                 | Toggle word wrap                |
//! | `:set autoindent on\|off`   | Carry indentation on Enter      |
//! | `:set autocomplete on\|off` | Tab opens the completion menu   |
//! | `:set backup on\|off`       | Keep `<file>.bak` on save       |
//!
//! The same struct is what the config file stores (camelCase JSON keys).

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Largest accepted `tabsize`.
pub const MAX_TAB_SIZE: usize = 16;

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    pub tab_size: usize,
    pub show_line_numbers: bool,
    pub syntax_highlight: bool,
    pub word_wrap: bool,
    pub auto_indent: bool,
    pub auto_complete: bool,
    #[serde(rename = "backupFiles")]
    pub backup: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_size: 4,
            show_line_numbers: true,
            syntax_highlight: true,
            word_wrap: false,
            auto_indent: true,
            auto_complete: true,
            backup: false,
        }
    }
}

impl Options {
    /// Apply `:set` arguments. Returns the confirmation notice.
    ///
    /// # Errors
    ///
    /// [`CommandError::UnknownSetting`] for an unknown name,
    /// [`CommandError::Usage`] for a missing value and
    /// [`CommandError::InvalidValue`] for a bad one. Nothing changes on
    /// error.
    pub fn apply(&mut self, args: &str) -> Result<String, CommandError> {
        let mut parts = args.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(self.summary());
        };
        let value = parts.next();

        let msg = match name {
            "tabsize" => {
                let raw = value.ok_or(CommandError::Usage("set tabsize <number>"))?;
                match raw.parse::<usize>() {
                    Ok(n) if (1..=MAX_TAB_SIZE).contains(&n) => {
                        self.tab_size = n;
                        format!("Tab size set to {n}")
                    }
                    _ => {
                        return Err(CommandError::InvalidValue {
                            name: "tabsize",
                            value: raw.to_string(),
                        });
                    }
                }
            }
            "number" => {
                self.show_line_numbers = true;
                "Line numbers enabled".to_string()
            }
            "nonumber" => {
                self.show_line_numbers = false;
                "Line numbers disabled".to_string()
            }
            "wrap" => {
                self.word_wrap = !self.word_wrap;
                format!("Word wrap {}", enabled(self.word_wrap))
            }
            "syntax" => {
                self.syntax_highlight = on_off(value, "set syntax on|off")?;
                format!("Syntax highlighting {}", enabled(self.syntax_highlight))
            }
            "autoindent" => {
                self.auto_indent = on_off(value, "set autoindent on|off")?;
                format!("Auto-indent {}", enabled(self.auto_indent))
            }
            "autocomplete" => {
                self.auto_complete = on_off(value, "set autocomplete on|off")?;
                format!("Auto-complete {}", enabled(self.auto_complete))
            }
            "backup" => {
                self.backup = on_off(value, "set backup on|off")?;
                format!("Backups {}", enabled(self.backup))
            }
            _ => return Err(CommandError::UnknownSetting(name.to_string())),
        };
        Ok(msg)
    }

    /// One-line listing for bare `:set`.
    #[must_use]
    pub fn summary(&self) -> String {
        [
            format!("tabsize={}", self.tab_size),
            format_bool("number", self.show_line_numbers),
            format_bool("syntax", self.syntax_highlight),
            format_bool("wrap", self.word_wrap),
            format_bool("autoindent", self.auto_indent),
            format_bool("autocomplete", self.auto_complete),
            format_bool("backup", self.backup),
        ]
        .join(" ")
    }
}

fn on_off(value: Option<&str>, usage: &'static str) -> Result<bool, CommandError> {
    match value {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err(CommandError::Usage(usage)),
    }
}

const fn enabled(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
