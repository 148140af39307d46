//! Error types.
//!
//! Two families, because they are handled differently:
//!
//! | Type             | Origin                          | Surfaced as            |
//! |------------------|---------------------------------|------------------------|
//! | [`Error`]        | filesystem, config file         | error notice, no state change |
//! | [`CommandError`] | bad user input on the `:` line  | error notice           |
//!
//! Neither ever terminates the editor.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Filesystem and configuration failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: file already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{}: not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("No file name (use :saveas <path>)")]
    NoFileName,

    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Attach a path to an `io::Error`.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Invalid input typed on the command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid line number: {0}")]
    InvalidLine(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unsaved changes! Use :q! to force quit")]
    UnsavedChanges,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = Error::io(
            "/tmp/x.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "/tmp/x.txt: denied");
    }

    #[test]
    fn command_error_messages() {
        assert_eq!(
            CommandError::UnknownCommand("frob".into()).to_string(),
            "Unknown command: frob"
        );
        assert_eq!(
            CommandError::Usage("line <number>").to_string(),
            "Usage: line <number>"
        );
        assert_eq!(
            CommandError::InvalidValue {
                name: "tabsize",
                value: "x".into()
            }
            .to_string(),
            "Invalid value for tabsize: x"
        );
    }
}
