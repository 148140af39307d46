//! # kiki-editor: editing engine for kiki
//!
//! Everything the editor does short of talking to a terminal:
//!
//! - **[`document`]**: line buffer with file metadata, load and atomic save
//! - **[`cursor`]** / **[`viewport`]**: clamped cursor and scroll offsets
//! - **[`history`]**: bounded undo/redo of region snapshots
//! - **[`search`]**: find-all, wrapping navigation, replace-all
//! - **[`mode`]**: the modal states and their scratch buffers
//! - **[`command`]**: `:` command parsing and the prompt text field
//! - **[`editor`]**: the state machine that ties it all together
//!
//! Supporting modules: [`options`] and [`config`] for settings,
//! [`completion`] for Insert-mode word completion, [`input`] for
//! backend-neutral events, [`files`] for filesystem operations, and
//! [`error`].

pub mod command;
pub mod completion;
pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod files;
pub mod history;
pub mod input;
pub mod mode;
pub mod options;
pub mod position;
pub mod search;
pub mod viewport;

pub use editor::Editor;
pub use error::{CommandError, Error, Result};
