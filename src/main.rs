// SPDX-License-Identifier: MIT
//
// kiki: a small modal terminal text editor.
//
// This binary wires the editing engine to a real terminal:
//
//   kiki-editor → document, cursor, history, search, modes, commands
//   terminal    → crossterm session guard, event translation, main loop
//   render      → paints one frame from the editor's state
//
// Startup is: parse args → optional file logging → load settings → open
// the file → run until the editor says quit. Settings problems never stop
// the editor; they surface as a notice on the first frame.

mod render;
mod terminal;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use kiki_editor::Editor;
use kiki_editor::config;
use kiki_editor::options::Options;

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "kiki", version, about = "A small modal terminal text editor")]
struct Args {
    /// File to edit. Created on first save if it does not exist.
    path: Option<PathBuf>,

    /// Write a debug log to ~/.kiki-editor/debug.log.
    #[arg(long)]
    debug: bool,

    /// Settings file to use instead of ~/.kiki_editor.json.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Log to a file, never the terminal. The guard must outlive the editor
/// or buffered lines are lost.
fn init_logging() -> Result<Option<WorkerGuard>> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };
    let dir = home.join(".kiki-editor");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, "debug.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(installed.ok().map(|()| guard))
}

// ─── Settings ───────────────────────────────────────────────────────────────

/// Options plus where `:set` should persist them, and a notice if the file
/// was unusable.
fn load_settings(explicit: Option<PathBuf>) -> (Options, Option<PathBuf>, Option<String>) {
    let Some(path) = explicit.or_else(config::default_path) else {
        return (Options::default(), None, None);
    };
    match config::load(&path) {
        Ok(options) => (options, Some(path), None),
        Err(err) => {
            warn!(%err, "settings unusable, using defaults");
            (Options::default(), Some(path), Some(format!("Settings: {err}")))
        }
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = if args.debug { init_logging()? } else { None };
    info!(version = env!("CARGO_PKG_VERSION"), "kiki starting");

    let (options, config_path, settings_error) = load_settings(args.config);

    let editor = match &args.path {
        Some(path) => {
            Editor::open(path).with_context(|| format!("opening {}", path.display()))?
        }
        None => Editor::new(),
    };
    let mut editor = editor.with_options(options);
    if let Some(path) = config_path {
        editor = editor.with_config_path(path);
    }
    if let Some(text) = settings_error {
        editor.set_warning(text);
    }

    terminal::run(&mut editor).context("terminal session failed")?;
    info!("kiki exiting");
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- args ---

    #[test]
    fn parses_file_and_flags() {
        let args = Args::try_parse_from(["kiki", "notes.txt", "--debug", "--config", "/tmp/k.json"])
            .unwrap();
        assert_eq!(args.path, Some(PathBuf::from("notes.txt")));
        assert!(args.debug);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/k.json")));
    }

    #[test]
    fn no_arguments_is_fine() {
        let args = Args::try_parse_from(["kiki"]).unwrap();
        assert_eq!(args.path, None);
        assert!(!args.debug);
    }

    // -- settings ---

    #[test]
    fn malformed_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let (options, config_path, notice) = load_settings(Some(path.clone()));
        assert_eq!(options, Options::default());
        assert_eq!(config_path, Some(path));
        assert!(notice.unwrap().starts_with("Settings: "));
    }
}
