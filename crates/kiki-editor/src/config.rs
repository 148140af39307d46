//! The settings file: [`Options`] as JSON in the home directory.
//!
//! Missing file → defaults are written out. Malformed file → an error the
//! caller reports; it falls back to defaults and keeps going. Every
//! successful `:set` rewrites the file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::files;
use crate::options::Options;

/// File name under the home directory.
pub const FILE_NAME: &str = ".kiki_editor.json";

/// `~/.kiki_editor.json`, when a home directory exists.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(FILE_NAME))
}

/// Read options from `path`, creating the file with defaults if absent.
///
/// # Errors
///
/// [`Error::Config`] for malformed JSON, [`Error::Io`] when the file exists
/// but cannot be read. Failing to create a missing file is only logged.
pub fn load(path: &Path) -> Result<Options> {
    match fs::read(path) {
        Ok(bytes) => {
            let options = serde_json::from_slice(&bytes).map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), "config loaded");
            Ok(options)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let options = Options::default();
            if let Err(err) = save(path, &options) {
                warn!(%err, "could not write default config");
            }
            Ok(options)
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Write `options` to `path` (pretty JSON, atomically).
///
/// # Errors
///
/// [`Error::Io`] from the write.
pub fn save(path: &Path, options: &Options) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(options).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })?;
    json.push(b'\n');
    files::write_atomic(path, &json, false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        assert_eq!(load(&path).unwrap(), Options::default());
        assert!(path.is_file());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"tabSize\": 4"));
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let options = Options {
            tab_size: 2,
            word_wrap: true,
            ..Options::default()
        };
        save(&path, &options).unwrap();
        assert_eq!(load(&path).unwrap(), options);
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(Error::Config { .. })));
    }
}
