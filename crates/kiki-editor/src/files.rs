//! Filesystem operations behind `:w`, `new`, `rename` and `delete`.
//!
//! Saving never writes the target in place: content goes to a temporary
//! sibling created by [`tempfile::NamedTempFile::new_in`], which is then
//! renamed over the target. A failure at any step drops the temporary and
//! leaves the target exactly as it was.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// The backup name for `path`: the full file name with `.bak` appended.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Directory a temporary sibling of `path` should live in.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Replace the contents of `path` with `bytes` atomically.
///
/// With `backup`, an existing target is first copied to
/// [`backup_path`]. Permissions of an existing target carry over.
///
/// # Errors
///
/// [`Error::Io`] from any step. The target is untouched on error (a backup
/// copy may already exist).
pub fn write_atomic(path: &Path, bytes: &[u8], backup: bool) -> Result<()> {
    let existing = fs::metadata(path).ok();

    if backup && existing.as_ref().is_some_and(fs::Metadata::is_file) {
        let bak = backup_path(path);
        fs::copy(path, &bak).map_err(|e| Error::io(&bak, e))?;
        debug!(backup = %bak.display(), "backup written");
    }

    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io(tmp.path(), e))?;

    if let Some(meta) = &existing {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| Error::io(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| {
        warn!(path = %path.display(), error = %e.error, "rename over target failed");
        Error::io(path, e.error)
    })?;
    Ok(())
}

/// Create an empty file at `path`.
///
/// # Errors
///
/// [`Error::AlreadyExists`] if something is already there, [`Error::Io`]
/// otherwise.
pub fn create_new(path: &Path) -> Result<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(Error::AlreadyExists(path.to_path_buf()))
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Rename `from` to `to`, refusing to clobber an existing `to`.
///
/// # Errors
///
/// [`Error::AlreadyExists`] or [`Error::Io`].
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        return Err(Error::AlreadyExists(to.to_path_buf()));
    }
    fs::rename(from, to).map_err(|e| Error::io(from, e))
}

/// Remove a regular file.
///
/// # Errors
///
/// [`Error::NotAFile`] for directories and other non-files, [`Error::Io`]
/// otherwise.
pub fn delete(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if !meta.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/a/notes.txt")),
            PathBuf::from("/a/notes.txt.bak")
        );
    }

    #[test]
    fn parent_of_bare_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("x.txt")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/a/x.txt")), Path::new("/a"));
    }

    // -- write_atomic -------------------------------------------------------

    #[test]
    fn writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        write_atomic(&path, b"hello\n", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn replaces_existing_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        fs::write(&path, "old\n").unwrap();
        write_atomic(&path, b"new\n", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn backup_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        fs::write(&path, "v1\n").unwrap();
        write_atomic(&path, b"v2\n", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2\n");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "v1\n");
    }

    #[test]
    fn no_backup_for_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        write_atomic(&path, b"x", true).unwrap();
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("f.txt");
        assert!(matches!(
            write_atomic(&path, b"x", false),
            Err(Error::Io { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn failed_rename_leaves_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sub");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "k").unwrap();

        assert!(write_atomic(&target, b"x", false).is_err());
        assert!(target.is_dir());
        assert_eq!(fs::read_to_string(target.join("keep")).unwrap(), "k");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    // -- create / rename / delete -------------------------------------------

    #[test]
    fn create_new_refuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a");
        create_new(&path).unwrap();
        assert!(path.is_file());
        assert!(matches!(create_new(&path), Err(Error::AlreadyExists(_))));
    }

    #[test]
    fn rename_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a");
        let to = dir.path().join("b");
        fs::write(&from, "x").unwrap();
        rename(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "x");
    }

    #[test]
    fn rename_refuses_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a");
        let to = dir.path().join("b");
        fs::write(&from, "1").unwrap();
        fs::write(&to, "2").unwrap();
        assert!(matches!(rename(&from, &to), Err(Error::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&to).unwrap(), "2");
    }

    #[test]
    fn delete_only_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a");
        fs::write(&file, "x").unwrap();
        delete(&file).unwrap();
        assert!(!file.exists());
        assert!(matches!(delete(dir.path()), Err(Error::NotAFile(_))));
        assert!(matches!(delete(&file), Err(Error::Io { .. })));
    }
}
