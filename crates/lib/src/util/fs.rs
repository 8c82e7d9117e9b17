//! Filesystem helpers shared by the orchestrator and the cache.
//!
//! - `ensure_dir()`: idempotent directory creation
//! - `delete_files()`: idempotent cleanup of downloaded archives
//! - `copy_dir()`: recursive copy preserving symlinks

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Errors raised by [`copy_dir`].
#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to walk {path}: {message}")]
  WalkDir { path: String, message: String },

  #[error("failed to copy {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: io::Error,
  },
}

/// Create `dir` and any missing parents. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
  if dir.is_dir() {
    info!("{} already exists, doing nothing", dir.display());
    return Ok(());
  }

  info!("{} does not exist, creating it", dir.display());
  fs::create_dir_all(dir)
}

/// Delete every path in `files` that exists.
///
/// Missing files are skipped. Returns the paths that were actually removed.
pub fn delete_files(files: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
  info!("attempting to delete {} file(s)...", files.len());

  let mut deleted = Vec::new();
  for file in files {
    match fs::remove_file(file) {
      Ok(()) => {
        debug!("{} exists, deleted it", file.display());
        deleted.push(file.clone());
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!("{} does not exist", file.display());
      }
      Err(e) => return Err(e),
    }
  }
  Ok(deleted)
}

/// Recursively copy the contents of `src` into `dst`.
///
/// `dst` is created if needed and existing files are overwritten. Symlinks are
/// recreated as symlinks on Unix and copied as their targets elsewhere.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), CopyError> {
  let io_err = |path: &Path, source: io::Error| CopyError::Io {
    path: path.display().to_string(),
    source,
  };

  fs::create_dir_all(dst).map_err(|e| io_err(dst, e))?;

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|e| CopyError::WalkDir {
      path: src.display().to_string(),
      message: e.to_string(),
    })?;
    let entry_path = entry.path();

    let rel_path = entry_path.strip_prefix(src).unwrap_or(entry_path);
    if rel_path.as_os_str().is_empty() {
      continue;
    }
    let target = dst.join(rel_path);

    let file_type = entry.file_type();
    if file_type.is_dir() {
      fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
    } else if file_type.is_symlink() {
      copy_symlink(entry_path, &target).map_err(|e| io_err(entry_path, e))?;
    } else if file_type.is_file() {
      fs::copy(entry_path, &target).map_err(|e| io_err(entry_path, e))?;
    }
  }

  Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
  let points_to = fs::read_link(link)?;
  if target.symlink_metadata().is_ok() {
    fs::remove_file(target)?;
  }
  std::os::unix::fs::symlink(points_to, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
  fs::copy(link, target).map(|_| ())
}
