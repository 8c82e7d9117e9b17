//! Install-directory cache.
//!
//! A successful install is saved under a key derived from the selection, and a
//! later run with the same key restores the directory instead of resolving
//! and downloading again.
//!
//! # Layout
//!
//! ```text
//! <cache_dir>/
//! └── boost-v1.74.0-windows-unknown-2019--unknown@default/
//!     ├── entry.json   # CacheEntry: outputs of the saved run
//!     └── root/        # snapshot of the install directory
//! ```
//!
//! Legacy and default installs of the same selection lay out the tree
//! differently, so each mode gets its own entry.
//!
//! Cache failures are never fatal; the orchestrator downgrades them to
//! warnings.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{InstallOptions, Mode};
use crate::consts::CACHE_KEY_PREFIX;
use crate::util::fs::{CopyError, copy_dir};

const ENTRY_FILENAME: &str = "entry.json";
const SNAPSHOT_DIRNAME: &str = "root";
const ENTRY_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while restoring or saving a cache entry.
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache I/O error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Copy(#[from] CopyError),

  #[error("corrupt cache entry at {path}: {message}")]
  Corrupt { path: PathBuf, message: String },

  #[error("cache task failed: {0}")]
  Task(String),
}

/// Identifies one cached install.
///
/// `boost-v<version>-<platform>-<arch|unknown>-<platform_version>-<toolset>-<link|unknown>`,
/// with an unset platform version or toolset rendered as an empty segment.
///
/// The mode is not part of the key string but does separate stored entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
  key: String,
  mode: Mode,
}

impl CacheKey {
  pub fn from_options(options: &InstallOptions) -> Self {
    let version = format!("v{}", options.version);
    let key = [
      CACHE_KEY_PREFIX,
      &version,
      options.platform.as_str(),
      options.arch.map_or("unknown", |a| a.as_str()),
      options.platform_version.as_deref().unwrap_or(""),
      options.toolset.as_deref().unwrap_or(""),
      options.link.map_or("unknown", |l| l.as_str()),
    ]
    .join("-");

    debug!(key = %key, mode = %options.mode, "using cache key");
    Self {
      key,
      mode: options.mode,
    }
  }

  pub fn as_str(&self) -> &str {
    &self.key
  }

  /// Mode the entry was (or will be) installed in.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// The key and mode as a single safe path component.
  fn dir_name(&self) -> String {
    format!("{}@{}", self.key, self.mode)
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '@') {
          c
        } else {
          '_'
        }
      })
      .collect()
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.key)
  }
}

/// Outputs recorded with a cache entry, relative to the install root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedOutputs {
  /// Directory under the install root that `BOOST_ROOT` points at.
  pub subdir: String,
  /// Value emitted as `BOOST_VER`.
  pub version: String,
  /// Mode the tree was installed in.
  pub mode: Mode,
}

/// Saves and restores install directories.
#[async_trait]
pub trait CacheStore: Send + Sync {
  /// Restore the entry for `key` into `root_dir`. `Ok(None)` is a miss.
  async fn restore(&self, key: &CacheKey, root_dir: &Path) -> Result<Option<CachedOutputs>, CacheError>;

  /// Save `root_dir` under `key`, replacing any previous entry.
  async fn save(&self, key: &CacheKey, root_dir: &Path, outputs: &CachedOutputs) -> Result<(), CacheError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
  format: u32,
  key: String,
  outputs: CachedOutputs,
  saved_at_unix: u64,
}

/// Directory-backed [`CacheStore`].
#[derive(Debug, Clone)]
pub struct DirCache {
  root: PathBuf,
}

impl DirCache {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Directory holding the entry for `key`.
  pub fn entry_dir(&self, key: &CacheKey) -> PathBuf {
    self.root.join(key.dir_name())
  }

  fn restore_blocking(entry_dir: &Path, key: &CacheKey, root_dir: &Path) -> Result<Option<CachedOutputs>, CacheError> {
    let entry_path = entry_dir.join(ENTRY_FILENAME);
    let contents = match std::fs::read_to_string(&entry_path) {
      Ok(contents) => contents,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(CacheError::Io {
          path: entry_path,
          source: e,
        });
      }
    };

    let entry: CacheEntry = serde_json::from_str(&contents).map_err(|e| CacheError::Corrupt {
      path: entry_path.clone(),
      message: e.to_string(),
    })?;

    if entry.format != ENTRY_FORMAT_VERSION || entry.key != key.as_str() || entry.outputs.mode != key.mode() {
      return Err(CacheError::Corrupt {
        path: entry_path,
        message: format!("entry is for '{}' (format {})", entry.key, entry.format),
      });
    }

    copy_dir(&entry_dir.join(SNAPSHOT_DIRNAME), root_dir)?;
    Ok(Some(entry.outputs))
  }

  fn save_blocking(
    cache_root: &Path,
    entry_dir: &Path,
    key: &CacheKey,
    root_dir: &Path,
    outputs: &CachedOutputs,
  ) -> Result<(), CacheError> {
    let io_err = |path: &Path, source: std::io::Error| CacheError::Io {
      path: path.to_path_buf(),
      source,
    };

    std::fs::create_dir_all(cache_root).map_err(|e| io_err(cache_root, e))?;

    // Stage next to the final location so the rename below stays on one filesystem
    let staging = tempfile::Builder::new()
      .prefix(".staging-")
      .tempdir_in(cache_root)
      .map_err(|e| io_err(cache_root, e))?;

    copy_dir(root_dir, &staging.path().join(SNAPSHOT_DIRNAME))?;

    let entry = CacheEntry {
      format: ENTRY_FORMAT_VERSION,
      key: key.as_str().to_string(),
      outputs: outputs.clone(),
      saved_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
    };
    let json = serde_json::to_string_pretty(&entry).map_err(|e| CacheError::Corrupt {
      path: entry_dir.to_path_buf(),
      message: e.to_string(),
    })?;
    let entry_path = staging.path().join(ENTRY_FILENAME);
    std::fs::write(&entry_path, json).map_err(|e| io_err(&entry_path, e))?;

    if entry_dir.exists() {
      std::fs::remove_dir_all(entry_dir).map_err(|e| io_err(entry_dir, e))?;
    }
    std::fs::rename(staging.path(), entry_dir).map_err(|e| io_err(entry_dir, e))?;

    debug!(key = %key, path = %entry_dir.display(), "saved cache entry");
    Ok(())
  }
}

#[async_trait]
impl CacheStore for DirCache {
  async fn restore(&self, key: &CacheKey, root_dir: &Path) -> Result<Option<CachedOutputs>, CacheError> {
    let entry_dir = self.entry_dir(key);
    let key = key.clone();
    let root_dir = root_dir.to_path_buf();

    tokio::task::spawn_blocking(move || Self::restore_blocking(&entry_dir, &key, &root_dir))
      .await
      .map_err(|e| CacheError::Task(e.to_string()))?
  }

  async fn save(&self, key: &CacheKey, root_dir: &Path, outputs: &CachedOutputs) -> Result<(), CacheError> {
    let cache_root = self.root.clone();
    let entry_dir = self.entry_dir(key);
    let key = key.clone();
    let root_dir = root_dir.to_path_buf();
    let outputs = outputs.clone();

    tokio::task::spawn_blocking(move || Self::save_blocking(&cache_root, &entry_dir, &key, &root_dir, &outputs))
      .await
      .map_err(|e| CacheError::Task(e.to_string()))?
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Inputs;
  use crate::manifest::Link;
  use crate::platform::arch::Arch;
  use crate::platform::os::Os;
  use tempfile::TempDir;

  fn options(version: &str) -> InstallOptions {
    let mut options = InstallOptions::from_inputs(Inputs {
      boost_version: Some(version.to_string()),
      install_dir: Some("/tmp/boost".to_string()),
      cache_dir: Some("/tmp/cache".to_string()),
      ..Default::default()
    })
    .unwrap();
    options.platform = Os::Windows;
    options
  }

  fn outputs() -> CachedOutputs {
    CachedOutputs {
      subdir: "boost".to_string(),
      version: "boost-1.74.0-windows-2019".to_string(),
      mode: Mode::Default,
    }
  }

  #[test]
  fn key_with_nothing_selected() {
    let key = CacheKey::from_options(&options("1.74.0"));
    assert_eq!(key.as_str(), "boost-v1.74.0-windows-unknown---unknown");
  }

  #[test]
  fn key_with_full_selection() {
    let mut options = options("1.74.0");
    options.platform_version = Some("2019".to_string());
    options.toolset = Some("mingw".to_string());
    options.link = Some(Link::StaticShared);
    options.arch = Some(Arch::X86);

    let key = CacheKey::from_options(&options);
    assert_eq!(key.as_str(), "boost-v1.74.0-windows-x86-2019-mingw-static+shared");
  }

  #[test]
  fn dir_name_replaces_unsafe_characters() {
    let mut options = options("1.74.0");
    options.platform_version = Some("ubuntu/20.04".to_string());
    let key = CacheKey::from_options(&options);
    assert!(!key.dir_name().contains('/'));
  }

  #[tokio::test]
  async fn miss_when_nothing_saved() {
    let cache_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let cache = DirCache::new(cache_dir.path());

    let key = CacheKey::from_options(&options("1.74.0"));
    assert_eq!(cache.restore(&key, root.path()).await.unwrap(), None);
  }

  #[tokio::test]
  async fn save_then_restore_round_trip() {
    let cache_dir = TempDir::new().unwrap();
    let cache = DirCache::new(cache_dir.path());
    let key = CacheKey::from_options(&options("1.74.0"));

    let original = TempDir::new().unwrap();
    std::fs::create_dir_all(original.path().join("boost/include")).unwrap();
    std::fs::write(original.path().join("boost/include/version.hpp"), b"107400").unwrap();
    cache.save(&key, original.path(), &outputs()).await.unwrap();

    let fresh = TempDir::new().unwrap();
    let restored_root = fresh.path().join("nested").join("boost-root");
    let restored = cache.restore(&key, &restored_root).await.unwrap();

    assert_eq!(restored, Some(outputs()));
    assert_eq!(
      std::fs::read(restored_root.join("boost/include/version.hpp")).unwrap(),
      b"107400"
    );
  }

  #[tokio::test]
  async fn modes_are_stored_separately() {
    let cache_dir = TempDir::new().unwrap();
    let cache = DirCache::new(cache_dir.path());

    let mut legacy = options("1.74.0");
    legacy.mode = Mode::Legacy;
    let legacy_key = CacheKey::from_options(&legacy);
    let default_key = CacheKey::from_options(&options("1.74.0"));
    assert_eq!(legacy_key.as_str(), default_key.as_str());
    assert_ne!(cache.entry_dir(&legacy_key), cache.entry_dir(&default_key));

    let original = TempDir::new().unwrap();
    std::fs::create_dir(original.path().join("boost-1.74.0-windows-2019")).unwrap();
    let record = CachedOutputs {
      subdir: "boost-1.74.0-windows-2019".to_string(),
      version: "boost-1.74.0-windows-2019".to_string(),
      mode: Mode::Legacy,
    };
    cache.save(&legacy_key, original.path(), &record).await.unwrap();

    let root = TempDir::new().unwrap();
    assert_eq!(cache.restore(&default_key, root.path()).await.unwrap(), None);
    assert!(!root.path().join("boost-1.74.0-windows-2019").exists());
    assert_eq!(cache.restore(&legacy_key, root.path()).await.unwrap(), Some(record));
  }

  #[tokio::test]
  async fn save_replaces_previous_entry() {
    let cache_dir = TempDir::new().unwrap();
    let cache = DirCache::new(cache_dir.path());
    let key = CacheKey::from_options(&options("1.74.0"));

    let first = TempDir::new().unwrap();
    std::fs::write(first.path().join("stale.txt"), b"old").unwrap();
    cache.save(&key, first.path(), &outputs()).await.unwrap();

    let second = TempDir::new().unwrap();
    std::fs::write(second.path().join("fresh.txt"), b"new").unwrap();
    cache.save(&key, second.path(), &outputs()).await.unwrap();

    let snapshot = cache.entry_dir(&key).join(SNAPSHOT_DIRNAME);
    assert!(snapshot.join("fresh.txt").exists());
    assert!(!snapshot.join("stale.txt").exists());
  }

  #[tokio::test]
  async fn corrupt_entry_is_an_error() {
    let cache_dir = TempDir::new().unwrap();
    let cache = DirCache::new(cache_dir.path());
    let key = CacheKey::from_options(&options("1.74.0"));

    let entry_dir = cache.entry_dir(&key);
    std::fs::create_dir_all(&entry_dir).unwrap();
    std::fs::write(entry_dir.join(ENTRY_FILENAME), b"{").unwrap();

    let root = TempDir::new().unwrap();
    let err = cache.restore(&key, root.path()).await.unwrap_err();
    assert!(matches!(err, CacheError::Corrupt { .. }));
  }
}
