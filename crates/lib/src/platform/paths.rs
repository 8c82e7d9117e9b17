use crate::consts::{APP_NAME, BOOST_DIR_NAME};
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the default install root.
///
/// Hosted Windows runners keep their large scratch disk on `D:`.
#[cfg(windows)]
pub fn default_install_dir() -> Option<PathBuf> {
  Some(PathBuf::from(r"D:\").join(BOOST_DIR_NAME))
}

/// Returns the default install root.
#[cfg(not(windows))]
pub fn default_install_dir() -> Option<PathBuf> {
  home_dir().map(|home| home.join(BOOST_DIR_NAME))
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> Option<PathBuf> {
  std::env::var_os("LOCALAPPDATA").map(|dir| PathBuf::from(dir).join(APP_NAME).join("Cache"))
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> Option<PathBuf> {
  let cache_home = std::env::var_os("XDG_CACHE_HOME")
    .filter(|dir| !dir.is_empty())
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|home| home.join(".cache")))?;
  Some(cache_home.join(APP_NAME))
}
