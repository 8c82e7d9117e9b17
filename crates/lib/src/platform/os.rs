use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating systems as named in the versions manifest.
///
/// Manifests only know `windows`, `macos` and `linux`. Any other value found
/// in a manifest deserializes to [`Os::Other`], which never matches a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  #[serde(rename = "macos")]
  MacOs,
  Windows,
  #[serde(other)]
  Other,
}

impl Os {
  /// Detect the current operating system and translate it to manifest vocabulary.
  ///
  /// Apple hosts map to `macos`, Windows hosts to `windows`. Every other host
  /// is treated as `linux`.
  pub fn current() -> Self {
    Self::from_host_id(std::env::consts::OS)
  }

  /// Translate a runtime OS identifier (`std::env::consts::OS` style, or the
  /// `darwin`/`win32` spellings) to the manifest vocabulary.
  pub fn from_host_id(id: &str) -> Self {
    match id {
      "macos" | "darwin" => Self::MacOs,
      "windows" | "win32" => Self::Windows,
      _ => Self::Linux,
    }
  }

  /// Returns the manifest identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "macos",
      Self::Windows => "windows",
      Self::Other => "other",
    }
  }

  pub fn is_windows(&self) -> bool {
    matches!(self, Self::Windows)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
