//! Manifest types for boostup.
//!
//! A manifest is a JSON array of version entries:
//!
//! ```json
//! [
//!   {
//!     "version": "1.74.0",
//!     "files": [
//!       {
//!         "filename": "boost-1.74.0-windows-2019.tar.gz",
//!         "platform": "windows",
//!         "platform_version": "2019",
//!         "download_url": "https://github.com/.../boost-1.74.0-windows-2019.tar.gz"
//!       }
//!     ]
//!   }
//! ]
//! ```
//!
//! Every tag on a file besides `filename` and `download_url` is optional.
//! Older entries omit `link` and `arch`, which means "static, x86".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::platform::os::Os;

/// The complete versions manifest, in publication order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
  pub entries: Vec<VersionEntry>,
}

impl Manifest {
  pub fn new(entries: Vec<VersionEntry>) -> Self {
    Self { entries }
  }

  /// Returns the first entry whose version equals `version` exactly.
  ///
  /// Versions are compared as plain strings; later duplicates are never
  /// inspected.
  pub fn find_version(&self, version: &str) -> Option<&VersionEntry> {
    self.entries.iter().find(|entry| entry.version == version)
  }
}

/// All files published for a single Boost version.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
  /// Version identifier, e.g. `1.74.0`. Entries without one never match.
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub files: Vec<ArtifactDescriptor>,
}

/// One downloadable archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
  pub filename: String,
  pub download_url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub platform: Option<Os>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub platform_version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub toolset: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub link: Option<Link>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub arch: Option<String>,
}

/// How the prebuilt libraries are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Link {
  #[serde(rename = "static")]
  Static,
  #[serde(rename = "shared")]
  Shared,
  /// Ships both variants and therefore satisfies any requested link type.
  #[serde(rename = "static+shared")]
  StaticShared,
  /// A tag this version of boostup does not know about.
  #[serde(other)]
  Other,
}

impl Link {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Static => "static",
      Self::Shared => "shared",
      Self::StaticShared => "static+shared",
      Self::Other => "other",
    }
  }
}

impl fmt::Display for Link {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Link {
  type Err = String;

  /// Parses a caller-supplied link type. `Other` is never produced.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "static" => Ok(Self::Static),
      "shared" => Ok(Self::Shared),
      "static+shared" => Ok(Self::StaticShared),
      other => Err(other.to_string()),
    }
  }
}
