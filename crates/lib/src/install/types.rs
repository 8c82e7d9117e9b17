//! Types for the install pipeline.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheStore;
use crate::extract::{ExtractError, Extractor};
use crate::fetch::{Downloader, FetchError, ManifestSource};
use crate::resolve::{ResolutionNotice, ResolveError, ResolvedArtifact};

/// Errors that abort an install.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Extract(#[from] ExtractError),

  #[error("failed to {action} {path}: {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// The two values a run emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOutputs {
  /// `BOOST_ROOT`: the directory containing the extracted headers and libraries.
  pub root: PathBuf,
  /// `BOOST_VER`: the archive base name, e.g. `boost-1.74.0-windows-2019`.
  pub version: String,
}

impl InstallOutputs {
  pub const ROOT_NAME: &'static str = "BOOST_ROOT";
  pub const VERSION_NAME: &'static str = "BOOST_VER";

  /// Output `(name, value)` pairs in emission order.
  pub fn pairs(&self) -> [(&'static str, String); 2] {
    [
      (Self::ROOT_NAME, self.root.display().to_string()),
      (Self::VERSION_NAME, self.version.clone()),
    ]
  }
}

/// Where the installed tree came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum InstallSource {
  Cache,
  Download {
    artifact: ResolvedArtifact,
    bytes: u64,
  },
}

/// Result of a completed install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
  pub outputs: InstallOutputs,
  pub source: InstallSource,
  /// Advisory notices from resolution; empty on a cache hit.
  #[serde(skip)]
  pub notices: Vec<ResolutionNotice>,
}

impl InstallResult {
  pub fn cache_hit(&self) -> bool {
    matches!(self.source, InstallSource::Cache)
  }
}

/// The I/O collaborators an install drives.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
  pub manifests: &'a dyn ManifestSource,
  pub downloader: &'a dyn Downloader,
  pub extractor: &'a dyn Extractor,
  /// `None` disables the cache probe and save.
  pub cache: Option<&'a dyn CacheStore>,
}
