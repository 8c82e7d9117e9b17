//! Artifact resolution against a versions manifest.
//!
//! Given a [`Manifest`] and the caller's [`SelectionCriteria`], pick exactly one
//! archive to download or fail with a [`ResolveError`] naming the version.
//!
//! # Algorithm
//!
//! Only the first entry whose version equals the request is scanned. Each of
//! its files goes through the filters in [`rules`], in order: platform, toolset
//! (including the implicit-default exclusion), platform version, link, arch.
//! Every file that survives replaces the running best match, so the **last**
//! survivor wins. Manifests rely on this: newer, more specific files are
//! appended after older untagged ones instead of replacing them.

pub mod rules;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::manifest::{ArtifactDescriptor, Link, Manifest};
use crate::platform::arch::Arch;
use crate::platform::os::Os;

/// Errors produced by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// No manifest entry carries the requested version.
  #[error("could not find boost version {0}")]
  VersionNotFound(String),

  /// The version exists but none of its files fits the selection.
  #[error("could not find boost version {0} matching the requested platform, toolset, link and arch")]
  NoMatchingArtifact(String),
}

/// What the caller asked for.
///
/// Empty strings never reach this type; [`crate::config`] turns them into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
  pub version: String,
  pub toolset: Option<String>,
  pub platform_version: Option<String>,
  pub link: Option<Link>,
  pub arch: Option<Arch>,
  /// Host platform in manifest vocabulary.
  pub platform: Os,
}

impl SelectionCriteria {
  /// Criteria for `version` on the current host with nothing else specified.
  pub fn new(version: impl Into<String>) -> Self {
    Self {
      version: version.into(),
      toolset: None,
      platform_version: None,
      link: None,
      arch: None,
      platform: Os::current(),
    }
  }

  pub fn with_toolset(mut self, toolset: impl Into<String>) -> Self {
    self.toolset = Some(toolset.into());
    self
  }

  pub fn with_platform_version(mut self, platform_version: impl Into<String>) -> Self {
    self.platform_version = Some(platform_version.into());
    self
  }

  pub fn with_link(mut self, link: Link) -> Self {
    self.link = Some(link);
    self
  }

  pub fn with_arch(mut self, arch: Arch) -> Self {
    self.arch = Some(arch);
    self
  }

  pub fn with_platform(mut self, platform: Os) -> Self {
    self.platform = platform;
    self
  }
}

/// The archive chosen for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
  pub download_url: String,
  pub filename: String,
}

impl From<&ArtifactDescriptor> for ResolvedArtifact {
  fn from(file: &ArtifactDescriptor) -> Self {
    Self {
      download_url: file.download_url.clone(),
      filename: file.filename.clone(),
    }
  }
}

/// A request parameter that had no effect on the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionNotice {
  /// A link type was requested but the chosen file carries no link tag.
  LinkNotTagged(Link),
  /// An arch was requested but the chosen file carries no arch tag.
  ArchNotTagged(Arch),
}

impl fmt::Display for ResolutionNotice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::LinkNotTagged(link) => write!(
        f,
        "link '{}' was requested but the selected archive has no link tag; the option had no effect",
        link
      ),
      Self::ArchNotTagged(arch) => write!(
        f,
        "arch '{}' was requested but the selected archive has no arch tag; the option had no effect",
        arch
      ),
    }
  }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  pub artifact: ResolvedArtifact,
  pub notices: Vec<ResolutionNotice>,
}

/// Pick the archive matching `criteria` from `manifest`.
///
/// Pure apart from logging: the same inputs always produce the same result.
pub fn resolve(manifest: &Manifest, criteria: &SelectionCriteria) -> Result<Resolution, ResolveError> {
  let entry = manifest
    .find_version(&criteria.version)
    .ok_or_else(|| ResolveError::VersionNotFound(criteria.version.clone()))?;

  debug!(version = %entry.version, files = entry.files.len(), "scanning version entry");

  let best = entry
    .files
    .iter()
    .fold(None, |best: Option<&ArtifactDescriptor>, file| {
      if accepts(file, criteria, best.is_some()) {
        debug!(filename = %file.filename, "file is the new best match");
        Some(file)
      } else {
        best
      }
    })
    .ok_or_else(|| ResolveError::NoMatchingArtifact(criteria.version.clone()))?;

  let notices = notices_for(best, criteria);
  for notice in &notices {
    info!("{}", notice);
  }

  info!(filename = %best.filename, "resolved boost archive");
  Ok(Resolution {
    artifact: ResolvedArtifact::from(best),
    notices,
  })
}

/// Run one file through every filter.
///
/// `have_candidate` reports whether an earlier file already survived; the
/// implicit-default exclusion depends on it.
fn accepts(file: &ArtifactDescriptor, criteria: &SelectionCriteria, have_candidate: bool) -> bool {
  let requested_toolset = criteria.toolset.as_deref();
  let declared_toolset = file.toolset.as_deref();

  if !rules::platform_matches(file.platform, criteria.platform) {
    debug!(filename = %file.filename, platform = ?file.platform, "file does not match param 'platform'");
    return false;
  }

  if !rules::toolset_matches(requested_toolset, declared_toolset) {
    debug!(filename = %file.filename, toolset = ?file.toolset, "file does not match param 'toolset'");
    return false;
  }

  if rules::implicit_default_excluded(requested_toolset, declared_toolset, have_candidate) {
    debug!(filename = %file.filename, "skipping implicit-default-excluded toolset, a better match exists");
    return false;
  }

  if !rules::platform_version_matches(criteria.platform_version.as_deref(), file.platform_version.as_deref()) {
    debug!(
      filename = %file.filename,
      platform_version = ?file.platform_version,
      "file does not match param 'platform_version'"
    );
    return false;
  }

  if !rules::link_matches(criteria.link, file.link) {
    debug!(filename = %file.filename, link = ?file.link, "file does not match param 'link'");
    return false;
  }

  if !rules::arch_matches(criteria.arch, file.arch.as_deref()) {
    debug!(filename = %file.filename, arch = ?file.arch, "file does not match param 'arch'");
    return false;
  }

  true
}

fn notices_for(file: &ArtifactDescriptor, criteria: &SelectionCriteria) -> Vec<ResolutionNotice> {
  let mut notices = Vec::new();
  if let (Some(link), None) = (criteria.link, file.link) {
    notices.push(ResolutionNotice::LinkNotTagged(link));
  }
  if let (Some(arch), None) = (criteria.arch, &file.arch) {
    notices.push(ResolutionNotice::ArchNotTagged(arch));
  }
  notices
}
