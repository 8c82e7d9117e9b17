//! Filter rules applied to every file of the matching version entry.
//!
//! Each rule is a pure predicate over what the caller requested and what the
//! manifest declares. Both sides are optional, so every rule spells out all
//! four presence combinations.

use crate::manifest::Link;
use crate::platform::arch::{Arch, IMPLICIT_ARCH};
use crate::platform::os::Os;

/// Toolset that is never picked implicitly once any other candidate exists.
///
/// This is the implicit-default exclusion: with no toolset requested, a
/// `mingw` file loses to any candidate already recorded, but still wins when
/// it is the only file that survives.
pub const IMPLICIT_DEFAULT_EXCLUDED_TOOLSET: &str = "mingw";

/// The platform tag is mandatory; untagged files never match.
pub fn platform_matches(declared: Option<Os>, current: Os) -> bool {
  match declared {
    Some(os) => os == current,
    None => false,
  }
}

/// Exact match when a toolset is requested; anything goes otherwise.
pub fn toolset_matches(requested: Option<&str>, declared: Option<&str>) -> bool {
  match (requested, declared) {
    (Some(requested), Some(declared)) => requested == declared,
    (Some(_), None) => false,
    (None, _) => true,
  }
}

/// The implicit-default exclusion (see [`IMPLICIT_DEFAULT_EXCLUDED_TOOLSET`]).
///
/// Depends on the running best match, so it must be evaluated during the scan
/// and not as a pre-filter.
pub fn implicit_default_excluded(requested: Option<&str>, declared: Option<&str>, have_candidate: bool) -> bool {
  match (requested, declared) {
    (None, Some(declared)) => declared == IMPLICIT_DEFAULT_EXCLUDED_TOOLSET && have_candidate,
    (None, None) | (Some(_), _) => false,
  }
}

/// Exact match when a platform version is requested; anything goes otherwise.
pub fn platform_version_matches(requested: Option<&str>, declared: Option<&str>) -> bool {
  match (requested, declared) {
    (Some(requested), Some(declared)) => requested == declared,
    (Some(_), None) => false,
    (None, _) => true,
  }
}

/// Untagged files are implicitly static and satisfy any request.
/// `static+shared` satisfies any request as well. Without a request, files
/// that are explicitly shared-only are rejected.
pub fn link_matches(requested: Option<Link>, declared: Option<Link>) -> bool {
  match (requested, declared) {
    (Some(_), None) => true,
    (Some(_), Some(Link::StaticShared)) => true,
    (Some(requested), Some(declared)) => requested == declared,
    (None, Some(declared)) => declared != Link::Shared,
    (None, None) => true,
  }
}

/// Untagged files satisfy any request. Without a request only `x86` (tagged
/// or implicit) is accepted.
pub fn arch_matches(requested: Option<Arch>, declared: Option<&str>) -> bool {
  match (requested, declared) {
    (Some(_), None) => true,
    (Some(requested), Some(declared)) => requested.as_str() == declared,
    (None, Some(declared)) => declared == IMPLICIT_ARCH,
    (None, None) => true,
  }
}
