//! Run configuration.
//!
//! Raw inputs arrive as strings, from CLI flags or the `INPUT_*` environment
//! variables a CI runner sets. [`InstallOptions::from_inputs`] validates them
//! once, before any I/O, and resolves every default.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::consts::{DEFAULT_MANIFEST_URL, LEGACY_MANIFEST_URL};
use crate::manifest::Link;
use crate::platform::arch::Arch;
use crate::platform::os::Os;
use crate::platform::paths;
use crate::resolve::SelectionCriteria;

/// Errors raised while validating inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("the boost_version variable must be defined")]
  MissingVersion,

  #[error("invalid link type '{0}', expected one of: static, shared, static+shared")]
  InvalidLink(String),

  #[error("invalid arch '{0}', expected one of: x86, aarch64")]
  InvalidArch(String),

  #[error("invalid version '{0}', expected one of: legacy, default")]
  InvalidMode(String),

  #[error("invalid boolean '{value}' for input '{name}', expected true or false")]
  InvalidBool { name: &'static str, value: String },

  #[error("could not determine {0}, set it explicitly")]
  NoDefaultDir(&'static str),
}

/// Which historical install flavour to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  /// actions/boost-versions manifest; extracted folder renamed to the archive
  /// name; `link` and `arch` are not supported.
  Legacy,
  /// prebuilt-boost manifest; extracted folder stays `boost`.
  #[default]
  Default,
}

impl Mode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Legacy => "legacy",
      Self::Default => "default",
    }
  }

  /// Address of the manifest this mode reads.
  pub fn manifest_url(&self) -> &'static str {
    match self {
      Self::Legacy => LEGACY_MANIFEST_URL,
      Self::Default => DEFAULT_MANIFEST_URL,
    }
  }

  /// Whether the manifest for this mode tags files with `link` and `arch`.
  pub fn supports_link_and_arch(&self) -> bool {
    matches!(self, Self::Default)
  }

  /// Whether extraction renames the `boost` folder to the archive base name.
  pub fn renames_extracted_dir(&self) -> bool {
    matches!(self, Self::Legacy)
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Mode {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "legacy" => Ok(Self::Legacy),
      "default" => Ok(Self::Default),
      other => Err(ConfigError::InvalidMode(other.to_string())),
    }
  }
}

/// Raw, unvalidated inputs.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
  pub boost_version: Option<String>,
  pub toolset: Option<String>,
  pub platform_version: Option<String>,
  pub link: Option<String>,
  pub arch: Option<String>,
  pub install_dir: Option<String>,
  pub cache: Option<String>,
  pub mode: Option<String>,
  pub manifest_url: Option<String>,
  pub cache_dir: Option<String>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
  pub version: String,
  pub toolset: Option<String>,
  pub platform_version: Option<String>,
  pub link: Option<Link>,
  pub arch: Option<Arch>,
  pub platform: Os,
  pub mode: Mode,
  pub root_dir: PathBuf,
  pub cache: bool,
  pub cache_dir: Option<PathBuf>,
  pub manifest_url: String,
}

impl InstallOptions {
  /// Validate `inputs` and resolve defaults.
  ///
  /// The cache directory is only required when caching is enabled.
  pub fn from_inputs(inputs: Inputs) -> Result<Self, ConfigError> {
    let version = non_empty(inputs.boost_version).ok_or(ConfigError::MissingVersion)?;

    let mode = non_empty(inputs.mode)
      .map(|m| m.parse::<Mode>())
      .transpose()?
      .unwrap_or_default();

    let link = non_empty(inputs.link)
      .map(|l| l.parse::<Link>().map_err(ConfigError::InvalidLink))
      .transpose()?;
    let arch = non_empty(inputs.arch)
      .map(|a| a.parse::<Arch>().map_err(ConfigError::InvalidArch))
      .transpose()?;

    let (link, arch) = if mode.supports_link_and_arch() {
      (link, arch)
    } else {
      if link.is_some() {
        warn!("the 'link' input is not supported in legacy mode and will be ignored");
      }
      if arch.is_some() {
        warn!("the 'arch' input is not supported in legacy mode and will be ignored");
      }
      (None, None)
    };

    let cache = match non_empty(inputs.cache) {
      Some(value) => parse_bool("cache", &value)?,
      None => true,
    };

    let root_dir = match non_empty(inputs.install_dir) {
      Some(dir) => PathBuf::from(dir),
      None => paths::default_install_dir().ok_or(ConfigError::NoDefaultDir("the install directory"))?,
    };

    let cache_dir = match non_empty(inputs.cache_dir) {
      Some(dir) => Some(PathBuf::from(dir)),
      None if cache => Some(paths::cache_dir().ok_or(ConfigError::NoDefaultDir("the cache directory"))?),
      None => None,
    };

    let manifest_url = non_empty(inputs.manifest_url).unwrap_or_else(|| mode.manifest_url().to_string());

    Ok(Self {
      version,
      toolset: non_empty(inputs.toolset),
      platform_version: non_empty(inputs.platform_version),
      link,
      arch,
      platform: Os::current(),
      mode,
      root_dir,
      cache,
      cache_dir,
      manifest_url,
    })
  }

  /// Selection criteria handed to the resolver.
  pub fn criteria(&self) -> SelectionCriteria {
    SelectionCriteria {
      version: self.version.clone(),
      toolset: self.toolset.clone(),
      platform_version: self.platform_version.clone(),
      link: self.link,
      arch: self.arch,
      platform: self.platform,
    }
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Boolean grammar used by CI inputs.
fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
  match value {
    "true" | "True" | "TRUE" => Ok(true),
    "false" | "False" | "FALSE" => Ok(false),
    other => Err(ConfigError::InvalidBool {
      name,
      value: other.to_string(),
    }),
  }
}
