use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The architecture every untagged artifact is assumed to target.
pub const IMPLICIT_ARCH: &str = "x86";

/// CPU architectures a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X86,
  Aarch64,
}

impl Arch {
  /// Detect the host CPU architecture.
  ///
  /// Returns `None` for architectures no prebuilt artifact targets.
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" | "x86_64" => Some(Self::X86),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the manifest identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x86" => Ok(Self::X86),
      "aarch64" => Ok(Self::Aarch64),
      other => Err(other.to_string()),
    }
  }
}
