//! Publishing run outputs.
//!
//! Inside GitHub Actions, step outputs are appended to the file named by
//! `GITHUB_OUTPUT` as `NAME=value` lines.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::install::InstallOutputs;

/// Environment variable naming the step output file.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Path of the step output file, when running under a runner that provides one.
pub fn github_output_path() -> Option<PathBuf> {
  std::env::var_os(GITHUB_OUTPUT_ENV)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
}

/// Render outputs as `NAME=value` lines.
pub fn to_lines(outputs: &InstallOutputs) -> String {
  outputs
    .pairs()
    .iter()
    .map(|(name, value)| format!("{}={}\n", name, value))
    .collect()
}

/// Append `outputs` to the step output file at `path`, creating it if needed.
pub fn write_github_outputs(path: &Path, outputs: &InstallOutputs) -> std::io::Result<()> {
  let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
  file.write_all(to_lines(outputs).as_bytes())?;
  debug!(path = %path.display(), "wrote step outputs");
  Ok(())
}
