//! Archive extraction.
//!
//! Prebuilt archives are unpacked with the platform's own tools: `tar` on
//! Linux and macOS, and `7z` on Windows. Windows archives are double
//! compressed, so they take two passes (`.tar.gz` to `.tar`, then `.tar` to
//! files) and leave an intermediate `.tar` behind for cleanup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::consts::BOOST_DIR_NAME;
use crate::platform::os::Os;

/// Errors that can occur while unpacking an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
  /// The unpack tool could not be started.
  #[error("{tool} failed: {source}")]
  Spawn {
    tool: String,
    #[source]
    source: std::io::Error,
  },

  /// The unpack tool ran but reported failure.
  #[error("{tool} exited with code {}", exit_code(.code))]
  Failed { tool: String, code: Option<i32> },

  /// The archive path has no usable file name.
  #[error("invalid archive path: {0}")]
  InvalidArchive(PathBuf),

  /// Moving the extracted folder into place failed.
  #[error("failed to rename {from} to {to}: {source}")]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

fn exit_code(code: &Option<i32>) -> String {
  code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

/// Unpacks a downloaded archive.
#[async_trait]
pub trait Extractor: Send + Sync {
  /// Unpack `archive` into `dest_dir`.
  ///
  /// With `rename_to`, the extracted `boost` folder ends up at
  /// `dest_dir/<rename_to>` instead.
  async fn unpack(&self, archive: &Path, dest_dir: &Path, rename_to: Option<&str>) -> Result<(), ExtractError>;
}

/// Strip the two trailing extensions of an archive name.
///
/// `boost-1.74.0-windows-2019.tar.gz` becomes `boost-1.74.0-windows-2019`.
/// Names with fewer dots lose as many extensions as they have.
pub fn archive_base_name(filename: &str) -> &str {
  let once = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
  once.rsplit_once('.').map_or(once, |(stem, _)| stem)
}

/// Intermediate files an extraction of `filename` may leave in `dest_dir`.
pub fn intermediate_files(filename: &str, dest_dir: &Path) -> Vec<PathBuf> {
  vec![dest_dir.join(format!("{}.tar", archive_base_name(filename)))]
}

/// Extractor that shells out to `tar` or `7z`.
#[derive(Debug, Clone)]
pub struct SystemExtractor {
  os: Os,
  tar: String,
  seven_zip: String,
}

impl Default for SystemExtractor {
  fn default() -> Self {
    Self::new(Os::current())
  }
}

impl SystemExtractor {
  /// Extractor using the tools appropriate for `os`.
  pub fn new(os: Os) -> Self {
    Self {
      os,
      tar: "tar".to_string(),
      seven_zip: "7z".to_string(),
    }
  }

  /// Override the `tar` executable.
  pub fn with_tar_program(mut self, program: impl Into<String>) -> Self {
    self.tar = program.into();
    self
  }

  /// Override the `7z` executable.
  pub fn with_seven_zip_program(mut self, program: impl Into<String>) -> Self {
    self.seven_zip = program.into();
    self
  }

  async fn untar(&self, filename: &str, dest_dir: &Path, rename_to: Option<&str>) -> Result<(), ExtractError> {
    debug!("unpacking boost using tar");
    run_tool(&self.tar, &["xzf", filename], dest_dir).await?;

    if let Some(name) = rename_to {
      rename_extracted(dest_dir, name)?;
    }
    Ok(())
  }

  async fn un7z(&self, filename: &str, dest_dir: &Path, rename_to: Option<&str>) -> Result<(), ExtractError> {
    debug!("unpacking boost using 7zip");
    let base = archive_base_name(filename);
    let tar_name = format!("{}.tar", base);

    run_tool(&self.seven_zip, &["x", filename], dest_dir).await?;

    let mut args = vec!["x".to_string(), tar_name, "-aoa".to_string()];
    if let Some(name) = rename_to {
      args.push(format!("-o{}", name));
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_tool(&self.seven_zip, &args, dest_dir).await
  }
}

#[async_trait]
impl Extractor for SystemExtractor {
  async fn unpack(&self, archive: &Path, dest_dir: &Path, rename_to: Option<&str>) -> Result<(), ExtractError> {
    let filename = archive
      .file_name()
      .and_then(|name| name.to_str())
      .ok_or_else(|| ExtractError::InvalidArchive(archive.to_path_buf()))?;

    info!(archive = %filename, dest = %dest_dir.display(), "extracting");

    if self.os.is_windows() {
      self.un7z(filename, dest_dir, rename_to).await
    } else {
      self.untar(filename, dest_dir, rename_to).await
    }
  }
}

/// Move `dest_dir/boost` to `dest_dir/<name>`.
///
/// Archives that already unpack into `<name>` are left alone.
fn rename_extracted(dest_dir: &Path, name: &str) -> Result<(), ExtractError> {
  let from = dest_dir.join(BOOST_DIR_NAME);
  let to = dest_dir.join(name);

  if to.exists() || !from.is_dir() {
    debug!(target = %to.display(), "no rename needed");
    return Ok(());
  }

  debug!(from = %from.display(), to = %to.display(), "renaming extracted directory");
  std::fs::rename(&from, &to).map_err(|e| ExtractError::Rename { from, to, source: e })
}

async fn run_tool(program: &str, args: &[&str], cwd: &Path) -> Result<(), ExtractError> {
  debug!(program, ?args, cwd = %cwd.display(), "spawning process");

  let output = Command::new(program)
    .args(args)
    .current_dir(cwd)
    .output()
    .await
    .map_err(|e| ExtractError::Spawn {
      tool: program.to_string(),
      source: e,
    })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }
    return Err(ExtractError::Failed {
      tool: program.to_string(),
      code: output.status.code(),
    });
  }

  info!("{} exited with code 0", program);
  Ok(())
}
