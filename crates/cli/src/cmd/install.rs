//! Implementation of the `boostup install` command.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use boostup_lib::cache::{CacheStore, DirCache};
use boostup_lib::extract::SystemExtractor;
use boostup_lib::fetch::HttpClient;
use boostup_lib::install::{Collaborators, InstallResult, InstallSource, install};
use boostup_lib::outputs::{github_output_path, write_github_outputs};

use super::{SelectionArgs, runtime};
use crate::output::{
  OutputFormat, format_bytes, format_duration, print_info, print_json, print_notice, print_outputs, print_stat,
  print_success,
};

/// Execute the install command.
///
/// Runs the whole pipeline and publishes `BOOST_ROOT` and `BOOST_VER`:
/// appended to `$GITHUB_OUTPUT` when the runner provides it, printed
/// otherwise.
pub fn cmd_install(selection: SelectionArgs, format: OutputFormat) -> Result<()> {
  let options = selection.into_options()?;
  info!(version = env!("CARGO_PKG_VERSION"), "starting boostup");

  let client = HttpClient::new().context("Failed to create HTTP client")?;
  let extractor = SystemExtractor::new(options.platform);
  let cache = match (options.cache, &options.cache_dir) {
    (true, Some(dir)) => Some(DirCache::new(dir)),
    _ => None,
  };

  let deps = Collaborators {
    manifests: &client,
    downloader: &client,
    extractor: &extractor,
    cache: cache.as_ref().map(|c| c as &dyn CacheStore),
  };

  let start = Instant::now();
  let rt = runtime()?;
  let result = rt.block_on(install(&options, deps)).context("Install failed")?;
  let elapsed = start.elapsed();

  if let Some(path) = github_output_path() {
    write_github_outputs(&path, &result.outputs)
      .with_context(|| format!("Failed to write outputs to {}", path.display()))?;
    info!(path = %path.display(), "wrote step outputs");
  }

  if format.is_json() {
    print_json(&result)?;
  } else {
    print_summary(&result, elapsed);
    match github_output_path() {
      Some(path) => print_info(&format!("Outputs written to {}", path.display())),
      None => print_outputs(&result.outputs),
    }
  }

  Ok(())
}

fn print_summary(result: &InstallResult, elapsed: std::time::Duration) {
  for notice in &result.notices {
    print_notice(notice);
  }

  match &result.source {
    InstallSource::Cache => print_success("Restored Boost from cache"),
    InstallSource::Download { artifact, bytes } => {
      print_success(&format!("Installed {}", artifact.filename));
      print_stat("Downloaded", &format_bytes(*bytes));
    }
  }
  print_stat("Root", &result.outputs.root.display().to_string());
  print_stat("Version", &result.outputs.version);
  print_stat("Time", &format_duration(elapsed));
}
