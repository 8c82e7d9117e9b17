//! Implementation of the `boostup resolve` command.

use anyhow::{Context, Result};
use serde_json::json;

use boostup_lib::fetch::HttpClient;
use boostup_lib::install::resolve_only;

use super::{SelectionArgs, runtime};
use crate::output::{OutputFormat, print_json, print_notice, print_stat, print_success};

/// Execute the resolve command: fetch the manifest and report the chosen
/// archive without downloading it.
pub fn cmd_resolve(selection: SelectionArgs, format: OutputFormat) -> Result<()> {
  let options = selection.into_options()?;
  let client = HttpClient::new().context("Failed to create HTTP client")?;

  let rt = runtime()?;
  let resolution = rt
    .block_on(resolve_only(&options, &client))
    .context("Resolution failed")?;

  if format.is_json() {
    let notices: Vec<String> = resolution.notices.iter().map(|n| n.to_string()).collect();
    print_json(&json!({
      "version": options.version,
      "mode": options.mode.as_str(),
      "platform": options.platform.as_str(),
      "filename": resolution.artifact.filename,
      "download_url": resolution.artifact.download_url,
      "notices": notices,
    }))?;
  } else {
    print_success(&format!("Boost {} resolves to {}", options.version, resolution.artifact.filename));
    print_stat("URL", &resolution.artifact.download_url);
    print_stat("Mode", options.mode.as_str());
    for notice in &resolution.notices {
      print_notice(notice);
    }
  }

  Ok(())
}
