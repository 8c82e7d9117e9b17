use anyhow::Result;
use serde_json::json;

use boostup_lib::config::Mode;
use boostup_lib::platform::Platform;
use boostup_lib::platform::paths::{cache_dir, default_install_dir};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let platform = Platform::current();
  let install_dir = default_install_dir().map(|p| p.display().to_string());
  let cache = cache_dir().map(|p| p.display().to_string());

  if format.is_json() {
    return print_json(&json!({
      "version": env!("CARGO_PKG_VERSION"),
      "platform": platform.os.as_str(),
      "arch": platform.arch.map(|a| a.as_str()),
      "install_dir": install_dir,
      "cache_dir": cache,
      "manifests": {
        "legacy": Mode::Legacy.manifest_url(),
        "default": Mode::Default.manifest_url(),
      },
    }));
  }

  println!("System:");
  print_stat("Platform", &platform.to_string());
  print_stat("Install dir", install_dir.as_deref().unwrap_or("<unknown>"));
  print_stat("Cache dir", cache.as_deref().unwrap_or("<unknown>"));
  println!("Manifests:");
  print_stat(Mode::Legacy.as_str(), Mode::Legacy.manifest_url());
  print_stat(Mode::Default.as_str(), Mode::Default.manifest_url());
  Ok(())
}
