mod info;
mod install;
mod resolve;

pub use info::cmd_info;
pub use install::cmd_install;
pub use resolve::cmd_resolve;

use anyhow::{Context, Result};
use clap::Args;

use boostup_lib::config::{InstallOptions, Inputs};

/// Selection inputs shared by `install` and `resolve`.
///
/// Every flag falls back to the environment variable a GitHub Actions runner
/// sets for the matching action input.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
  /// Boost version to install, e.g. 1.74.0
  #[arg(long, env = "INPUT_BOOST_VERSION")]
  pub boost_version: Option<String>,

  /// Compiler toolset, e.g. msvc or mingw
  #[arg(long, env = "INPUT_TOOLSET")]
  pub toolset: Option<String>,

  /// OS version the archive was built on, e.g. 2019 or 20.04
  #[arg(long, env = "INPUT_PLATFORM_VERSION")]
  pub platform_version: Option<String>,

  /// Link type: static, shared or static+shared
  #[arg(long, env = "INPUT_LINK")]
  pub link: Option<String>,

  /// Architecture: x86 or aarch64
  #[arg(long, env = "INPUT_ARCH")]
  pub arch: Option<String>,

  /// Directory to install into
  #[arg(long, env = "INPUT_BOOST_INSTALL_DIR")]
  pub install_dir: Option<String>,

  /// Whether to use the install cache (true or false)
  #[arg(long, env = "INPUT_CACHE", value_name = "BOOL")]
  pub cache: Option<String>,

  /// Install flavour: legacy or default
  #[arg(long, env = "INPUT_VERSION")]
  pub mode: Option<String>,

  /// Override the manifest address
  #[arg(long, env = "BOOSTUP_MANIFEST_URL")]
  pub manifest_url: Option<String>,

  /// Override the cache directory
  #[arg(long, env = "BOOSTUP_CACHE_DIR")]
  pub cache_dir: Option<String>,
}

impl SelectionArgs {
  /// Validate into run options.
  pub fn into_options(self) -> Result<InstallOptions> {
    let inputs = Inputs {
      boost_version: self.boost_version,
      toolset: self.toolset,
      platform_version: self.platform_version,
      link: self.link,
      arch: self.arch,
      install_dir: self.install_dir,
      cache: self.cache,
      mode: self.mode,
      manifest_url: self.manifest_url,
      cache_dir: self.cache_dir,
    };
    InstallOptions::from_inputs(inputs).context("Invalid input")
  }
}

/// Runtime for the async library calls.
fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}
