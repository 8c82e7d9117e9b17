//! Shared test helpers for CLI integration tests.

use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::{Mock, Server, ServerGuard};
use tempfile::TempDir;

pub const VERSION: &str = "1.74.0";
pub const ARCHIVE: &str = "boost-1.74.0-test.tar.gz";
pub const ARCHIVE_BASE: &str = "boost-1.74.0-test";
pub const MANIFEST_PATH: &str = "/versions-manifest.json";

/// Manifest vocabulary for the host running the tests.
pub fn host_platform() -> &'static str {
  if cfg!(target_os = "macos") {
    "macos"
  } else if cfg!(windows) {
    "windows"
  } else {
    "linux"
  }
}

/// A gzipped tarball holding `boost/include/version.hpp`.
pub fn boost_archive() -> Vec<u8> {
  let content = b"#define BOOST_VERSION 107400\n";
  let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

  let mut header = tar::Header::new_gnu();
  header.set_path("boost/include/version.hpp").unwrap();
  header.set_size(content.len() as u64);
  header.set_mode(0o644);
  header.set_cksum();
  builder.append(&header, &content[..]).unwrap();

  let mut encoder = builder.into_inner().unwrap();
  encoder.flush().unwrap();
  encoder.finish().unwrap()
}

/// Isolated test environment.
///
/// Each test gets its own temporary install root, cache directory and mock
/// server.
pub struct TestEnv {
  pub temp: TempDir,
  pub server: ServerGuard,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
      server: Server::new(),
    }
  }

  /// Install root (isolated per test, not created up front).
  pub fn root_path(&self) -> PathBuf {
    let base = dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf());
    base.join("boost-root")
  }

  /// Cache path for saved installs.
  pub fn cache_path(&self) -> PathBuf {
    let base = dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf());
    base.join("cache")
  }

  pub fn archive_url(&self) -> String {
    format!("{}/{}", self.server.url(), ARCHIVE)
  }

  /// Manifest with one matching file for the host, surrounded by files that
  /// must never be chosen.
  pub fn manifest_json(&self) -> String {
    serde_json::json!([
      {
        "version": "1.73.0",
        "files": [{
          "filename": "boost-1.73.0-test.tar.gz",
          "platform": host_platform(),
          "download_url": format!("{}/boost-1.73.0-test.tar.gz", self.server.url()),
        }]
      },
      {
        "version": VERSION,
        "files": [
          {
            "filename": "boost-1.74.0-other.tar.gz",
            "platform": "other-os",
            "download_url": format!("{}/boost-1.74.0-other.tar.gz", self.server.url()),
          },
          {
            "filename": ARCHIVE,
            "platform": host_platform(),
            "platform_version": "test",
            "download_url": self.archive_url(),
          },
          {
            "filename": "boost-1.74.0-test-shared.tar.gz",
            "platform": host_platform(),
            "platform_version": "test",
            "link": "shared",
            "download_url": format!("{}/boost-1.74.0-test-shared.tar.gz", self.server.url()),
          }
        ]
      }
    ])
    .to_string()
  }

  /// Serve [`TestEnv::manifest_json`].
  pub fn serve_manifest(&mut self) -> Mock {
    let body = self.manifest_json();
    self
      .server
      .mock("GET", MANIFEST_PATH)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(body)
      .create()
  }

  /// Serve the archive, expecting exactly `hits` downloads.
  pub fn serve_archive(&mut self, hits: usize) -> Mock {
    self
      .server
      .mock("GET", format!("/{}", ARCHIVE).as_str())
      .with_status(200)
      .with_header("content-type", "application/gzip")
      .with_body(boost_archive())
      .expect(hits)
      .create()
  }

  /// Get a pre-configured Command for the boostup binary.
  ///
  /// Clears any runner inputs from the environment and points the binary at
  /// the mock server, the isolated install root and the isolated cache.
  pub fn boostup_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("boostup");
    for var in [
      "INPUT_BOOST_VERSION",
      "INPUT_TOOLSET",
      "INPUT_PLATFORM_VERSION",
      "INPUT_LINK",
      "INPUT_ARCH",
      "INPUT_CACHE",
      "INPUT_VERSION",
      "GITHUB_OUTPUT",
    ] {
      cmd.env_remove(var);
    }
    cmd.env("BOOSTUP_MANIFEST_URL", format!("{}{}", self.server.url(), MANIFEST_PATH));
    cmd.env("BOOSTUP_CACHE_DIR", self.cache_path());
    cmd.env("INPUT_BOOST_INSTALL_DIR", self.root_path());
    cmd
  }
}
