//! Test utilities for boostup-lib.
//!
//! Builders for manifests and on-disk archive fixtures.

use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::manifest::{ArtifactDescriptor, Manifest, VersionEntry};
use crate::platform::os::Os;

/// Header content every fixture archive ships.
pub const VERSION_HPP: &[u8] = b"#define BOOST_VERSION 107400\n";

/// A file entry for `platform` with no optional tags besides the platform version.
pub fn artifact(filename: &str, platform: Os, platform_version: &str) -> ArtifactDescriptor {
  ArtifactDescriptor {
    filename: filename.to_string(),
    download_url: format!("https://example.com/releases/{}", filename),
    platform: Some(platform),
    platform_version: Some(platform_version.to_string()),
    toolset: None,
    link: None,
    arch: None,
  }
}

/// A manifest with a single version entry.
pub fn single_version(version: &str, files: Vec<ArtifactDescriptor>) -> Manifest {
  Manifest::new(vec![VersionEntry {
    version: version.to_string(),
    files,
  }])
}

/// Write `<dir>/<filename>` as a gzipped tarball holding `<top_dir>/version.hpp`.
pub fn write_boost_archive(dir: &Path, filename: &str, top_dir: &str) -> PathBuf {
  let path = dir.join(filename);
  let file = std::fs::File::create(&path).unwrap();
  let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

  let mut header = tar::Header::new_gnu();
  header.set_path(format!("{}/version.hpp", top_dir)).unwrap();
  header.set_size(VERSION_HPP.len() as u64);
  header.set_mode(0o644);
  header.set_cksum();
  builder.append(&header, VERSION_HPP).unwrap();

  builder.into_inner().unwrap().finish().unwrap();
  path
}
