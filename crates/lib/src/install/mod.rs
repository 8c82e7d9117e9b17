//! The install pipeline.
//!
//! [`install`] drives one run end to end:
//!
//! 1. Probe the cache (when enabled). A hit emits the stored outputs and stops.
//! 2. Fetch the manifest and [`resolve`] the archive.
//! 3. Create the install root, download the archive into it and unpack it.
//! 4. Delete the archive and any intermediate `.tar`.
//! 5. Save the install root to the cache (best effort).
//!
//! Every stage is awaited before the next one starts. Fatal errors abort the
//! run without rolling back a partial extraction.

mod types;

pub use types::*;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::cache::{CacheKey, CachedOutputs};
use crate::config::InstallOptions;
use crate::consts::BOOST_DIR_NAME;
use crate::extract::{archive_base_name, intermediate_files};
use crate::fetch::ManifestSource;
use crate::resolve::{Resolution, resolve};
use crate::util::fs::{delete_files, ensure_dir};

/// Fetch the manifest for `options` and resolve the archive without
/// downloading anything.
pub async fn resolve_only(
  options: &InstallOptions,
  manifests: &dyn ManifestSource,
) -> Result<Resolution, InstallError> {
  let manifest = manifests.fetch_manifest(&options.manifest_url).await?;
  Ok(resolve(&manifest, &options.criteria())?)
}

/// Run the full install for `options`.
pub async fn install(options: &InstallOptions, deps: Collaborators<'_>) -> Result<InstallResult, InstallError> {
  info!(
    version = %options.version,
    mode = %options.mode,
    platform = %options.platform,
    root = %options.root_dir.display(),
    "starting install"
  );

  let key = CacheKey::from_options(options);

  if let Some(cache) = deps.cache {
    match cache.restore(&key, &options.root_dir).await {
      Ok(Some(cached)) if cached.mode == options.mode => {
        info!(key = %key, "cache hit");
        return Ok(InstallResult {
          outputs: InstallOutputs {
            root: options.root_dir.join(&cached.subdir),
            version: cached.version,
          },
          source: InstallSource::Cache,
          notices: Vec::new(),
        });
      }
      Ok(Some(cached)) => info!(key = %key, cached = %cached.mode, "cache entry is for another mode, ignoring it"),
      Ok(None) => info!(key = %key, "cache miss"),
      Err(e) => warn!(key = %key, error = %e, "failed to restore cache, continuing without it"),
    }
  }

  let resolution = resolve_only(options, deps.manifests).await?;
  let artifact = resolution.artifact;

  ensure_dir(&options.root_dir).map_err(|source| InstallError::Io {
    action: "create",
    path: options.root_dir.clone(),
    source,
  })?;

  let archive = options.root_dir.join(&artifact.filename);
  let bytes = deps.downloader.download(&artifact.download_url, &archive).await?;

  let base = archive_base_name(&artifact.filename).to_string();
  let rename_to = options.mode.renames_extracted_dir().then_some(base.as_str());

  deps.extractor.unpack(&archive, &options.root_dir, rename_to).await?;

  let mut leftovers: Vec<PathBuf> = vec![archive.clone()];
  leftovers.extend(intermediate_files(&artifact.filename, &options.root_dir));
  let removed = delete_files(&leftovers).map_err(|source| InstallError::Io {
    action: "clean up",
    path: options.root_dir.clone(),
    source,
  })?;
  info!(removed = removed.len(), "removed downloaded archives");

  let subdir = rename_to.unwrap_or(BOOST_DIR_NAME).to_string();
  let outputs = InstallOutputs {
    root: options.root_dir.join(&subdir),
    version: base.clone(),
  };

  if let Some(cache) = deps.cache {
    let record = CachedOutputs {
      subdir,
      version: base,
      mode: options.mode,
    };
    match cache.save(&key, &options.root_dir, &record).await {
      Ok(()) => info!(key = %key, "saved install to cache"),
      Err(e) => warn!(key = %key, error = %e, "failed to save cache"),
    }
  }

  info!(root = %outputs.root.display(), version = %outputs.version, "install complete");
  Ok(InstallResult {
    outputs,
    source: InstallSource::Download { artifact, bytes },
    notices: resolution.notices,
  })
}
