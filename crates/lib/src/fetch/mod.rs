//! HTTP transport for the manifest and the archives.
//!
//! [`HttpClient`] implements both [`ManifestSource`] and [`Downloader`]. The
//! orchestrator only sees the traits, so tests substitute in-memory fakes.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::consts::USER_AGENT;
use crate::manifest::Manifest;

/// Log a progress line at least this often when the size is unknown.
const UNKNOWN_SIZE_LOG_STEP: u64 = 8 * 1024 * 1024;

/// Errors that can occur while talking to the network.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Building the HTTP client failed.
  #[error("failed to initialize HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// The request could not be sent or the body could not be read.
  #[error("fetch failed for {url}: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("fetch failed for {url}: HTTP {status}")]
  Status { url: String, status: u16 },

  /// The manifest body is not valid JSON of the expected shape.
  #[error("malformed manifest from {url}: {source}")]
  Parse {
    url: String,
    #[source]
    source: serde_json::Error,
  },

  /// Writing the download to disk failed.
  #[error("failed to write {path}: {source}")]
  Write {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Snapshot of a running download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
  pub downloaded: u64,
  /// Content length announced by the server, if any.
  pub total: Option<u64>,
}

impl DownloadProgress {
  /// Completed fraction in percent, when the total size is known.
  pub fn percent(&self) -> Option<f64> {
    match self.total {
      Some(0) => Some(100.0),
      Some(total) => Some(self.downloaded as f64 * 100.0 / total as f64),
      None => None,
    }
  }
}

pub type ProgressCallback = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// Where the versions manifest comes from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
  async fn fetch_manifest(&self, url: &str) -> Result<Manifest, FetchError>;
}

/// Streams an archive to disk.
#[async_trait]
pub trait Downloader: Send + Sync {
  /// Download `url` to `dest`, returning the number of bytes written.
  async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpClient {
  client: reqwest::Client,
  on_progress: Option<ProgressCallback>,
}

impl HttpClient {
  pub fn new() -> Result<Self, FetchError> {
    let client = reqwest::Client::builder()
      .user_agent(USER_AGENT)
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self {
      client,
      on_progress: None,
    })
  }

  /// Register a callback invoked for every received chunk.
  pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
    self.on_progress = Some(callback);
    self
  }

  async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
    let response = self.client.get(url).send().await.map_err(|e| FetchError::Request {
      url: url.to_string(),
      source: e,
    })?;

    if !response.status().is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: response.status().as_u16(),
      });
    }

    Ok(response)
  }
}

#[async_trait]
impl ManifestSource for HttpClient {
  async fn fetch_manifest(&self, url: &str) -> Result<Manifest, FetchError> {
    info!(url = %url, "downloading versions manifest");

    let body = self.get(url).await?.text().await.map_err(|e| FetchError::Request {
      url: url.to_string(),
      source: e,
    })?;
    debug!(bytes = body.len(), "downloaded manifest");

    let manifest: Manifest = serde_json::from_str(&body).map_err(|e| FetchError::Parse {
      url: url.to_string(),
      source: e,
    })?;
    debug!(versions = manifest.entries.len(), "parsed manifest");

    Ok(manifest)
  }
}

#[async_trait]
impl Downloader for HttpClient {
  async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
    info!(url = %url, path = %dest.display(), "downloading boost");

    let write_err = |e: std::io::Error| FetchError::Write {
      path: dest.display().to_string(),
      source: e,
    };

    let mut response = self.get(url).await?;
    let total = response.content_length();
    let mut file = fs::File::create(dest).await.map_err(write_err)?;
    let mut tracker = ProgressTracker::new(total);

    while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Request {
      url: url.to_string(),
      source: e,
    })? {
      file.write_all(&chunk).await.map_err(write_err)?;

      let progress = tracker.advance(chunk.len() as u64);
      if let Some(callback) = &self.on_progress {
        callback(progress);
      }
    }

    file.flush().await.map_err(write_err)?;

    info!(path = %dest.display(), size = tracker.downloaded, "download finished");
    Ok(tracker.downloaded)
  }
}

/// Turns chunk sizes into progress snapshots and throttles progress logging.
struct ProgressTracker {
  downloaded: u64,
  total: Option<u64>,
  next_log_at: u64,
}

impl ProgressTracker {
  fn new(total: Option<u64>) -> Self {
    let mut tracker = Self {
      downloaded: 0,
      total,
      next_log_at: 0,
    };
    tracker.next_log_at = tracker.log_step();
    tracker
  }

  fn log_step(&self) -> u64 {
    match self.total {
      Some(total) if total > 0 => (total / 10).max(1),
      _ => UNKNOWN_SIZE_LOG_STEP,
    }
  }

  fn advance(&mut self, bytes: u64) -> DownloadProgress {
    self.downloaded += bytes;
    let progress = DownloadProgress {
      downloaded: self.downloaded,
      total: self.total,
    };

    if self.downloaded >= self.next_log_at {
      match progress.percent() {
        Some(percent) => info!("download progress: {:.2}%", percent),
        None => info!(downloaded = self.downloaded, "download progress"),
      }
      while self.next_log_at <= self.downloaded {
        self.next_log_at += self.log_step();
      }
    }

    progress
  }
}
