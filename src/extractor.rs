mod ytdlp;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use ytdlp::{Ytdlp, AUDIO_FORMAT};

/// The subset of an info dict this service cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
  pub title: Option<String>,
  pub thumbnail: Option<String>,
  pub duration: Option<f64>,
  pub uploader: Option<String>,
  #[serde(default, deserialize_with = "lenient_count")]
  pub view_count: Option<u64>,
  pub filename: Option<PathBuf>,
  #[serde(rename = "_filename")]
  pub legacy_filename: Option<PathBuf>,
}

impl Metadata {
  /// The output path prepared from the template, before any post-processing.
  pub fn prepared_filename(&self) -> Option<&Path> {
    self
      .filename
      .as_deref()
      .or(self.legacy_filename.as_deref())
  }
}

// some extractors report counts as floats, or garbage
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  let count = match Option::<Value>::deserialize(deserializer)? {
    Some(Value::Number(n)) => n.as_u64().or_else(|| {
      n.as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u64)
    }),
    _ => None,
  };
  Ok(count)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
  pub format: String,
  pub extract_audio: bool,
  pub output_template: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
  #[error("failed to run yt-dlp: {0}")]
  Spawn(#[from] std::io::Error),
  #[error("{0}")]
  Failed(String),
  #[error("yt-dlp did not finish within {0} seconds")]
  Timeout(u64),
  #[error("failed to parse yt-dlp output: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("yt-dlp did not report an output filename")]
  MissingFilename,
  #[error("failed to prepare {}: {source}", .path.display())]
  OutputDir {
    path: PathBuf,
    source: std::io::Error,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Private,
  Unavailable,
  Other,
}

impl ErrorKind {
  pub fn classify(message: &str) -> Self {
    if message.contains("Private video") {
      ErrorKind::Private
    } else if message.contains("Video unavailable") {
      ErrorKind::Unavailable
    } else {
      ErrorKind::Other
    }
  }
}

impl ExtractionError {
  pub fn kind(&self) -> ErrorKind {
    ErrorKind::classify(&self.to_string())
  }
}

#[async_trait]
pub trait Extractor: Send + Sync {
  /// Look up metadata without writing anything to disk.
  async fn fetch_metadata(
    &self,
    url: &str,
  ) -> Result<Metadata, ExtractionError>;

  /// Download the media and return its metadata, including the prepared
  /// output filename.
  async fn download(
    &self,
    url: &str,
    options: &DownloadOptions,
  ) -> Result<Metadata, ExtractionError>;
}
