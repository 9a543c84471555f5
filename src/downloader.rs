mod deferred;
mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::extractor::{DownloadOptions, ExtractionError, AUDIO_FORMAT};

pub use deferred::{DeferredDownloader, DEFAULT_REDIRECT_BASE};
pub use local::LocalDownloader;

/// Client-chosen download profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum FormatSelector {
  #[default]
  Video,
  Audio,
  High,
  Medium,
  // anything else falls back to the best available stream
  Other(String),
}

impl From<String> for FormatSelector {
  fn from(s: String) -> Self {
    match s.as_str() {
      "video" => FormatSelector::Video,
      "audio" => FormatSelector::Audio,
      "high" => FormatSelector::High,
      "medium" => FormatSelector::Medium,
      _ => FormatSelector::Other(s),
    }
  }
}

impl From<Option<String>> for FormatSelector {
  fn from(s: Option<String>) -> Self {
    s.map(Into::into).unwrap_or_default()
  }
}

impl FormatSelector {
  pub fn as_str(&self) -> &str {
    match self {
      FormatSelector::Video => "video",
      FormatSelector::Audio => "audio",
      FormatSelector::High => "high",
      FormatSelector::Medium => "medium",
      FormatSelector::Other(s) => s,
    }
  }

  pub fn is_audio(&self) -> bool {
    matches!(self, FormatSelector::Audio)
  }

  /// Extension of the file the client ends up with.
  pub fn extension(&self) -> &'static str {
    if self.is_audio() {
      AUDIO_FORMAT
    } else {
      "mp4"
    }
  }

  pub fn download_options(&self, output_dir: PathBuf) -> DownloadOptions {
    let format = match self {
      FormatSelector::Audio => "bestaudio/best",
      FormatSelector::High => "best[height<=1080]",
      FormatSelector::Medium => "best[height<=720]",
      FormatSelector::Video | FormatSelector::Other(_) => "best",
    };

    DownloadOptions {
      format: format.to_string(),
      extract_audio: self.is_audio(),
      output_template: output_dir.join("%(title)s.%(ext)s"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
  pub message: String,
  pub filename: String,
  pub title: String,
  pub direct_url: Option<String>,
}

#[async_trait]
pub trait Downloader: Send + Sync {
  fn name(&self) -> &'static str;

  async fn download(
    &self,
    url: &str,
    format: &FormatSelector,
  ) -> Result<Download, ExtractionError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_selector_from_string() {
    assert_eq!(FormatSelector::from("audio".to_string()), FormatSelector::Audio);
    assert_eq!(FormatSelector::from("high".to_string()), FormatSelector::High);
    assert_eq!(
      FormatSelector::from("4k".to_string()),
      FormatSelector::Other("4k".to_string())
    );
    assert_eq!(FormatSelector::default(), FormatSelector::Video);

    let selector: FormatSelector = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(selector, FormatSelector::Medium);
    let selector: FormatSelector = serde_json::from_str("null").unwrap();
    assert_eq!(selector, FormatSelector::Video);
    assert_eq!(FormatSelector::Other("4k".into()).as_str(), "4k");
  }

  #[test]
  fn test_download_options() {
    let dir = PathBuf::from("/tmp/req");

    let audio = FormatSelector::Audio.download_options(dir.clone());
    assert_eq!(audio.format, "bestaudio/best");
    assert!(audio.extract_audio);
    assert_eq!(audio.output_template, PathBuf::from("/tmp/req/%(title)s.%(ext)s"));

    let high = FormatSelector::High.download_options(dir.clone());
    assert_eq!(high.format, "best[height<=1080]");
    assert!(!high.extract_audio);

    let medium = FormatSelector::Medium.download_options(dir.clone());
    assert_eq!(medium.format, "best[height<=720]");

    assert_eq!(FormatSelector::Video.download_options(dir.clone()).format, "best");
    assert_eq!(
      FormatSelector::Other("8k".into()).download_options(dir).format,
      "best"
    );
  }

  #[test]
  fn test_extension() {
    assert_eq!(FormatSelector::Audio.extension(), "mp3");
    assert_eq!(FormatSelector::Video.extension(), "mp4");
    assert_eq!(FormatSelector::High.extension(), "mp4");
    assert_eq!(FormatSelector::Other("x".into()).extension(), "mp4");
  }
}
