use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
  extractor::{ExtractionError, Extractor, AUDIO_FORMAT},
  util::request_id,
};

use super::{Download, Downloader, FormatSelector};

/// Downloads the media into a directory of its own under `base_dir`.
pub struct LocalDownloader {
  extractor: Arc<dyn Extractor>,
  base_dir: PathBuf,
}

impl LocalDownloader {
  pub fn new(
    extractor: Arc<dyn Extractor>,
    base_dir: impl Into<PathBuf>,
  ) -> Self {
    Self {
      extractor,
      base_dir: base_dir.into(),
    }
  }
}

#[async_trait]
impl Downloader for LocalDownloader {
  fn name(&self) -> &'static str {
    "local"
  }

  async fn download(
    &self,
    url: &str,
    format: &FormatSelector,
  ) -> Result<Download, ExtractionError> {
    // a fresh directory per request keeps same-titled downloads apart
    let dir = self.base_dir.join(request_id());
    tokio::fs::create_dir_all(&dir).await.map_err(|source| {
      ExtractionError::OutputDir {
        path: dir.clone(),
        source,
      }
    })?;

    let options = format.download_options(dir.clone());
    let metadata = match self.extractor.download(url, &options).await {
      Ok(metadata) => metadata,
      Err(e) => {
        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
          warn!("failed to clean up {}: {}", dir.display(), e);
        }
        return Err(e);
      }
    };

    let mut path = metadata
      .prepared_filename()
      .ok_or(ExtractionError::MissingFilename)?
      .to_path_buf();

    // the audio gets transcoded after the filename was prepared
    if format.is_audio() {
      path.set_extension(AUDIO_FORMAT);
    }

    let filename = path
      .file_name()
      .ok_or(ExtractionError::MissingFilename)?
      .to_string_lossy()
      .into_owned();

    info!("downloaded {} to {}", url, path.display());

    Ok(Download {
      message: "Video downloaded successfully".to_string(),
      filename,
      title: metadata.title.unwrap_or_else(|| "video".to_string()),
      direct_url: None,
    })
  }
}
