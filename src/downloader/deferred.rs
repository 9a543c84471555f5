use std::sync::Arc;

use async_trait::async_trait;
use http_types::Url;

use crate::extractor::{ExtractionError, Extractor};

use super::{Download, Downloader, FormatSelector};

pub const DEFAULT_REDIRECT_BASE: &str = "https://example.com/download";

/// Only looks the media up and hands the client a url of an external
/// service that does the actual download.
pub struct DeferredDownloader {
  extractor: Arc<dyn Extractor>,
  redirect_base: Url,
}

impl DeferredDownloader {
  pub fn new(extractor: Arc<dyn Extractor>, redirect_base: Url) -> Self {
    Self {
      extractor,
      redirect_base,
    }
  }

  fn direct_url(&self, url: &str, format: &FormatSelector) -> String {
    let mut direct_url = self.redirect_base.clone();
    direct_url
      .query_pairs_mut()
      .append_pair("url", url)
      .append_pair("format", format.as_str());
    direct_url.into()
  }
}

#[async_trait]
impl Downloader for DeferredDownloader {
  fn name(&self) -> &'static str {
    "deferred"
  }

  async fn download(
    &self,
    url: &str,
    format: &FormatSelector,
  ) -> Result<Download, ExtractionError> {
    let metadata = self.extractor.fetch_metadata(url).await?;
    let title = metadata.title.unwrap_or_else(|| "video".to_string());

    Ok(Download {
      message: "Video is ready for download".to_string(),
      filename: format!("{}.{}", title, format.extension()),
      direct_url: Some(self.direct_url(url, format)),
      title,
    })
  }
}
