use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, State},
  Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
  downloader::{Download, Downloader, FormatSelector},
  extractor::{ErrorKind, ExtractionError, Extractor, Metadata},
  platform::{self, Platform},
  util::{format_duration, format_views},
  Error, Result,
};

pub const EMPTY_URL_ERROR: &str = "Please enter a video URL";

#[derive(Clone)]
pub struct AppState {
  pub extractor: Arc<dyn Extractor>,
  // strategy behind /api/download
  pub downloader: Arc<dyn Downloader>,
  // always performs the download
  pub direct_downloader: Arc<dyn Downloader>,
}

/// Body of every api response: `success` plus either the payload fields or
/// an `error` message.
#[derive(Debug, Serialize)]
pub struct Reply<T> {
  success: bool,
  #[serde(flatten)]
  data: Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

impl<T> Reply<T> {
  pub fn success(data: T) -> Self {
    Self {
      success: true,
      data: Some(data),
      error: None,
    }
  }

  pub fn failure(error: impl Into<String>) -> Self {
    Self {
      success: false,
      data: None,
      error: Some(error.into()),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct InfoReq {
  #[serde(default)]
  url: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadReq {
  #[serde(default)]
  url: String,
  #[serde(default)]
  format: FormatSelector,
}

#[derive(Debug, Serialize)]
pub struct InfoData {
  info: VideoInfo,
}

#[derive(Debug, Serialize)]
pub struct VideoInfo {
  title: String,
  thumbnail: String,
  duration: String,
  uploader: String,
  view_count: String,
  platform: Platform,
}

impl VideoInfo {
  fn new(metadata: Metadata, platform: Platform) -> Self {
    Self {
      title: metadata.title.unwrap_or_else(|| "Unknown Video".to_string()),
      thumbnail: metadata.thumbnail.unwrap_or_default(),
      duration: format_duration(metadata.duration),
      uploader: metadata.uploader.unwrap_or_else(|| "Unknown".to_string()),
      view_count: format_views(metadata.view_count),
      platform,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DownloadData {
  message: String,
  filename: String,
  title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  direct_url: Option<String>,
}

impl From<Download> for DownloadData {
  fn from(d: Download) -> Self {
    Self {
      message: d.message,
      filename: d.filename,
      title: d.title,
      direct_url: d.direct_url,
    }
  }
}

/// User-facing message for a failed metadata lookup.
pub fn info_error_message(err: &ExtractionError) -> String {
  match err.kind() {
    ErrorKind::Private => {
      "This video is private and cannot be downloaded".to_string()
    }
    ErrorKind::Unavailable => {
      "Video is unavailable or has been removed".to_string()
    }
    ErrorKind::Other => format!("Unable to process this video URL: {err}"),
  }
}

fn body<T>(req: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
  req
    .map(|Json(req)| req)
    .map_err(|rejection| Error::Client(anyhow::anyhow!(rejection.body_text())))
}

pub async fn video_info(
  State(state): State<AppState>,
  req: std::result::Result<Json<InfoReq>, JsonRejection>,
) -> Result<Json<Reply<InfoData>>> {
  let req = body(req)?;
  let url = req.url.trim();

  if url.is_empty() {
    return Ok(Json(Reply::failure(EMPTY_URL_ERROR)));
  }

  let platform = platform::classify(url);
  info!("looking up {} ({})", url, platform.as_str());
  let reply = match state.extractor.fetch_metadata(url).await {
    Ok(metadata) => Reply::success(InfoData {
      info: VideoInfo::new(metadata, platform),
    }),
    Err(e) => {
      warn!("lookup of {} failed: {}", url, e);
      Reply::failure(info_error_message(&e))
    }
  };

  Ok(Json(reply))
}

pub async fn download(
  State(state): State<AppState>,
  req: std::result::Result<Json<DownloadReq>, JsonRejection>,
) -> Result<Json<Reply<DownloadData>>> {
  let req = body(req)?;
  run_download(state.downloader.as_ref(), req).await
}

pub async fn direct_download(
  State(state): State<AppState>,
  req: std::result::Result<Json<DownloadReq>, JsonRejection>,
) -> Result<Json<Reply<DownloadData>>> {
  let req = body(req)?;
  run_download(state.direct_downloader.as_ref(), req).await
}

async fn run_download(
  downloader: &dyn Downloader,
  req: DownloadReq,
) -> Result<Json<Reply<DownloadData>>> {
  let url = req.url.trim();

  if url.is_empty() {
    return Ok(Json(Reply::failure(EMPTY_URL_ERROR)));
  }

  info!(
    "downloading {} as {} ({})",
    url,
    req.format.as_str(),
    downloader.name()
  );
  let reply = match downloader.download(url, &req.format).await {
    Ok(download) => Reply::success(download.into()),
    Err(e) => {
      warn!("download of {} failed: {}", url, e);
      Reply::failure(e.to_string())
    }
  };

  Ok(Json(reply))
}
