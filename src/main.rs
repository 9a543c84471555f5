use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
  headers::ContentType,
  response::IntoResponse,
  routing::{get, post},
  Json, Router, TypedHeader,
};
use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod api;
mod config;
mod downloader;
mod error;
mod extractor;
mod platform;
mod util;

pub use error::{Error, Result};

use api::AppState;
use config::{Args, DownloadStrategy};
use downloader::{DeferredDownloader, Downloader, LocalDownloader};
use extractor::{Extractor, Ytdlp};

pub const SERVICE_NAME: &str = "VidGrab Pro API";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  init_tracing(&args);

  let ytdlp = Ytdlp::new(&args.ytdlp_path)
    .proxy(args.ytdlp_proxy.clone())
    .concurrency(args.ytdlp_concurrency)
    .timeout(args.ytdlp_timeout());
  if ytdlp.version().await.is_none() {
    warn!("requests will fail until yt-dlp is installed");
  }

  let app = router(app_state(&args, Arc::new(ytdlp)));
  let addr = SocketAddr::new(args.host, args.port);
  info!("Listening on http://{}", addr);

  axum::Server::try_bind(&addr)
    .with_context(|| format!("binding to {}", addr))?
    .serve(app.into_make_service())
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("running server")?;

  Ok(())
}

fn init_tracing(args: &Args) {
  let level = if args.debug {
    LevelFilter::DEBUG
  } else {
    LevelFilter::INFO
  };
  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  if args.log_json {
    tracing_subscriber::fmt()
      .json()
      .with_env_filter(env_filter)
      .init();
  } else {
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
  }
}

fn app_state(args: &Args, extractor: Arc<dyn Extractor>) -> AppState {
  let download_dir = args.download_dir();
  info!("downloads go to {}", download_dir.display());

  let local: Arc<dyn Downloader> =
    Arc::new(LocalDownloader::new(extractor.clone(), download_dir));
  let downloader: Arc<dyn Downloader> = match args.download_strategy {
    DownloadStrategy::Local => local.clone(),
    DownloadStrategy::Deferred => Arc::new(DeferredDownloader::new(
      extractor.clone(),
      args.redirect_base.clone(),
    )),
  };

  AppState {
    extractor,
    downloader,
    direct_downloader: local,
  }
}

fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(homepage))
    .route("/health", get(health))
    .route("/api/info", post(api::video_info))
    .route("/api/download", post(api::download))
    .route("/api/direct-download", post(api::direct_download))
    .with_state(state)
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!("failed to listen for ctrl-c: {}", e);
  }
  info!("shutting down");
}

pub const HOMEPAGE_HTML: &str = include_str!("../html/index.html");

async fn homepage() -> impl IntoResponse {
  (
    TypedHeader::<ContentType>(ContentType::html()),
    HOMEPAGE_HTML,
  )
}

async fn health() -> Json<Value> {
  Json(json!({
    "status": "healthy",
    "service": SERVICE_NAME,
  }))
}
