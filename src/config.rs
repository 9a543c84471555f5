use std::{net::IpAddr, path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use http_types::Url;

use crate::downloader::DEFAULT_REDIRECT_BASE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DownloadStrategy {
  /// Download into the download directory
  Local,
  /// Only look up metadata and point at an external download service
  Deferred,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// Address to bind to
  #[arg(long, env = "VIDGRAB_HOST", default_value = "0.0.0.0")]
  pub host: IpAddr,

  #[arg(long, env = "VIDGRAB_PORT", default_value_t = 8080)]
  pub port: u16,

  /// Log at debug level
  #[arg(long, env = "VIDGRAB_DEBUG")]
  pub debug: bool,

  /// Emit logs as json lines
  #[arg(long, env = "VIDGRAB_LOG_JSON")]
  pub log_json: bool,

  /// Where downloads are written, defaults to the system temp directory
  #[arg(long, env = "VIDGRAB_DOWNLOAD_DIR")]
  pub download_dir: Option<PathBuf>,

  /// What /api/download does
  #[arg(
    long,
    env = "VIDGRAB_DOWNLOAD_STRATEGY",
    value_enum,
    default_value_t = DownloadStrategy::Local
  )]
  pub download_strategy: DownloadStrategy,

  /// External service the deferred strategy points clients at
  #[arg(
    long,
    env = "VIDGRAB_REDIRECT_BASE",
    default_value = DEFAULT_REDIRECT_BASE
  )]
  pub redirect_base: Url,

  #[arg(long, env = "YTDLP_PATH", default_value = "yt-dlp")]
  pub ytdlp_path: PathBuf,

  #[arg(long, env = "YTDLP_PROXY")]
  pub ytdlp_proxy: Option<String>,

  /// Maximum number of yt-dlp processes at a time, unbounded if unset
  #[arg(long, env = "YTDLP_CONCURRENCY")]
  pub ytdlp_concurrency: Option<usize>,

  /// Seconds before a yt-dlp invocation is killed, no limit if unset
  #[arg(long, env = "YTDLP_TIMEOUT")]
  pub ytdlp_timeout: Option<u64>,
}

impl Args {
  pub fn download_dir(&self) -> PathBuf {
    self
      .download_dir
      .clone()
      .unwrap_or_else(std::env::temp_dir)
  }

  pub fn ytdlp_timeout(&self) -> Option<Duration> {
    self.ytdlp_timeout.map(Duration::from_secs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let args = Args::try_parse_from(["vidgrab"]).unwrap();
    assert_eq!(args.port, 8080);
    assert_eq!(args.download_strategy, DownloadStrategy::Local);
    assert_eq!(args.redirect_base.as_str(), DEFAULT_REDIRECT_BASE);
    assert_eq!(args.ytdlp_path, PathBuf::from("yt-dlp"));
    assert_eq!(args.ytdlp_timeout(), None);
  }

  #[test]
  fn test_flags() {
    let args = Args::try_parse_from([
      "vidgrab",
      "--host",
      "127.0.0.1",
      "--port",
      "5000",
      "--debug",
      "--download-strategy",
      "deferred",
      "--download-dir",
      "/srv/media",
      "--ytdlp-timeout",
      "90",
    ])
    .unwrap();

    assert_eq!(args.host, "127.0.0.1".parse::<IpAddr>().unwrap());
    assert_eq!(args.port, 5000);
    assert!(args.debug);
    assert_eq!(args.download_strategy, DownloadStrategy::Deferred);
    assert_eq!(args.download_dir(), PathBuf::from("/srv/media"));
    assert_eq!(args.ytdlp_timeout(), Some(Duration::from_secs(90)));
  }

  #[test]
  fn test_env_fallback() {
    // no other test reads these two
    std::env::set_var("VIDGRAB_DOWNLOAD_DIR", "/srv/from-env");
    std::env::set_var("YTDLP_CONCURRENCY", "3");

    let args = Args::try_parse_from(["vidgrab"]).unwrap();
    assert_eq!(args.download_dir(), PathBuf::from("/srv/from-env"));
    assert_eq!(args.ytdlp_concurrency, Some(3));

    let args =
      Args::try_parse_from(["vidgrab", "--download-dir", "/srv/flag"]).unwrap();
    assert_eq!(args.download_dir(), PathBuf::from("/srv/flag"));

    std::env::remove_var("VIDGRAB_DOWNLOAD_DIR");
    std::env::remove_var("YTDLP_CONCURRENCY");
  }

  #[test]
  fn test_rejects_bad_redirect_base() {
    assert!(Args::try_parse_from(["vidgrab", "--redirect-base", "nope"]).is_err());
  }
}
