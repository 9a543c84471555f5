use http_types::Url;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Youtube,
  Facebook,
  Twitter,
  Instagram,
  Tiktok,
  Unknown,
}

// matched in order, first hit wins
pub const SUPPORTED_PLATFORMS: &[(Platform, &[&str])] = &[
  (Platform::Youtube, &["youtube.com", "youtu.be"]),
  (Platform::Facebook, &["facebook.com", "fb.watch"]),
  (Platform::Twitter, &["twitter.com", "x.com"]),
  (Platform::Instagram, &["instagram.com"]),
  (Platform::Tiktok, &["tiktok.com", "vm.tiktok.com"]),
];

impl Platform {
  pub fn as_str(&self) -> &'static str {
    match self {
      Platform::Youtube => "youtube",
      Platform::Facebook => "facebook",
      Platform::Twitter => "twitter",
      Platform::Instagram => "instagram",
      Platform::Tiktok => "tiktok",
      Platform::Unknown => "unknown",
    }
  }
}

/// Guess the hosting platform of a media url from its domain.
///
/// Anything that doesn't parse, or parses without a host, is `Unknown`.
pub fn classify(url: &str) -> Platform {
  let netloc = network_location(url);

  SUPPORTED_PLATFORMS
    .iter()
    .find(|(_, domains)| domains.iter().any(|d| netloc.contains(d)))
    .map(|(platform, _)| *platform)
    .unwrap_or(Platform::Unknown)
}

fn network_location(url: &str) -> String {
  let Ok(url) = url.parse::<Url>() else {
    return String::new();
  };

  let host = url.host_str().unwrap_or_default();
  match url.port() {
    Some(port) => format!("{host}:{port}").to_lowercase(),
    None => host.to_lowercase(),
  }
}
