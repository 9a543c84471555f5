use rand::Rng;

/// Render a duration as `MM:SS`, or `HH:MM:SS` once it reaches an hour.
pub fn format_duration(seconds: Option<f64>) -> String {
  let secs = match seconds {
    // fractional seconds are dropped, never rounded
    Some(s) if s >= 1.0 => s as u64,
    _ => return "00:00".to_string(),
  };

  let hours = secs / 3600;
  let minutes = (secs % 3600) / 60;
  let seconds = secs % 60;

  if hours > 0 {
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
  } else {
    format!("{:02}:{:02}", minutes, seconds)
  }
}

/// Abbreviate a view count with a `K` or `M` suffix.
pub fn format_views(views: Option<u64>) -> String {
  match views.unwrap_or_default() {
    0 => "0".to_string(),
    n if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
    n if n >= 1_000 => format!("{:.1}K", n as f64 / 1_000.0),
    n => n.to_string(),
  }
}

pub fn request_id() -> String {
  format!("{:016x}", rand::thread_rng().gen::<u64>())
}
