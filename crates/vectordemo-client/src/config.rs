//! Connection settings.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Server origin; `/api` is appended.
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.to_owned(), timeout: DEFAULT_TIMEOUT }
  }
}

impl ClientConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self { base_url: base_url.into(), ..Self::default() }
  }

  /// `<base_url>/api`, without a trailing slash on the origin.
  pub fn api_root(&self) -> String { format!("{}/api", self.base_url.trim_end_matches('/')) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn api_root_strips_trailing_slash() {
    assert_eq!(ClientConfig::new("http://h:1/").api_root(), "http://h:1/api");
    assert_eq!(ClientConfig::default().api_root(), "http://localhost:8000/api");
  }
}
