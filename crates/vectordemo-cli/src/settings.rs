//! Layered settings: defaults, then an optional TOML file, then
//! `VECTORDEMO_*` environment variables. Command-line flags are applied on
//! top by the caller.

use std::{path::Path, path::PathBuf, time::Duration};

use anyhow::{Context as _, Result};
use serde::Deserialize;
use vectordemo_client::{ClientConfig, config::DEFAULT_BASE_URL};

/// Used when `--config` is not given; missing is fine.
const DEFAULT_CONFIG_FILE: &str = "vectordemo.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub base_url:     String,
  pub storage_path: PathBuf,
  /// Seed for the CSRF header until the server sets a cookie.
  pub csrf_token:   Option<String>,
  pub timeout_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL.to_owned(),
      storage_path: PathBuf::from("~/.local/share/vectordemo/session.db"),
      csrf_token:   None,
      timeout_secs: 30,
    }
  }
}

impl Settings {
  /// An explicit `path` must exist.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let file = match path {
      Some(p) => config::File::from(p).required(true),
      None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    config::Config::builder()
      .add_source(file)
      .add_source(config::Environment::with_prefix("VECTORDEMO"))
      .build()
      .context("failed to read config")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }
}
