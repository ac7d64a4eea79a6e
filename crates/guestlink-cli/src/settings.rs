//! Run settings: an optional TOML file layered under `GUESTLINK_*`
//! environment variables, with built-in defaults underneath both.

use std::path::{Path, PathBuf};

use guestlink_sources::matcher::DEFAULT_MAX_CONCURRENCY;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
  /// Directory holding the source feeds.
  pub data_dir:        PathBuf,
  pub store_path:      PathBuf,
  pub hotel_name:      String,
  pub currency:        String,
  pub max_concurrency: usize,
}

impl Settings {
  /// Load settings from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::builder(path)?
      .add_source(config::Environment::with_prefix("GUESTLINK"))
      .build()?
      .try_deserialize()
  }

  fn builder(
    path: &Path,
  ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    Ok(
      config::Config::builder()
        .set_default("data_dir", "mock-data")?
        .set_default("store_path", "profiles.db")?
        .set_default("hotel_name", "Hotel")?
        .set_default("currency", "€")?
        .set_default("max_concurrency", DEFAULT_MAX_CONCURRENCY as u64)?
        .add_source(config::File::from(path).required(false)),
    )
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
