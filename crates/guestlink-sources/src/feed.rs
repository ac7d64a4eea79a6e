//! [`Feed`]: a source's data, or the reason it is unavailable.
//!
//! A missing or unreadable feed is an expected condition, not an error: the
//! adapters over it simply find nothing.

use std::{io, path::Path};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Feed<T> {
  Loaded(T),
  Unavailable { reason: String },
}

impl<T> Feed<T> {
  /// Read the JSON file at `path` and convert it with `convert`.
  ///
  /// A missing file and an unparsable file both yield
  /// [`Feed::Unavailable`]; the latter is logged as a warning.
  pub fn load_with<R, F>(path: &Path, convert: F) -> Self
  where
    R: DeserializeOwned,
    F: FnOnce(R) -> T,
  {
    match read_json::<R>(path) {
      Ok(raw) => Self::Loaded(convert(raw)),
      Err(crate::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
        info!(path = %path.display(), "source feed not found");
        Self::Unavailable { reason: "not found".to_owned() }
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "source feed unreadable");
        Self::Unavailable { reason: e.to_string() }
      }
    }
  }

  pub fn loaded(&self) -> Option<&T> {
    match self {
      Self::Loaded(data) => Some(data),
      Self::Unavailable { .. } => None,
    }
  }

  pub fn is_available(&self) -> bool { matches!(self, Self::Loaded(_)) }
}

fn read_json<R: DeserializeOwned>(path: &Path) -> Result<R> {
  let raw = std::fs::read_to_string(path)?;
  Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let feed: Feed<Vec<u32>> = Feed::load_with(&dir.path().join("nope.json"), |v| v);
    assert_eq!(feed, Feed::Unavailable { reason: "not found".into() });
    assert!(feed.loaded().is_none());
  }

  #[test]
  fn malformed_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let feed: Feed<Vec<u32>> = Feed::load_with(&path, |v| v);
    assert!(!feed.is_available());
  }

  #[test]
  fn valid_file_is_converted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let feed = Feed::load_with(&path, |v: Vec<u32>| v.iter().sum::<u32>());
    assert_eq!(feed.loaded(), Some(&6));
  }
}
