//! Error type for `guestlink-sources`.
//!
//! These errors never escape a search: [`Feed`](crate::Feed) turns them into
//! an unavailable source.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
