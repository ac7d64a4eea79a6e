//! Error type for `guestlink-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] guestlink_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored row exists but its profile document cannot be read.
  #[error("stored profile {guest_id} is malformed: {source}")]
  Decode {
    guest_id: String,
    #[source]
    source:   guestlink_core::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
