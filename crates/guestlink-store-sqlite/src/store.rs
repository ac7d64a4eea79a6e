//! [`SqliteStore`]: the SQLite implementation of [`ProfileStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::{debug, warn};

use guestlink_core::{
  GuestIdentity,
  profile::{GuestProfile, ProfileSummary},
  store::ProfileStore,
};

use crate::{
  Result,
  encode::{ProfileRow, RawProfile},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A guest profile store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    debug!(path = %path.display(), "profile store opened");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every stored profile document, ordered by identity. Rows that fail to
  /// decode are logged and left out.
  async fn load_all(&self) -> Result<Vec<GuestProfile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT guest_id, profile_json FROM profiles ORDER BY guest_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProfile {
              guest_id:     row.get(0)?,
              profile_json: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().filter_map(|raw| skip_malformed(raw.into_profile())).collect())
  }
}

/// Keep decodable rows; log and drop the rest.
fn skip_malformed<T>(decoded: Result<T>) -> Option<T> {
  decoded
    .inspect_err(|e| warn!(error = %e, "skipping malformed stored profile"))
    .ok()
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = crate::Error;

  async fn save(&self, profile: &GuestProfile) -> Result<()> {
    let row = ProfileRow::from_profile(profile)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             guest_id, display_name, names_json, profile_json, total_visits, last_updated
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(guest_id) DO UPDATE SET
             display_name = excluded.display_name,
             names_json   = excluded.names_json,
             profile_json = excluded.profile_json,
             total_visits = excluded.total_visits,
             last_updated = excluded.last_updated",
          rusqlite::params![
            row.guest_id,
            row.display_name,
            row.names_json,
            row.profile_json,
            row.total_visits,
            row.last_updated,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn load(&self, id: &GuestIdentity) -> Result<Option<GuestProfile>> {
    let id_str = id.as_str().to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT guest_id, profile_json FROM profiles WHERE guest_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawProfile {
                  guest_id:     row.get(0)?,
                  profile_json: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_all(&self) -> Result<Vec<ProfileSummary>> {
    let profiles = self.load_all().await?;
    Ok(profiles.iter().map(GuestProfile::summary).collect())
  }

  async fn search_by_name(&self, needle: &str) -> Result<Vec<GuestProfile>> {
    let needle = needle.trim().to_lowercase();
    let mut profiles = self.load_all().await?;
    profiles.retain(|p| p.names.iter().any(|n| n.to_lowercase().contains(&needle)));
    Ok(profiles)
  }

  async fn delete(&self, id: &GuestIdentity) -> Result<bool> {
    let id_str = id.as_str().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM profiles WHERE guest_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn clear_all(&self) -> Result<usize> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM profiles", [])?))
      .await?;
    Ok(removed)
  }
}
