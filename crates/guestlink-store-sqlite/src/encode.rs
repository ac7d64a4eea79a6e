//! Encoding and decoding helpers between profiles and `profiles` rows.
//!
//! Dates are stored as ISO 8601 (`YYYY-MM-DD`) strings, name lists and the
//! profile document as compact JSON.

use chrono::NaiveDate;
use guestlink_core::profile::GuestProfile;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn encode_names(names: &[String]) -> Result<String> { Ok(serde_json::to_string(names)?) }

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Column values written by a save.
pub struct ProfileRow {
  pub guest_id:     String,
  pub display_name: String,
  pub names_json:   String,
  pub profile_json: String,
  pub total_visits: i64,
  pub last_updated: Option<String>,
}

impl ProfileRow {
  pub fn from_profile(profile: &GuestProfile) -> Result<Self> {
    Ok(Self {
      guest_id:     profile.guest_id.as_str().to_owned(),
      display_name: profile.display_name().to_owned(),
      names_json:   encode_names(&profile.names)?,
      profile_json: profile.to_json()?,
      total_visits: i64::try_from(profile.total_visits).unwrap_or(i64::MAX),
      last_updated: profile.last_updated.map(encode_date),
    })
  }
}

/// Raw strings read from the `guest_id` and `profile_json` columns.
pub struct RawProfile {
  pub guest_id:     String,
  pub profile_json: String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<GuestProfile> {
    GuestProfile::from_json(&self.profile_json)
      .map_err(|source| Error::Decode { guest_id: self.guest_id, source })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_format() {
    let d = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
    assert_eq!(encode_date(d), "2026-02-03");
  }

  #[test]
  fn malformed_document_reports_its_identity() {
    let raw = RawProfile { guest_id: "GID-00000000".into(), profile_json: "{".into() };
    match raw.into_profile() {
      Err(Error::Decode { guest_id, .. }) => assert_eq!(guest_id, "GID-00000000"),
      other => panic!("expected a decode error, got {other:?}"),
    }
  }
}
