//! Deterministic guest identity.
//!
//! There is no shared guest identifier across source systems, so the identity
//! is a short SHA-256 digest of the normalised name. It never depends on the
//! date, the room, or any stored state: the same spelling (after
//! normalisation) yields the same identity on every run.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Error, Result, normalize::normalize};

const PREFIX: &str = "GID-";
const HASH_CHARS: usize = 8;

/// Opaque, stable key for a guest profile, e.g. `GID-1a2b3c4d`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestIdentity(String);

impl GuestIdentity {
  /// Derive the identity for a raw guest name.
  pub fn for_name(name: &str) -> Self {
    let digest = Sha256::digest(normalize(name).as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_CHARS);
    Self(format!("{PREFIX}{hex}"))
  }

  /// Validate an identity typed by an operator.
  pub fn parse(s: &str) -> Result<Self> {
    let s = s.trim();
    match s.strip_prefix(PREFIX) {
      Some(h) if h.len() == HASH_CHARS && h.bytes().all(|b| b.is_ascii_hexdigit()) => {
        Ok(Self(format!("{PREFIX}{}", h.to_ascii_lowercase())))
      }
      _ => Err(Error::InvalidIdentity(s.to_owned())),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for GuestIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_ignores_case_and_honorifics() {
    let a = GuestIdentity::for_name("James Richardson");
    let b = GuestIdentity::for_name("  Mr. JAMES RICHARDSON");
    assert_eq!(a, b);
  }

  #[test]
  fn identity_has_expected_shape() {
    let id = GuestIdentity::for_name("Priya Kapoor");
    assert!(id.as_str().starts_with("GID-"));
    assert_eq!(id.as_str().len(), 12);
    assert_eq!(GuestIdentity::parse(id.as_str()).unwrap(), id);
  }

  #[test]
  fn different_names_yield_different_identities() {
    assert_ne!(
      GuestIdentity::for_name("James Richardson"),
      GuestIdentity::for_name("Priya Kapoor"),
    );
  }

  #[test]
  fn parse_rejects_malformed_identities() {
    for bad in ["", "GID-", "GID-123", "GID-zzzzzzzz", "XYZ-1a2b3c4d", "GID-1a2b3c4d5"] {
      assert!(GuestIdentity::parse(bad).is_err(), "{bad:?}");
    }
  }

  #[test]
  fn parse_canonicalises_hex_case() {
    let id = GuestIdentity::parse("GID-1A2B3C4D").unwrap();
    assert_eq!(id.as_str(), "GID-1a2b3c4d");
  }
}
