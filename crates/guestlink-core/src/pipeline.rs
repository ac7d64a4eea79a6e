//! Batch step: merge every match of a run and persist the result.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
  identity::GuestIdentity, matching::MatchResult, merge::build_profile,
  profile::GuestProfile, store::ProfileStore,
};

/// Build, save and return one profile per match, in match order.
///
/// Saves run sequentially, which keeps at most one writer per identity.
/// Two arrivals whose names normalise identically share an identity; that
/// collision is logged but not resolved, and the later arrival's profile is
/// the one left in the store.
pub async fn build_profiles<S: ProfileStore>(
  store: &S,
  matches: &[MatchResult],
  reference_date: NaiveDate,
) -> Result<Vec<GuestProfile>, S::Error> {
  let mut seen: HashMap<GuestIdentity, &str> = HashMap::new();
  let mut profiles = Vec::with_capacity(matches.len());

  for m in matches {
    let profile = build_profile(m, reference_date);
    if let Some(previous) = seen.insert(profile.guest_id.clone(), &m.guest_name) {
      warn!(
        guest_id = %profile.guest_id,
        first = previous,
        second = %m.guest_name,
        "two arrivals resolve to the same identity",
      );
    }
    store.save(&profile).await?;
    debug!(guest_id = %profile.guest_id, visits = profile.total_visits, "profile saved");
    profiles.push(profile);
  }

  Ok(profiles)
}
