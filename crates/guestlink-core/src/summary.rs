//! Arrival flags and the plain-text arrival summary.
//!
//! Both are deterministic functions of a profile. They feed the dry-run
//! output of the resolve command and give brief writers a compact list of
//! things staff should act on.

use crate::profile::GuestProfile;

/// Lifetime spend above which a guest is flagged `high_value`.
pub const HIGH_VALUE_SPEND: f64 = 20_000.0;

/// Visit count from which a guest is flagged `loyal_guest`.
pub const LOYAL_VISITS: usize = 3;

const INCIDENT_PREVIEW_CHARS: usize = 80;

/// Actionable flags for an arriving guest, e.g. `first_visit`,
/// `vip_gold`, `dietary_vegan`, `unresolved_incident`.
pub fn arrival_flags(profile: &GuestProfile) -> Vec<String> {
  let mut flags = Vec::new();

  if profile.total_visits <= 1 {
    flags.push("first_visit".to_owned());
  }
  if profile.total_visits >= LOYAL_VISITS {
    flags.push("loyal_guest".to_owned());
  }
  if let Some(vip) = &profile.vip_level {
    flags.push(format!("vip_{vip}"));
  }
  flags.extend(profile.preferences.dietary.iter().map(|d| format!("dietary_{d}")));
  if profile.incidents.iter().any(|i| !i.resolved) {
    flags.push("unresolved_incident".to_owned());
  }
  if profile.spend_history.total > HIGH_VALUE_SPEND {
    flags.push("high_value".to_owned());
  }
  if !profile.special_occasions.is_empty() {
    flags.push("special_occasion".to_owned());
  }

  flags
}

/// A short multi-line summary of the guest for front-office staff.
pub fn arrival_summary(profile: &GuestProfile, currency: &str) -> String {
  let current = profile.current_visit();
  let marker = if profile.vip_level.is_some() {
    "[VIP]"
  } else if profile.is_returning() {
    "[RETURNING]"
  } else {
    "[NEW]"
  };

  let room = current.and_then(|v| v.room.as_deref()).unwrap_or("?");
  let room_type = current.and_then(|v| v.room_type.as_deref()).unwrap_or("?");
  let nights = current.map_or_else(|| "?".to_owned(), |v| v.nights.to_string());
  let nationality = profile.nationality.as_deref().unwrap_or("?");

  let mut lines = vec![format!(
    "{marker} {} | Room {room} ({room_type}) | {nights} nights | {nationality}",
    profile.display_name(),
  )];

  if let Some(vip) = &profile.vip_level {
    lines.push(format!("   VIP level: {vip}"));
  }
  if profile.is_returning() {
    lines.push(format!("   Returning guest, visit #{}", profile.total_visits));
  }
  if !profile.preferences.dietary.is_empty() {
    lines.push(format!("   Dietary: {}", profile.preferences.dietary.join(", ")));
  }
  if !profile.preferences.spa_treatments.is_empty() {
    lines.push(format!("   Spa: {}", profile.preferences.spa_treatments.join(", ")));
  }
  if let Some(latest) = profile.incidents.last() {
    let preview: String = latest.description.chars().take(INCIDENT_PREVIEW_CHARS).collect();
    lines.push(format!("   Past issue: {preview}"));
  }
  if profile.spend_history.total > 0.0 {
    lines.push(format!("   Lifetime spend: {currency}{:.0}", profile.spend_history.total));
  }

  lines.join("\n")
}
