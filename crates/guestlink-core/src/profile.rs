//! The canonical guest profile and its parts.
//!
//! A profile is the durable aggregate of everything the hotel systems know
//! about one guest identity. Derived fields (`total_visits`, `first_visit`,
//! `spend.total`) are recomputed by the merger after every merge and never
//! trusted as carried state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Result, identity::GuestIdentity};

// ─── Visit ───────────────────────────────────────────────────────────────────

/// One stay. Visits are keyed by PMS confirmation number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
  pub checkin:      NaiveDate,
  pub room:         Option<String>,
  pub room_type:    Option<String>,
  pub rate:         f64,
  pub nights:       u32,
  pub confirmation: String,
  /// `checkin + nights`; absent when the stay length is unknown.
  pub checkout:     Option<NaiveDate>,
}

impl Visit {
  pub fn new(
    checkin: NaiveDate,
    room: Option<String>,
    room_type: Option<String>,
    rate: f64,
    nights: u32,
    confirmation: String,
  ) -> Self {
    let checkout = (nights > 0)
      .then(|| checkin.checked_add_days(chrono::Days::new(u64::from(nights))))
      .flatten();
    Self { checkin, room, room_type, rate, nights, confirmation, checkout }
  }

  pub fn room_spend(&self) -> f64 { self.rate * f64::from(self.nights) }
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// Preferences gathered from booking notes and departmental records.
///
/// The list fields behave as insertion-ordered sets; use [`push_unique`] to
/// add to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
  pub dietary:              Vec<String>,
  pub wines:                Vec<String>,
  pub room_type:            Option<String>,
  pub pillow_type:          Option<String>,
  pub spa_treatments:       Vec<String>,
  pub preferred_therapists: Vec<String>,
  pub special_requests:     Vec<String>,
}

// ─── Spend ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendHistory {
  pub rooms:     f64,
  pub fb:        f64,
  pub spa:       f64,
  pub concierge: f64,
  pub other:     f64,
  /// Always the sum of the components; see [`SpendHistory::finalize`].
  pub total:     f64,
}

impl SpendHistory {
  pub fn component_sum(&self) -> f64 {
    self.rooms + self.fb + self.spa + self.concierge + self.other
  }

  /// Recompute `total` from the components.
  pub fn finalize(&mut self) { self.total = self.component_sum(); }
}

// ─── Incidents and concierge ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub id:          String,
  pub date:        NaiveDate,
  pub category:    String,
  pub description: String,
  pub resolution:  Option<String>,
  pub resolved:    bool,
  pub priority:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConciergeEntry {
  pub id:      String,
  pub date:    NaiveDate,
  pub kind:    String,
  pub details: String,
  pub status:  String,
}

// ─── GuestProfile ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestProfile {
  pub guest_id:          GuestIdentity,
  /// Every spelling of the guest's name seen so far; the first is the
  /// display name.
  pub names:             Vec<String>,
  pub nationality:       Option<String>,
  pub vip_level:         Option<String>,
  pub visits:            Vec<Visit>,
  pub preferences:       Preferences,
  pub spend_history:     SpendHistory,
  pub incidents:         Vec<Incident>,
  pub concierge_history: Vec<ConciergeEntry>,
  pub special_occasions: Vec<String>,
  pub notes:             Vec<String>,
  pub first_visit:       Option<NaiveDate>,
  pub total_visits:      usize,
  pub last_updated:      Option<NaiveDate>,
}

impl GuestProfile {
  /// An empty profile: all counters zero, all collections empty.
  pub fn empty(guest_id: GuestIdentity, name: &str) -> Self {
    Self {
      guest_id,
      names: vec![name.to_owned()],
      nationality: None,
      vip_level: None,
      visits: Vec::new(),
      preferences: Preferences::default(),
      spend_history: SpendHistory::default(),
      incidents: Vec::new(),
      concierge_history: Vec::new(),
      special_occasions: Vec::new(),
      notes: Vec::new(),
      first_visit: None,
      total_visits: 0,
      last_updated: None,
    }
  }

  pub fn display_name(&self) -> &str {
    self.names.first().map(String::as_str).unwrap_or("Unknown")
  }

  /// The most recently merged visit, i.e. the current stay.
  pub fn current_visit(&self) -> Option<&Visit> { self.visits.first() }

  pub fn is_returning(&self) -> bool { self.total_visits > 1 }

  pub fn has_visit(&self, confirmation: &str) -> bool {
    self.visits.iter().any(|v| v.confirmation == confirmation)
  }

  pub fn has_incident(&self, id: &str) -> bool {
    self.incidents.iter().any(|i| i.id == id)
  }

  pub fn has_concierge_entry(&self, id: &str) -> bool {
    self.concierge_history.iter().any(|c| c.id == id)
  }

  /// Serialise the whole profile as a JSON document.
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

  pub fn summary(&self) -> ProfileSummary {
    ProfileSummary {
      guest_id:     self.guest_id.clone(),
      names:        self.names.clone(),
      total_visits: self.total_visits,
      last_updated: self.last_updated,
    }
  }
}

/// The listing view of a stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
  pub guest_id:     GuestIdentity,
  pub names:        Vec<String>,
  pub total_visits: usize,
  pub last_updated: Option<NaiveDate>,
}

/// Append `value` unless an equal entry is already present. Returns whether
/// it was added.
pub fn push_unique(list: &mut Vec<String>, value: impl Into<String>) -> bool {
  let value = value.into();
  if list.contains(&value) {
    false
  } else {
    list.push(value);
    true
  }
}
