//! One [`SourceSearch`] adapter per source feed.
//!
//! Adapters only read their feed. Name rules come from
//! [`guestlink_core::normalize`]; a blank query name never matches by name,
//! so an arrival without a name cannot pull in every record of a source.

use std::sync::Arc;

use guestlink_core::{
  normalize::{self, DEFAULT_MAX_DISTANCE},
  source::{
    ConciergeRequest, EmailMention, FbMention, GuestQuery, HistoryRecord, IncidentReport,
    SourceKind, SourceRecord, SourceSearch, SpaBooking,
  },
};

use crate::{
  feed::Feed,
  raw::{Email, PmsDay},
};

/// Guest-field values that stand for "someone" rather than a named guest.
const PLACEHOLDER_GUESTS: &[&str] = &["walk-in", "in-house guest"];

/// Length of the body excerpt kept for an email hit, in characters.
const EMAIL_SNIPPET_CHARS: usize = 200;

fn is_placeholder(guest: &str) -> bool {
  let guest = guest.trim();
  PLACEHOLDER_GUESTS.iter().any(|p| guest.eq_ignore_ascii_case(p))
}

/// Whether a record's guest field names the queried guest.
fn guest_matches(query: &GuestQuery, guest: Option<&str>) -> bool {
  let Some(guest) = guest else { return false };
  if is_placeholder(guest) || normalize::normalize(&query.guest_name).is_empty() {
    return false;
  }
  normalize::names_equivalent(&query.guest_name, guest, DEFAULT_MAX_DISTANCE)
}

/// Whether `text` contains the query's last name, ignoring case.
fn mentions(last_name: &str, text: &str) -> bool {
  text.to_lowercase().contains(last_name)
}

fn records<T>(feed: &Feed<Vec<T>>) -> &[T] {
  feed.loaded().map(Vec::as_slice).unwrap_or_default()
}

// ─── Spa ─────────────────────────────────────────────────────────────────────

/// Matches spa bookings by guest name or by room.
pub struct SpaSearch {
  bookings: Arc<Feed<Vec<SpaBooking>>>,
}

impl SpaSearch {
  pub(crate) fn new(bookings: Arc<Feed<Vec<SpaBooking>>>) -> Self { Self { bookings } }
}

impl SourceSearch for SpaSearch {
  fn kind(&self) -> SourceKind { SourceKind::Spa }

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord> {
    records(&self.bookings)
      .iter()
      .filter(|b| {
        guest_matches(query, b.guest.as_deref()) || query.room_matches(b.room.as_deref())
      })
      .cloned()
      .map(SourceRecord::Spa)
      .collect()
  }
}

// ─── Concierge ───────────────────────────────────────────────────────────────

/// Matches concierge requests by guest name or by room.
pub struct ConciergeSearch {
  requests: Arc<Feed<Vec<ConciergeRequest>>>,
}

impl ConciergeSearch {
  pub(crate) fn new(requests: Arc<Feed<Vec<ConciergeRequest>>>) -> Self { Self { requests } }
}

impl SourceSearch for ConciergeSearch {
  fn kind(&self) -> SourceKind { SourceKind::Concierge }

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord> {
    records(&self.requests)
      .iter()
      .filter(|r| {
        guest_matches(query, r.guest.as_deref()) || query.room_matches(r.room.as_deref())
      })
      .cloned()
      .map(SourceRecord::Concierge)
      .collect()
  }
}

// ─── Incidents ───────────────────────────────────────────────────────────────

/// Matches incidents whose reporter or description mention the guest's last
/// name, or whose room is the guest's room.
pub struct IncidentSearch {
  incidents: Arc<Feed<Vec<IncidentReport>>>,
}

impl IncidentSearch {
  pub(crate) fn new(incidents: Arc<Feed<Vec<IncidentReport>>>) -> Self { Self { incidents } }
}

impl SourceSearch for IncidentSearch {
  fn kind(&self) -> SourceKind { SourceKind::Incidents }

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord> {
    let last_name = normalize::last_name(&query.guest_name);
    records(&self.incidents)
      .iter()
      .filter(|i| {
        let by_name = last_name
          .as_deref()
          .is_some_and(|n| mentions(n, &i.reported_by) || mentions(n, &i.description));
        by_name || query.room_matches(i.room.as_deref())
      })
      .cloned()
      .map(SourceRecord::Incident)
      .collect()
  }
}

// ─── Food & beverage ─────────────────────────────────────────────────────────

/// Matches meal-period notes mentioning the guest's last name.
///
/// The F&B export is aggregated per outlet, so notes are the only per-guest
/// signal. An empty result is normal.
pub struct FbSearch {
  notes: Arc<Feed<Vec<FbMention>>>,
}

impl FbSearch {
  pub(crate) fn new(notes: Arc<Feed<Vec<FbMention>>>) -> Self { Self { notes } }
}

impl SourceSearch for FbSearch {
  fn kind(&self) -> SourceKind { SourceKind::FoodBeverage }

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord> {
    let Some(last_name) = normalize::last_name(&query.guest_name) else {
      return Vec::new();
    };
    records(&self.notes)
      .iter()
      .filter(|n| mentions(&last_name, &n.notes))
      .cloned()
      .map(SourceRecord::FoodBeverage)
      .collect()
  }
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// Matches emails whose subject or body mention the guest's last name.
pub struct EmailSearch {
  emails: Arc<Feed<Vec<Email>>>,
}

impl EmailSearch {
  pub(crate) fn new(emails: Arc<Feed<Vec<Email>>>) -> Self { Self { emails } }
}

impl SourceSearch for EmailSearch {
  fn kind(&self) -> SourceKind { SourceKind::Email }

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord> {
    let Some(last_name) = normalize::last_name(&query.guest_name) else {
      return Vec::new();
    };
    records(&self.emails)
      .iter()
      .filter(|e| mentions(&last_name, &e.subject) || mentions(&last_name, &e.body))
      .map(|e| {
        SourceRecord::Email(EmailMention {
          date:    e.date.clone(),
          subject: e.subject.clone(),
          from:    e.from.clone(),
          snippet: e.body.chars().take(EMAIL_SNIPPET_CHARS).collect(),
        })
      })
      .collect()
  }
}

// ─── PMS history ─────────────────────────────────────────────────────────────

/// Re-scans PMS arrivals and departures on every date except the query's
/// reference date.
pub struct PmsHistorySearch {
  days: Arc<Feed<Vec<PmsDay>>>,
}

impl PmsHistorySearch {
  pub(crate) fn new(days: Arc<Feed<Vec<PmsDay>>>) -> Self { Self { days } }
}

impl SourceSearch for PmsHistorySearch {
  fn kind(&self) -> SourceKind { SourceKind::PmsHistory }

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord> {
    let mut found = Vec::new();
    for day in records(&self.days).iter().filter(|d| d.date != query.reference_date) {
      found.extend(
        day
          .arrivals
          .iter()
          .filter(|a| guest_matches(query, Some(a.guest_name.as_str())))
          .map(|a| SourceRecord::History(HistoryRecord::Stay(a.clone()))),
      );
      found.extend(
        day
          .departures
          .iter()
          .filter(|d| guest_matches(query, Some(d.guest_name.as_str())))
          .map(|d| SourceRecord::History(HistoryRecord::Departure(d.clone()))),
      );
    }
    found
  }
}
