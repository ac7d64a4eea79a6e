//! The per-arrival bundle of cross-system records.

use serde::Serialize;

use crate::source::{
  Arrival, ConciergeRequest, EmailMention, FbMention, HistoryRecord, IncidentReport,
  SourceKind, SourceRecord, SpaBooking,
};

/// All records found for one arriving guest in one resolution run.
///
/// Created by the matcher, consumed by the merger, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
  pub guest_name:  String,
  pub room:        Option<String>,
  pub nationality: Option<String>,
  pub vip:         Option<String>,
  pub arrival:     Arrival,
  pub spa:         Vec<SpaBooking>,
  pub fb:          Vec<FbMention>,
  pub incidents:   Vec<IncidentReport>,
  pub concierge:   Vec<ConciergeRequest>,
  pub emails:      Vec<EmailMention>,
  pub history:     Vec<HistoryRecord>,
}

impl MatchResult {
  /// A result with no corroborating records yet.
  pub fn for_arrival(arrival: Arrival) -> Self {
    Self {
      guest_name: arrival.guest_name.clone(),
      room: arrival.room.clone(),
      nationality: arrival.nationality.clone(),
      vip: arrival.vip.clone(),
      arrival,
      spa: Vec::new(),
      fb: Vec::new(),
      incidents: Vec::new(),
      concierge: Vec::new(),
      emails: Vec::new(),
      history: Vec::new(),
    }
  }

  /// File a record under the list for its source.
  pub fn absorb(&mut self, record: SourceRecord) {
    match record {
      SourceRecord::Spa(r) => self.spa.push(r),
      SourceRecord::FoodBeverage(r) => self.fb.push(r),
      SourceRecord::Incident(r) => self.incidents.push(r),
      SourceRecord::Concierge(r) => self.concierge.push(r),
      SourceRecord::Email(r) => self.emails.push(r),
      SourceRecord::History(r) => self.history.push(r),
    }
  }

  pub fn count(&self, kind: SourceKind) -> usize {
    match kind {
      SourceKind::Spa => self.spa.len(),
      SourceKind::FoodBeverage => self.fb.len(),
      SourceKind::Incidents => self.incidents.len(),
      SourceKind::Concierge => self.concierge.len(),
      SourceKind::Email => self.emails.len(),
      SourceKind::PmsHistory => self.history.len(),
    }
  }

  /// Non-zero hit counts per source, in a fixed source order.
  pub fn cross_references(&self) -> Vec<(SourceKind, usize)> {
    use strum::IntoEnumIterator as _;
    SourceKind::iter()
      .map(|kind| (kind, self.count(kind)))
      .filter(|(_, n)| *n > 0)
      .collect()
  }
}
