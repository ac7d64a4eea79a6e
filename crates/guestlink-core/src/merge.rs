//! Folding a [`MatchResult`] into a canonical [`GuestProfile`].
//!
//! The merge is a full rebuild: every call starts from an empty profile and
//! replays the current match data, so re-scanning the same sources never
//! double-counts spend. Natural keys (confirmation number, incident id,
//! concierge request id) keep the lists duplicate-free even when a source
//! reports the same record twice.

use chrono::NaiveDate;
use tracing::trace;

use crate::{
  identity::GuestIdentity,
  matching::MatchResult,
  profile::{ConciergeEntry, GuestProfile, Incident, Visit, push_unique},
  source::{
    Arrival, ConciergeRequest, EmailMention, FbMention, HistoryRecord, IncidentReport,
    SpaBooking,
  },
};

/// Dietary tags recognised in PMS booking notes.
const ARRIVAL_DIETARY: &[&str] = &["vegetarian", "vegan", "halal", "kosher"];

/// Dietary tags recognised in concierge request details.
const CONCIERGE_DIETARY: &[&str] = &["vegetarian", "no shellfish"];

const SPECIAL_REQUEST: &str = "special_request";

/// Build the profile for one matched arrival.
///
/// Pure and idempotent: the same inputs always produce the same profile.
pub fn build_profile(m: &MatchResult, reference_date: NaiveDate) -> GuestProfile {
  let guest_id = GuestIdentity::for_name(&m.guest_name);
  let mut profile = GuestProfile::empty(guest_id, &m.guest_name);

  merge_arrival(&mut profile, &m.arrival);
  merge_history(&mut profile, &m.history);
  merge_spa(&mut profile, &m.spa);
  merge_fb(&mut profile, &m.fb);
  merge_incidents(&mut profile, &m.incidents);
  merge_concierge(&mut profile, &m.concierge);
  merge_emails(&mut profile, &m.emails);

  finalize(&mut profile, reference_date);
  profile
}

/// Recompute every derived field.
fn finalize(profile: &mut GuestProfile, reference_date: NaiveDate) {
  profile.total_visits = profile.visits.len();
  profile.first_visit = profile.visits.iter().map(|v| v.checkin).min();
  profile.last_updated = Some(reference_date);
  profile.spend_history.finalize();
}

fn add_visit(profile: &mut GuestProfile, visit: Visit) {
  if !visit.confirmation.is_empty() && !profile.has_visit(&visit.confirmation) {
    profile.visits.push(visit);
  }
}

fn non_empty(value: &Option<String>) -> Option<String> {
  value.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

// ─── PMS ─────────────────────────────────────────────────────────────────────

fn merge_arrival(profile: &mut GuestProfile, arrival: &Arrival) {
  if !arrival.guest_name.is_empty() {
    push_unique(&mut profile.names, arrival.guest_name.as_str());
  }
  if let Some(nationality) = non_empty(&arrival.nationality) {
    profile.nationality = Some(nationality);
  }
  if let Some(vip) = non_empty(&arrival.vip) {
    profile.vip_level = Some(vip);
  }

  let visit = Visit::new(
    arrival.checkin,
    arrival.room.clone(),
    arrival.room_type.clone(),
    arrival.rate,
    arrival.nights,
    arrival.confirmation.clone(),
  );
  let room_spend = visit.room_spend();
  add_visit(profile, visit);

  if let Some(room_type) = non_empty(&arrival.room_type) {
    profile.preferences.room_type = Some(room_type);
  }

  let notes = arrival.notes.trim();
  if !notes.is_empty() {
    let lower = notes.to_lowercase();
    for tag in ARRIVAL_DIETARY {
      if lower.contains(tag) {
        push_unique(&mut profile.preferences.dietary, *tag);
      }
    }
    if lower.contains("allerg") && lower.contains("feather") {
      profile.preferences.pillow_type = Some("hypoallergenic".to_owned());
    }
    push_unique(&mut profile.notes, notes);
  }

  profile.spend_history.rooms += room_spend;
}

fn merge_history(profile: &mut GuestProfile, history: &[HistoryRecord]) {
  for record in history {
    match record {
      HistoryRecord::Stay(stay) => {
        add_visit(
          profile,
          Visit::new(
            stay.checkin,
            stay.room.clone(),
            stay.room_type.clone(),
            stay.rate,
            stay.nights,
            stay.confirmation.clone(),
          ),
        );
        if let Some(vip) = non_empty(&stay.vip) {
          profile.vip_level = Some(vip);
        }
      }
      // Folio totals are cumulative per stay and overlap room spend, so
      // they are not added to the profile.
      HistoryRecord::Departure(departure) => {
        trace!(date = %departure.date, total = departure.total_spend, "skipping departure folio");
      }
    }
  }
}

// ─── Departments ─────────────────────────────────────────────────────────────

fn merge_spa(profile: &mut GuestProfile, bookings: &[SpaBooking]) {
  for booking in bookings.iter().filter(|b| b.is_completed()) {
    profile.spend_history.spa += booking.revenue;
    if !booking.treatment.is_empty() {
      push_unique(&mut profile.preferences.spa_treatments, booking.treatment.as_str());
    }
    for therapist in booking.therapists.iter().filter(|t| !t.is_empty()) {
      push_unique(&mut profile.preferences.preferred_therapists, therapist.as_str());
    }
  }
}

fn merge_fb(profile: &mut GuestProfile, mentions: &[FbMention]) {
  for mention in mentions.iter().filter(|m| !m.notes.is_empty()) {
    push_unique(&mut profile.notes, format!("F&B: {}", mention.notes));
  }
}

fn merge_incidents(profile: &mut GuestProfile, reports: &[IncidentReport]) {
  for report in reports {
    if profile.has_incident(&report.id) {
      continue;
    }
    profile.incidents.push(Incident {
      id:          report.id.clone(),
      date:        report.date,
      category:    report.category.clone(),
      description: report.description.clone(),
      resolution:  report.resolution.clone(),
      resolved:    report.status == "resolved",
      priority:    report.priority.clone(),
    });
  }
}

fn merge_concierge(profile: &mut GuestProfile, requests: &[ConciergeRequest]) {
  for request in requests {
    if profile.has_concierge_entry(&request.id) {
      continue;
    }
    profile.concierge_history.push(ConciergeEntry {
      id:      request.id.clone(),
      date:    request.date,
      kind:    request.kind.clone(),
      details: request.details.clone(),
      status:  request.status.clone(),
    });
    profile.spend_history.concierge += request.cost.unwrap_or(0.0);

    let details = request.details.to_lowercase();
    if details.contains("birthday") {
      push_unique(
        &mut profile.special_occasions,
        format!("Birthday mentioned ({})", request.date),
      );
    }
    if details.contains("anniversar") {
      push_unique(
        &mut profile.special_occasions,
        format!("Anniversary mentioned ({})", request.date),
      );
    }
    for tag in CONCIERGE_DIETARY {
      if details.contains(tag) {
        push_unique(&mut profile.preferences.dietary, *tag);
      }
    }

    if request.kind == SPECIAL_REQUEST && !request.details.is_empty() {
      push_unique(&mut profile.preferences.special_requests, request.details.as_str());
    }
  }
}

fn merge_emails(profile: &mut GuestProfile, mentions: &[EmailMention]) {
  for mention in mentions {
    push_unique(
      &mut profile.notes,
      format!("Email mention: {} (from {})", mention.subject, mention.from),
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::Departure;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn arrival(name: &str, room: &str, confirmation: &str) -> Arrival {
    Arrival {
      guest_name:   name.into(),
      room:         Some(room.into()),
      nationality:  Some("GB".into()),
      vip:          None,
      checkin:      date("2026-02-13"),
      room_type:    Some("Villa".into()),
      rate:         2000.0,
      nights:       5,
      confirmation: confirmation.into(),
      notes:        String::new(),
    }
  }

  fn spa(name: &str, treatment: &str, status: &str, revenue: f64) -> SpaBooking {
    SpaBooking {
      date:       date("2026-02-13"),
      guest:      Some(name.into()),
      room:       None,
      treatment:  treatment.into(),
      therapists: vec!["Marie".into()],
      status:     status.into(),
      revenue,
    }
  }

  fn incident(id: &str, status: &str) -> IncidentReport {
    IncidentReport {
      id:          id.into(),
      date:        date("2026-02-10"),
      category:    "maintenance".into(),
      description: "AC noisy".into(),
      resolution:  None,
      status:      status.into(),
      priority:    "high".into(),
      reported_by: "Housekeeping".into(),
      room:        Some("V04".into()),
    }
  }

  fn concierge(id: &str, kind: &str, details: &str, cost: Option<f64>) -> ConciergeRequest {
    ConciergeRequest {
      id: id.into(),
      date: date("2026-02-14"),
      kind: kind.into(),
      details: details.into(),
      status: "confirmed".into(),
      guest: None,
      room: Some("V04".into()),
      cost,
    }
  }

  fn richardson() -> MatchResult {
    let mut m = MatchResult::for_arrival(arrival("James Richardson", "V04", "C-1001"));
    m.spa.push(spa("James Richardson", "Deep Tissue", "completed", 320.0));
    m.incidents.push(incident("INC-5", "open"));
    m
  }

  #[test]
  fn end_to_end_richardson() {
    let profile = build_profile(&richardson(), date("2026-02-13"));

    assert_eq!(profile.visits.len(), 1);
    assert_eq!(profile.visits[0].confirmation, "C-1001");
    assert_eq!(profile.visits[0].checkout, Some(date("2026-02-18")));
    assert_eq!(profile.spend_history.spa, 320.0);
    assert_eq!(profile.spend_history.rooms, 10000.0);
    assert_eq!(profile.spend_history.total, 10320.0);
    assert_eq!(profile.preferences.spa_treatments, vec!["Deep Tissue".to_string()]);
    assert_eq!(profile.incidents.len(), 1);
    assert!(!profile.incidents[0].resolved);
    assert_eq!(profile.total_visits, 1);
    assert_eq!(profile.first_visit, Some(date("2026-02-13")));
    assert_eq!(profile.last_updated, Some(date("2026-02-13")));
    assert_eq!(profile.guest_id, GuestIdentity::for_name("James Richardson"));
  }

  #[test]
  fn build_is_idempotent() {
    let m = richardson();
    let a = build_profile(&m, date("2026-02-13"));
    let b = build_profile(&m, date("2026-02-13"));
    assert_eq!(a, b);
  }

  #[test]
  fn duplicate_source_records_collapse_by_natural_key() {
    let mut m = richardson();
    m.incidents.push(incident("INC-5", "open"));
    m.concierge.push(concierge("REQ-1", "restaurant", "Table for two", Some(50.0)));
    m.concierge.push(concierge("REQ-1", "restaurant", "Table for two", Some(50.0)));
    m.history.push(HistoryRecord::Stay(arrival("James Richardson", "V04", "C-1001")));

    let profile = build_profile(&m, date("2026-02-13"));
    assert_eq!(profile.visits.len(), 1);
    assert_eq!(profile.incidents.len(), 1);
    assert_eq!(profile.concierge_history.len(), 1);
    assert_eq!(profile.spend_history.concierge, 50.0);
  }

  #[test]
  fn arrival_without_corroboration_yields_valid_profile() {
    let m = MatchResult::for_arrival(arrival("Ana Lima", "12", "C-2"));
    let profile = build_profile(&m, date("2026-02-13"));

    assert_eq!(profile.total_visits, 1);
    assert!(profile.preferences.dietary.is_empty());
    assert!(profile.preferences.spa_treatments.is_empty());
    assert!(profile.incidents.is_empty());
    assert!(profile.concierge_history.is_empty());
    assert_eq!(profile.spend_history.total, profile.spend_history.component_sum());
  }

  #[test]
  fn history_adds_past_visits_and_ignores_departure_spend() {
    let mut m = richardson();
    let mut past = arrival("James Richardson", "V02", "C-0900");
    past.checkin = date("2025-12-20");
    past.vip = Some("VIP2".into());
    m.history.push(HistoryRecord::Stay(past));
    m.history.push(HistoryRecord::Departure(Departure {
      date:        date("2025-12-27"),
      guest_name:  "James Richardson".into(),
      room:        Some("V02".into()),
      total_spend: 31000.0,
    }));

    let profile = build_profile(&m, date("2026-02-13"));
    assert_eq!(profile.total_visits, 2);
    assert_eq!(profile.first_visit, Some(date("2025-12-20")));
    assert_eq!(profile.vip_level.as_deref(), Some("VIP2"));
    assert_eq!(profile.spend_history.total, 10320.0);
  }

  #[test]
  fn arrival_notes_drive_dietary_and_pillow() {
    let mut a = arrival("Priya Kapoor", "21", "C-3");
    a.notes = "Strict VEGETARIAN. Allergic to feather pillows. Halal kitchen".into();
    let profile = build_profile(&MatchResult::for_arrival(a), date("2026-02-13"));

    assert_eq!(
      profile.preferences.dietary,
      vec!["vegetarian".to_string(), "halal".to_string()],
    );
    assert_eq!(profile.preferences.pillow_type.as_deref(), Some("hypoallergenic"));
    assert_eq!(profile.preferences.room_type.as_deref(), Some("Villa"));
    assert_eq!(profile.notes.len(), 1);
  }

  #[test]
  fn spa_counts_only_completed_bookings() {
    let mut m = richardson();
    m.spa.push(spa("James Richardson", "Facial", "no_show", 180.0));
    m.spa.push(spa("James Richardson", "Deep Tissue", "completed", 320.0));

    let profile = build_profile(&m, date("2026-02-13"));
    assert_eq!(profile.spend_history.spa, 640.0);
    assert_eq!(profile.preferences.spa_treatments, vec!["Deep Tissue".to_string()]);
    assert_eq!(profile.preferences.preferred_therapists, vec!["Marie".to_string()]);
  }

  #[test]
  fn concierge_extracts_occasions_dietary_and_requests() {
    let mut m = richardson();
    m.concierge.push(concierge(
      "REQ-7",
      "special_request",
      "Birthday cake for wife, vegetarian, no shellfish",
      Some(120.0),
    ));
    m.concierge.push(concierge("REQ-8", "restaurant", "Anniversary dinner", None));

    let profile = build_profile(&m, date("2026-02-13"));
    assert_eq!(
      profile.special_occasions,
      vec![
        "Birthday mentioned (2026-02-14)".to_string(),
        "Anniversary mentioned (2026-02-14)".to_string(),
      ],
    );
    assert_eq!(
      profile.preferences.dietary,
      vec!["vegetarian".to_string(), "no shellfish".to_string()],
    );
    assert_eq!(profile.preferences.special_requests.len(), 1);
    assert_eq!(profile.spend_history.concierge, 120.0);
    assert_eq!(profile.spend_history.total, 10440.0);
  }

  #[test]
  fn fb_and_email_notes_are_not_repeated() {
    let mut m = richardson();
    let fb = FbMention {
      date:   date("2026-02-12"),
      outlet: "ON_THE_ROCKS".into(),
      period: "dinner".into(),
      notes:  "Richardson anniversary table".into(),
    };
    m.fb.push(fb.clone());
    m.fb.push(FbMention { period: "lunch".into(), ..fb });
    let email = EmailMention {
      date:    "2026-02-11T09:00:00Z".into(),
      subject: "Richardson VIP arrival".into(),
      from:    "GM Office".into(),
      snippet: String::new(),
    };
    m.emails.push(email.clone());
    m.emails.push(email);

    let profile = build_profile(&m, date("2026-02-13"));
    assert_eq!(
      profile.notes,
      vec![
        "F&B: Richardson anniversary table".to_string(),
        "Email mention: Richardson VIP arrival (from GM Office)".to_string(),
      ],
    );
  }

  #[test]
  fn visit_without_confirmation_still_accrues_room_spend() {
    let m = MatchResult::for_arrival(arrival("Ana Lima", "12", ""));
    let profile = build_profile(&m, date("2026-02-13"));
    assert!(profile.visits.is_empty());
    assert_eq!(profile.total_visits, 0);
    assert_eq!(profile.first_visit, None);
    assert_eq!(profile.spend_history.rooms, 10000.0);
  }
}
