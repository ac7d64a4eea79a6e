//! Matcher tests over fixture feeds written to a temporary directory.

use std::path::Path;

use chrono::NaiveDate;
use guestlink_core::{
  merge::build_profile,
  source::{GuestQuery, SourceKind, SourceRecord, SourceSearch},
};
use tempfile::TempDir;

use crate::{IdentityMatcher, SourceSet};

fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

fn write(dir: &Path, file: &str, json: &str) { std::fs::write(dir.join(file), json).unwrap(); }

/// A data directory with three arrivals on 2026-02-13 and one past stay.
fn fixture() -> TempDir {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path();

  write(
    path,
    "opera-pms.json",
    r#"{"dailyStats": [
      {"date": "2025-08-01", "arrivals": [
        {"guestName": "Mr. James Richardson", "roomNo": "V02", "rate": 1800, "nights": 3,
         "confirmationNo": "C-0900", "vip": "gold"}
      ]},
      {"date": "2026-02-13", "arrivals": [
        {"guestName": "James Richardson", "roomNo": "V04", "nationality": "GB",
         "roomType": "Villa", "rate": 2000, "nights": 5, "confirmationNo": "C-1001"},
        {"guestName": "Priya Kapoor", "roomNo": 21, "rate": 900, "nights": 2,
         "confirmationNo": "C-1002", "notes": "Vegetarian, allergic to feathers"},
        {"guestName": "Lena Okafor", "roomNo": 30, "rate": 500, "nights": 1,
         "confirmationNo": "C-1003"}
      ]}
    ]}"#,
  );
  write(
    path,
    "spa-tac.json",
    r#"{"dailyData": [{"date": "2026-02-12", "bookings": [
      {"guest": "James Richardson", "room": "V04", "treatment": "Deep Tissue",
       "therapist": "Marie", "status": "completed", "revenue": 320},
      {"guest": "Walk-in", "treatment": "Facial", "status": "completed", "revenue": 90}
    ]}]}"#,
  );
  write(
    path,
    "incidents-unifocus.json",
    r#"{"incidents": [
      {"id": "INC-5", "date": "2026-02-11", "category": "maintenance",
       "description": "AC not cooling", "status": "open", "priority": "high",
       "reportedBy": "Housekeeping", "room": "V04"}
    ]}"#,
  );
  write(
    path,
    "concierge.json",
    r#"{"conciergeRequests": [
      {"id": "CR-1", "date": "2026-02-12", "type": "restaurant",
       "details": "Birthday dinner for Mrs Kapoor", "status": "confirmed",
       "guest": "P. Kapoor", "room": 21, "cost": 0}
    ]}"#,
  );
  write(
    path,
    "m365-emails.json",
    r#"[{"date": "2026-02-12T08:00:00", "subject": "Kapoor anniversary",
         "from": {"name": "Reservations"}, "body": "Please prepare flowers."}]"#,
  );
  dir
}

#[tokio::test]
async fn results_follow_arrivals_order() {
  let dir = fixture();
  let matcher = IdentityMatcher::new(SourceSet::load(dir.path())).with_max_concurrency(2);

  let results = matcher.match_arrivals(date("2026-02-13")).await;
  let names: Vec<_> = results.iter().map(|r| r.guest_name.as_str()).collect();
  assert_eq!(names, vec!["James Richardson", "Priya Kapoor", "Lena Okafor"]);
  assert_eq!(results[1].room.as_deref(), Some("21"));
}

#[tokio::test]
async fn cross_references_per_source() {
  let dir = fixture();
  let matcher = IdentityMatcher::new(SourceSet::load(dir.path()));
  let results = matcher.match_arrivals(date("2026-02-13")).await;

  let richardson = &results[0];
  assert_eq!(richardson.count(SourceKind::Spa), 1);
  assert_eq!(richardson.count(SourceKind::Incidents), 1);
  assert_eq!(richardson.count(SourceKind::PmsHistory), 1);
  assert_eq!(richardson.count(SourceKind::Concierge), 0);

  let kapoor = &results[1];
  assert_eq!(kapoor.count(SourceKind::Concierge), 1);
  assert_eq!(kapoor.count(SourceKind::Email), 1);
  assert_eq!(kapoor.count(SourceKind::PmsHistory), 0);

  assert!(results[2].cross_references().is_empty());
}

#[tokio::test]
async fn richardson_profile_end_to_end() {
  let dir = fixture();
  let matcher = IdentityMatcher::new(SourceSet::load(dir.path()));
  let results = matcher.match_arrivals(date("2026-02-13")).await;

  let profile = build_profile(&results[0], date("2026-02-13"));
  assert_eq!(profile.visits.len(), 2);
  assert!(profile.has_visit("C-1001"));
  assert!(profile.has_visit("C-0900"));
  assert_eq!(profile.total_visits, 2);
  assert_eq!(profile.vip_level.as_deref(), Some("gold"));
  assert_eq!(profile.spend_history.spa, 320.0);
  assert_eq!(profile.spend_history.total, profile.spend_history.component_sum());
  assert_eq!(profile.preferences.spa_treatments, vec!["Deep Tissue".to_string()]);
  assert_eq!(profile.incidents.len(), 1);
  assert!(!profile.incidents[0].resolved);
}

#[tokio::test]
async fn missing_sources_yield_empty_matches() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "opera-pms.json",
    r#"{"dailyStats": [{"date": "2026-02-13", "arrivals": [
      {"guestName": "James Richardson", "roomNo": "V04", "rate": 2000, "nights": 5,
       "confirmationNo": "C-1001"}
    ]}]}"#,
  );
  write(dir.path(), "spa-tac.json", "{ broken");

  let sources = SourceSet::load(dir.path());
  let unavailable = sources.status().iter().filter(|(_, r)| r.is_some()).count();
  assert_eq!(unavailable, 5);

  let results = IdentityMatcher::new(sources).match_arrivals(date("2026-02-13")).await;
  assert_eq!(results.len(), 1);
  assert!(results[0].cross_references().is_empty());

  let profile = build_profile(&results[0], date("2026-02-13"));
  assert_eq!(profile.total_visits, 1);
  assert!(profile.incidents.is_empty());
}

#[tokio::test]
async fn null_rate_keeps_every_arrival() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "opera-pms.json",
    r#"{"dailyStats": [{"date": "2026-02-13", "arrivals": [
      {"guestName": "James Richardson", "roomNo": "V04", "rate": null, "nights": 5,
       "confirmationNo": "C-1001"},
      {"guestName": "Priya Kapoor", "roomNo": 21, "rate": 900, "nights": 2,
       "confirmationNo": "C-1002"}
    ]}]}"#,
  );

  let sources = SourceSet::load(dir.path());
  assert!(sources.status().iter().any(|(file, r)| *file == "opera-pms.json" && r.is_none()));

  let results = IdentityMatcher::new(sources).match_arrivals(date("2026-02-13")).await;
  assert_eq!(results.len(), 2);
  assert_eq!(build_profile(&results[0], date("2026-02-13")).spend_history.rooms, 0.0);
}

#[tokio::test]
async fn no_arrivals_is_an_empty_batch() {
  let dir = fixture();
  let matcher = IdentityMatcher::new(SourceSet::load(dir.path()));
  assert!(matcher.match_arrivals(date("2030-01-01")).await.is_empty());

  let empty = tempfile::tempdir().unwrap();
  let matcher = IdentityMatcher::new(SourceSet::load(empty.path()));
  assert!(matcher.match_arrivals(date("2026-02-13")).await.is_empty());
}

struct Panicking;

impl SourceSearch for Panicking {
  fn kind(&self) -> SourceKind { SourceKind::Email }

  fn search(&self, _query: &GuestQuery) -> Vec<SourceRecord> { panic!("mail server exploded") }
}

#[tokio::test]
async fn panicking_adapter_does_not_stall_others() {
  let dir = fixture();
  let sources = SourceSet::load(dir.path());
  let mut adapters = sources.adapters();
  adapters.insert(0, Box::new(Panicking));

  let matcher = IdentityMatcher::with_adapters(sources, adapters).with_max_concurrency(1);
  let results = matcher.match_arrivals(date("2026-02-13")).await;

  assert_eq!(results.len(), 3);
  assert_eq!(results[0].count(SourceKind::Spa), 1);
  assert_eq!(results[1].count(SourceKind::Email), 1);
}

#[test]
fn resolve_single_arrival_synchronously() {
  let dir = fixture();
  let sources = SourceSet::load(dir.path());
  let arrival = sources.arrivals(date("2026-02-13")).remove(1);
  let matcher = IdentityMatcher::new(sources);

  let result = matcher.resolve(arrival);
  assert_eq!(result.guest_name, "Priya Kapoor");
  assert_eq!(result.count(SourceKind::Concierge), 1);
}
