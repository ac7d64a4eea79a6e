//! Wire shapes of the JSON feeds and their conversion to core records.
//!
//! Feeds come from heterogeneous exports: room numbers show up as numbers or
//! strings, the spa therapist field as a string or a list, and most fields
//! may be absent. Everything is normalised here so adapters only ever see
//! core types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use guestlink_core::source::{
  Arrival, ConciergeRequest, Departure, FbMention, IncidentReport, SpaBooking,
};
use serde::{Deserialize, Deserializer};

/// Meal periods scanned in every F&B outlet.
const MEAL_PERIODS: &[&str] = &["breakfast", "lunch", "dinner"];

// ─── Lenient field helpers ───────────────────────────────────────────────────

/// Accept a string, number or boolean; map null and blank strings to `None`.
fn opt_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<serde_json::Value>::deserialize(de)?;
  Ok(match value {
    Some(serde_json::Value::String(s)) => {
      let s = s.trim();
      (!s.is_empty()).then(|| s.to_owned())
    }
    Some(serde_json::Value::Number(n)) => Some(n.to_string()),
    Some(serde_json::Value::Bool(true)) => Some("true".to_owned()),
    _ => None,
  })
}

fn text<'de, D>(de: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(opt_text(de)?.unwrap_or_default())
}

/// Accept a number or a numeric string; anything else is `None`.
fn opt_number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<serde_json::Value>::deserialize(de)?;
  Ok(match value {
    Some(serde_json::Value::Number(n)) => n.as_f64(),
    Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
  .filter(|n| n.is_finite()))
}

fn number<'de, D>(de: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(opt_number(de)?.unwrap_or_default())
}

/// A non-negative whole count; fractions truncate and negatives become 0.
fn count<'de, D>(de: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(opt_number(de)?.map_or(0, |n| n.max(0.0) as u32))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
  One(String),
  Many(Vec<String>),
}

fn string_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<OneOrMany>::deserialize(de)? {
    Some(OneOrMany::One(s)) if !s.trim().is_empty() => vec![s.trim().to_owned()],
    Some(OneOrMany::Many(v)) => v,
    _ => Vec::new(),
  })
}

// ─── PMS: opera-pms.json ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmsFile {
  #[serde(default)]
  daily_stats: Vec<RawPmsDay>,
}

#[derive(Deserialize)]
struct RawPmsDay {
  date:       NaiveDate,
  #[serde(default)]
  arrivals:   Vec<RawArrival>,
  #[serde(default)]
  departures: Vec<RawDeparture>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArrival {
  #[serde(default, deserialize_with = "text")]
  guest_name:      String,
  #[serde(default, deserialize_with = "opt_text")]
  room_no:         Option<String>,
  #[serde(default, deserialize_with = "opt_text")]
  nationality:     Option<String>,
  #[serde(default, deserialize_with = "opt_text")]
  vip:             Option<String>,
  #[serde(default, deserialize_with = "opt_text")]
  room_type:       Option<String>,
  #[serde(default, deserialize_with = "number")]
  rate:            f64,
  #[serde(default, deserialize_with = "count")]
  nights:          u32,
  #[serde(default, deserialize_with = "text")]
  confirmation_no: String,
  #[serde(default, deserialize_with = "text")]
  notes:           String,
}

impl RawArrival {
  fn into_arrival(self, checkin: NaiveDate) -> Arrival {
    Arrival {
      guest_name: self.guest_name,
      room: self.room_no,
      nationality: self.nationality,
      vip: self.vip,
      checkin,
      room_type: self.room_type,
      rate: self.rate,
      nights: self.nights,
      confirmation: self.confirmation_no,
      notes: self.notes,
    }
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeparture {
  #[serde(default, deserialize_with = "text")]
  guest_name:  String,
  #[serde(default, deserialize_with = "opt_text")]
  room_no:     Option<String>,
  #[serde(default, deserialize_with = "number")]
  total_spend: f64,
}

/// One business day of PMS activity.
#[derive(Debug, Clone, PartialEq)]
pub struct PmsDay {
  pub date:       NaiveDate,
  pub arrivals:   Vec<Arrival>,
  pub departures: Vec<Departure>,
}

impl PmsFile {
  pub fn into_days(self) -> Vec<PmsDay> {
    self
      .daily_stats
      .into_iter()
      .map(|day| PmsDay {
        date:       day.date,
        arrivals:   day.arrivals.into_iter().map(|a| a.into_arrival(day.date)).collect(),
        departures: day
          .departures
          .into_iter()
          .map(|d| Departure {
            date:        day.date,
            guest_name:  d.guest_name,
            room:        d.room_no,
            total_spend: d.total_spend,
          })
          .collect(),
      })
      .collect()
  }
}

// ─── Spa: spa-tac.json ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaFile {
  #[serde(default)]
  daily_data: Vec<RawSpaDay>,
}

#[derive(Deserialize)]
struct RawSpaDay {
  date:     NaiveDate,
  #[serde(default)]
  bookings: Vec<RawSpaBooking>,
}

#[derive(Deserialize)]
struct RawSpaBooking {
  #[serde(default, deserialize_with = "opt_text")]
  guest:     Option<String>,
  #[serde(default, deserialize_with = "opt_text")]
  room:      Option<String>,
  #[serde(default, deserialize_with = "text")]
  treatment: String,
  #[serde(default, deserialize_with = "string_list")]
  therapist: Vec<String>,
  #[serde(default, deserialize_with = "text")]
  status:    String,
  #[serde(default, deserialize_with = "number")]
  revenue:   f64,
}

impl SpaFile {
  pub fn into_bookings(self) -> Vec<SpaBooking> {
    self
      .daily_data
      .into_iter()
      .flat_map(|day| {
        let date = day.date;
        day.bookings.into_iter().map(move |b| SpaBooking {
          date,
          guest: b.guest,
          room: b.room,
          treatment: b.treatment,
          therapists: b.therapist,
          status: b.status,
          revenue: b.revenue,
        })
      })
      .collect()
  }
}

// ─── F&B: fb-7rooms.json ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FbFile {
  #[serde(default)]
  daily_data: Vec<RawFbDay>,
}

/// A day keyed by outlet code; non-object entries (totals, flags) are
/// ignored.
#[derive(Deserialize)]
struct RawFbDay {
  date:    NaiveDate,
  #[serde(flatten)]
  outlets: BTreeMap<String, serde_json::Value>,
}

impl FbFile {
  /// Every non-empty meal-period note, one entry per outlet and period.
  pub fn into_notes(self) -> Vec<FbMention> {
    let mut notes = Vec::new();
    for day in self.daily_data {
      for (outlet, data) in &day.outlets {
        for period in MEAL_PERIODS {
          let text = data
            .get(period)
            .and_then(|p| p.get("notes"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
          if !text.trim().is_empty() {
            notes.push(FbMention {
              date:   day.date,
              outlet: outlet.clone(),
              period: (*period).to_owned(),
              notes:  text.to_owned(),
            });
          }
        }
      }
    }
    notes
  }
}

// ─── Incidents: incidents-unifocus.json ──────────────────────────────────────

#[derive(Deserialize)]
pub struct IncidentsFile {
  #[serde(default)]
  incidents: Vec<RawIncident>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIncident {
  #[serde(default, deserialize_with = "text")]
  id:          String,
  date:        NaiveDate,
  #[serde(default, deserialize_with = "text")]
  category:    String,
  #[serde(default, deserialize_with = "text")]
  description: String,
  #[serde(default, deserialize_with = "opt_text")]
  resolution:  Option<String>,
  #[serde(default, deserialize_with = "text")]
  status:      String,
  #[serde(default, deserialize_with = "text")]
  priority:    String,
  #[serde(default, deserialize_with = "text")]
  reported_by: String,
  #[serde(default, deserialize_with = "opt_text")]
  room:        Option<String>,
}

impl IncidentsFile {
  pub fn into_reports(self) -> Vec<IncidentReport> {
    self
      .incidents
      .into_iter()
      .map(|i| IncidentReport {
        id:          i.id,
        date:        i.date,
        category:    i.category,
        description: i.description,
        resolution:  i.resolution,
        status:      i.status,
        priority:    i.priority,
        reported_by: i.reported_by,
        room:        i.room,
      })
      .collect()
  }
}

// ─── Concierge: concierge.json ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConciergeFile {
  #[serde(default)]
  concierge_requests: Vec<RawRequest>,
}

#[derive(Deserialize)]
struct RawRequest {
  #[serde(default, deserialize_with = "text")]
  id:      String,
  date:    NaiveDate,
  #[serde(rename = "type", default, deserialize_with = "text")]
  kind:    String,
  #[serde(default, deserialize_with = "text")]
  details: String,
  #[serde(default, deserialize_with = "text")]
  status:  String,
  #[serde(default, deserialize_with = "opt_text")]
  guest:   Option<String>,
  #[serde(default, deserialize_with = "opt_text")]
  room:    Option<String>,
  #[serde(default, deserialize_with = "opt_number")]
  cost:    Option<f64>,
}

impl ConciergeFile {
  pub fn into_requests(self) -> Vec<ConciergeRequest> {
    self
      .concierge_requests
      .into_iter()
      .map(|r| ConciergeRequest {
        id:      r.id,
        date:    r.date,
        kind:    r.kind,
        details: r.details,
        status:  r.status,
        guest:   r.guest,
        room:    r.room,
        cost:    r.cost,
      })
      .collect()
  }
}

// ─── Email: m365-emails.json ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawSender {
  #[serde(default, deserialize_with = "text")]
  name: String,
}

/// One message from the mail export. Kept whole because the adapter matches
/// on the body, but only a snippet reaches the match result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEmail")]
pub struct Email {
  pub date:    String,
  pub subject: String,
  pub from:    String,
  pub body:    String,
}

#[derive(Deserialize)]
struct RawEmail {
  #[serde(default, deserialize_with = "text")]
  date:    String,
  #[serde(default, deserialize_with = "text")]
  subject: String,
  #[serde(default)]
  from:    Option<RawSender>,
  #[serde(default, deserialize_with = "text")]
  body:    String,
}

impl From<RawEmail> for Email {
  fn from(raw: RawEmail) -> Self {
    Self {
      date:    raw.date,
      subject: raw.subject,
      from:    raw.from.unwrap_or_default().name,
      body:    raw.body,
    }
  }
}
