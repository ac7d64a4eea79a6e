//! Source-tagged records and the search-adapter seam.
//!
//! Each hotel system speaks its own record shape. Adapters translate those
//! shapes into the typed records below and hand them back wrapped in
//! [`SourceRecord`], so the merger can match on the source exhaustively
//! instead of probing optional fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// ─── Source kinds ────────────────────────────────────────────────────────────

/// The data sources searched for every arrival.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
  Spa,
  #[strum(to_string = "fb")]
  #[serde(rename = "fb")]
  FoodBeverage,
  Incidents,
  Concierge,
  Email,
  #[strum(to_string = "history")]
  #[serde(rename = "history")]
  PmsHistory,
}

// ─── PMS ─────────────────────────────────────────────────────────────────────

/// One entry of the PMS arrivals feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
  pub guest_name:   String,
  pub room:         Option<String>,
  pub nationality:  Option<String>,
  pub vip:          Option<String>,
  pub checkin:      NaiveDate,
  pub room_type:    Option<String>,
  pub rate:         f64,
  pub nights:       u32,
  pub confirmation: String,
  pub notes:        String,
}

/// A departure seen in PMS history. Carries the folio total, which is not
/// folded into profile spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Departure {
  pub date:        NaiveDate,
  pub guest_name:  String,
  pub room:        Option<String>,
  pub total_spend: f64,
}

/// A record found by re-scanning PMS history on dates other than the
/// reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryRecord {
  Stay(Arrival),
  Departure(Departure),
}

// ─── Departmental records ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaBooking {
  pub date:       NaiveDate,
  pub guest:      Option<String>,
  pub room:       Option<String>,
  pub treatment:  String,
  pub therapists: Vec<String>,
  pub status:     String,
  pub revenue:    f64,
}

impl SpaBooking {
  pub fn is_completed(&self) -> bool { self.status == "completed" }
}

/// An F&B meal-period note mentioning the guest. F&B data is aggregated per
/// outlet, so this is the only per-guest signal available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbMention {
  pub date:   NaiveDate,
  pub outlet: String,
  pub period: String,
  pub notes:  String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
  pub id:          String,
  pub date:        NaiveDate,
  pub category:    String,
  pub description: String,
  pub resolution:  Option<String>,
  pub status:      String,
  pub priority:    String,
  pub reported_by: String,
  pub room:        Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConciergeRequest {
  pub id:      String,
  pub date:    NaiveDate,
  /// Request category, e.g. `"restaurant"` or `"special_request"`.
  pub kind:    String,
  pub details: String,
  pub status:  String,
  pub guest:   Option<String>,
  pub room:    Option<String>,
  pub cost:    Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMention {
  /// Raw date string as sent by the mail system.
  pub date:    String,
  pub subject: String,
  pub from:    String,
  pub snippet: String,
}

// ─── Tagged record ───────────────────────────────────────────────────────────

/// A record returned by a [`SourceSearch`] adapter, tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "record", rename_all = "snake_case")]
pub enum SourceRecord {
  Spa(SpaBooking),
  FoodBeverage(FbMention),
  Incident(IncidentReport),
  Concierge(ConciergeRequest),
  Email(EmailMention),
  History(HistoryRecord),
}

impl SourceRecord {
  pub fn kind(&self) -> SourceKind {
    match self {
      Self::Spa(_) => SourceKind::Spa,
      Self::FoodBeverage(_) => SourceKind::FoodBeverage,
      Self::Incident(_) => SourceKind::Incidents,
      Self::Concierge(_) => SourceKind::Concierge,
      Self::Email(_) => SourceKind::Email,
      Self::History(_) => SourceKind::PmsHistory,
    }
  }
}

// ─── Adapter seam ────────────────────────────────────────────────────────────

/// What an adapter is asked to find.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestQuery {
  pub guest_name:     String,
  pub room:           Option<String>,
  pub reference_date: NaiveDate,
}

impl GuestQuery {
  pub fn for_arrival(arrival: &Arrival) -> Self {
    Self {
      guest_name:     arrival.guest_name.clone(),
      room:           arrival.room.clone(),
      reference_date: arrival.checkin,
    }
  }

  /// True when both the query and the record carry the same room number.
  pub fn room_matches(&self, room: Option<&str>) -> bool {
    matches!((self.room.as_deref(), room), (Some(q), Some(r)) if q == r)
  }
}

/// Searches one data source for records corroborating a guest.
///
/// Implementations never fail: a source that is absent or unreadable yields
/// an empty list. Every matching record is returned; picking one among
/// several is left to the caller.
pub trait SourceSearch: Send + Sync {
  fn kind(&self) -> SourceKind;

  fn search(&self, query: &GuestQuery) -> Vec<SourceRecord>;
}
