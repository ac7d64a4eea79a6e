//! [`SourceSet`]: every source feed of one resolution run.

use std::{path::Path, sync::Arc};

use chrono::NaiveDate;
use guestlink_core::source::{
  Arrival, ConciergeRequest, FbMention, IncidentReport, SourceSearch, SpaBooking,
};
use tracing::info;

use crate::{
  adapters::{
    ConciergeSearch, EmailSearch, FbSearch, IncidentSearch, PmsHistorySearch, SpaSearch,
  },
  feed::Feed,
  raw::{ConciergeFile, Email, FbFile, IncidentsFile, PmsDay, PmsFile, SpaFile},
};

pub const PMS_FILE: &str = "opera-pms.json";
pub const SPA_FILE: &str = "spa-tac.json";
pub const FB_FILE: &str = "fb-7rooms.json";
pub const INCIDENTS_FILE: &str = "incidents-unifocus.json";
pub const CONCIERGE_FILE: &str = "concierge.json";
pub const EMAIL_FILE: &str = "m365-emails.json";

/// The feeds of a data directory, read once and shared read-only by every
/// adapter built from it.
#[derive(Debug, Clone)]
pub struct SourceSet {
  pms:       Arc<Feed<Vec<PmsDay>>>,
  spa:       Arc<Feed<Vec<SpaBooking>>>,
  fb:        Arc<Feed<Vec<FbMention>>>,
  incidents: Arc<Feed<Vec<IncidentReport>>>,
  concierge: Arc<Feed<Vec<ConciergeRequest>>>,
  emails:    Arc<Feed<Vec<Email>>>,
}

impl SourceSet {
  /// Load every feed found in `dir`. Missing or unreadable feeds are kept as
  /// [`Feed::Unavailable`]; this never fails.
  pub fn load(dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref();
    let set = Self {
      pms:       Arc::new(Feed::load_with(&dir.join(PMS_FILE), PmsFile::into_days)),
      spa:       Arc::new(Feed::load_with(&dir.join(SPA_FILE), SpaFile::into_bookings)),
      fb:        Arc::new(Feed::load_with(&dir.join(FB_FILE), FbFile::into_notes)),
      incidents: Arc::new(Feed::load_with(
        &dir.join(INCIDENTS_FILE),
        IncidentsFile::into_reports,
      )),
      concierge: Arc::new(Feed::load_with(
        &dir.join(CONCIERGE_FILE),
        ConciergeFile::into_requests,
      )),
      emails:    Arc::new(Feed::load_with(&dir.join(EMAIL_FILE), |e: Vec<Email>| e)),
    };

    let available = set.status().iter().filter(|(_, reason)| reason.is_none()).count();
    info!(dir = %dir.display(), available, total = 6, "source feeds loaded");
    set
  }

  /// The PMS arrivals for `date`, in feed order. Empty when the PMS feed is
  /// unavailable or has no entry for that date.
  pub fn arrivals(&self, date: NaiveDate) -> Vec<Arrival> {
    self
      .pms
      .loaded()
      .into_iter()
      .flatten()
      .filter(|day| day.date == date)
      .flat_map(|day| day.arrivals.iter().cloned())
      .collect()
  }

  /// One adapter per source, all reading from this set.
  pub fn adapters(&self) -> Vec<Box<dyn SourceSearch>> {
    vec![
      Box::new(SpaSearch::new(Arc::clone(&self.spa))),
      Box::new(FbSearch::new(Arc::clone(&self.fb))),
      Box::new(IncidentSearch::new(Arc::clone(&self.incidents))),
      Box::new(ConciergeSearch::new(Arc::clone(&self.concierge))),
      Box::new(EmailSearch::new(Arc::clone(&self.emails))),
      Box::new(PmsHistorySearch::new(Arc::clone(&self.pms))),
    ]
  }

  /// Each feed file with the reason it is unavailable, if it is.
  pub fn status(&self) -> Vec<(&'static str, Option<&str>)> {
    vec![
      (PMS_FILE, reason(&self.pms)),
      (SPA_FILE, reason(&self.spa)),
      (FB_FILE, reason(&self.fb)),
      (INCIDENTS_FILE, reason(&self.incidents)),
      (CONCIERGE_FILE, reason(&self.concierge)),
      (EMAIL_FILE, reason(&self.emails)),
    ]
  }
}

fn reason<T>(feed: &Feed<T>) -> Option<&str> {
  match feed {
    Feed::Loaded(_) => None,
    Feed::Unavailable { reason } => Some(reason),
  }
}
