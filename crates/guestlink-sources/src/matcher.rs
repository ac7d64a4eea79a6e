//! [`IdentityMatcher`]: fans each arrival out to every source adapter.

use std::{
  panic::{AssertUnwindSafe, catch_unwind},
  sync::Arc,
};

use chrono::NaiveDate;
use guestlink_core::{
  matching::MatchResult,
  source::{Arrival, GuestQuery, SourceSearch},
};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::set::SourceSet;

/// Default bound on arrivals resolved at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

type Adapters = Arc<Vec<Box<dyn SourceSearch>>>;

/// Resolves a day's arrivals against every source.
///
/// Arrivals are resolved concurrently on the blocking pool, at most
/// `max_concurrency` at a time. Each arrival's adapters run one after the
/// other against shared read-only feeds, so no adapter can see another's
/// output. Results come back in arrivals order.
pub struct IdentityMatcher {
  sources:         SourceSet,
  adapters:        Adapters,
  max_concurrency: usize,
}

impl IdentityMatcher {
  /// A matcher using one adapter per feed of `sources`.
  pub fn new(sources: SourceSet) -> Self {
    let adapters = sources.adapters();
    Self::with_adapters(sources, adapters)
  }

  /// A matcher over an explicit adapter list. Arrivals still come from the
  /// PMS feed of `sources`.
  pub fn with_adapters(sources: SourceSet, adapters: Vec<Box<dyn SourceSearch>>) -> Self {
    Self {
      sources,
      adapters: Arc::new(adapters),
      max_concurrency: DEFAULT_MAX_CONCURRENCY,
    }
  }

  /// Bound the number of arrivals resolved at once. Zero is treated as one.
  pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
    self.max_concurrency = max_concurrency.max(1);
    self
  }

  pub fn sources(&self) -> &SourceSet { &self.sources }

  /// One [`MatchResult`] per PMS arrival on `date`, in arrivals order.
  ///
  /// No arrivals yields an empty list. If resolving an arrival fails
  /// outright, its result carries the arrival and no cross-references.
  pub async fn match_arrivals(&self, date: NaiveDate) -> Vec<MatchResult> {
    let arrivals = self.sources.arrivals(date);
    if arrivals.is_empty() {
      info!(%date, "no arrivals");
      return Vec::new();
    }
    info!(%date, arrivals = arrivals.len(), "matching arrivals");

    let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
    let handles: Vec<_> = arrivals
      .iter()
      .cloned()
      .map(|arrival| {
        let adapters = Arc::clone(&self.adapters);
        let semaphore = Arc::clone(&semaphore);
        tokio::spawn(async move {
          let _permit = semaphore.acquire_owned().await;
          tokio::task::spawn_blocking(move || resolve_with(&adapters, arrival)).await
        })
      })
      .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (arrival, handle) in arrivals.into_iter().zip(handles) {
      let result = match handle.await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) | Err(e) => {
          warn!(guest = %arrival.guest_name, error = %e, "arrival resolution failed");
          MatchResult::for_arrival(arrival)
        }
      };
      results.push(result);
    }
    results
  }

  /// Resolve a single arrival on the calling thread.
  pub fn resolve(&self, arrival: Arrival) -> MatchResult { resolve_with(&self.adapters, arrival) }
}

/// Query every adapter for `arrival`. A panicking adapter contributes nothing.
fn resolve_with(adapters: &[Box<dyn SourceSearch>], arrival: Arrival) -> MatchResult {
  let query = GuestQuery::for_arrival(&arrival);
  let mut result = MatchResult::for_arrival(arrival);

  for adapter in adapters {
    let kind = adapter.kind();
    match catch_unwind(AssertUnwindSafe(|| adapter.search(&query))) {
      Ok(records) => {
        debug!(guest = %query.guest_name, source = %kind, hits = records.len(), "adapter searched");
        for record in records {
          result.absorb(record);
        }
      }
      Err(_) => {
        warn!(guest = %query.guest_name, source = %kind, "adapter panicked; treating as no matches");
      }
    }
  }

  result
}
