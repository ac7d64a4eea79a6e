//! File-backed source feeds, search adapters and the identity matcher.
//!
//! Every hotel system exports one JSON feed into a data directory. Feeds are
//! read once per resolution run into a [`SourceSet`]; each
//! [`SourceSearch`](guestlink_core::source::SourceSearch) adapter scans one
//! feed, and the [`IdentityMatcher`] fans every arrival out to all of them.
//!
//! # Quick start
//!
//! ```no_run
//! use guestlink_sources::{IdentityMatcher, SourceSet};
//!
//! # async fn run() {
//! let sources = SourceSet::load("mock-data");
//! let matcher = IdentityMatcher::new(sources).with_max_concurrency(4);
//! let date = "2026-02-13".parse().unwrap();
//! for m in matcher.match_arrivals(date).await {
//!   println!("{} -> {:?}", m.guest_name, m.cross_references());
//! }
//! # }
//! ```

pub mod adapters;
pub mod error;
pub mod feed;
mod raw;
mod set;
pub mod matcher;

pub use error::{Error, Result};
pub use feed::Feed;
pub use matcher::IdentityMatcher;
pub use set::SourceSet;

#[cfg(test)]
mod tests;
