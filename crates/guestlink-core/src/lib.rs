//! Core types and pure logic for guestlink, the guest identity resolution
//! engine.
//!
//! No database, filesystem or runtime dependencies live here. Source
//! adapters, storage backends and the CLI all build on this crate.

// Store implementations use native `async fn` against the RPITIT signatures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod matching;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod source;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
pub use identity::GuestIdentity;
pub use matching::MatchResult;
pub use profile::GuestProfile;
