//! The `ProfileStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `guestlink-store-sqlite`). The pipeline and the CLI depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  identity::GuestIdentity,
  profile::{GuestProfile, ProfileSummary},
};

/// Durable keyed storage for guest profiles.
///
/// Every profile is one independently addressable record keyed by its
/// identity. Saves replace the whole record; there are no partial updates
/// and no versioning, so concurrent saves to one identity must be serialised
/// by the caller.
///
/// Read and write failures surface as errors. Records that cannot be decoded
/// are skipped by [`list_all`](Self::list_all) and
/// [`search_by_name`](Self::search_by_name).
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert or replace the profile stored under `profile.guest_id`.
  fn save<'a>(
    &'a self,
    profile: &'a GuestProfile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve a profile by identity. Returns `None` if not found.
  fn load<'a>(
    &'a self,
    id: &'a GuestIdentity,
  ) -> impl Future<Output = Result<Option<GuestProfile>, Self::Error>> + Send + 'a;

  /// Summaries of every stored profile, ordered by identity.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<ProfileSummary>, Self::Error>> + Send + '_;

  /// Profiles with any name spelling containing `needle`, ignoring case.
  fn search_by_name<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<GuestProfile>, Self::Error>> + Send + 'a;

  /// Delete one profile. Returns `false` if it did not exist.
  fn delete<'a>(
    &'a self,
    id: &'a GuestIdentity,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete every profile and return how many were removed.
  fn clear_all(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
