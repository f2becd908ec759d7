//! The `TripStore` and `UserStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `waypoint-store-sqlite`). Higher layers (`waypoint-api`) depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  trip::{NewTrip, Trip, TripPatch},
  user::{User, UserCredentials},
};

// ─── Trips ───────────────────────────────────────────────────────────────────

/// Abstraction over a trip store backend.
///
/// Every method is a single store call. Implementations must make
/// [`update_trip`](Self::update_trip), [`add_attendee`](Self::add_attendee) and
/// [`remove_attendee`](Self::remove_attendee) atomic at the storage layer, so
/// concurrent callers never lose each other's writes.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TripStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new trip owned by `owner`. Timestamps are set by the store and
  /// the attendee set starts empty.
  fn create_trip(
    &self,
    input: NewTrip,
    owner: Uuid,
  ) -> impl Future<Output = Result<Trip, Self::Error>> + Send + '_;

  /// Every trip, oldest first.
  fn list_trips(
    &self,
  ) -> impl Future<Output = Result<Vec<Trip>, Self::Error>> + Send + '_;

  /// Trips whose owner is `owner`, oldest first.
  fn list_trips_owned_by(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Trip>, Self::Error>> + Send + '_;

  /// Retrieve a trip by id. Returns `None` if not found.
  fn get_trip(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Trip>, Self::Error>> + Send + '_;

  /// Merge the fields present in `patch` into the stored trip and bump
  /// `updated_at`. Fields absent from the patch are untouched.
  fn update_trip(
    &self,
    id: Uuid,
    patch: TripPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Add `user` to the trip's attendees. A no-op if already present.
  fn add_attendee(
    &self,
    id: Uuid,
    user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove `user` from the trip's attendees. A no-op if absent.
  fn remove_attendee(
    &self,
    id: Uuid,
    user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Permanently delete a trip and its attendee list.
  fn delete_trip(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Abstraction over the user accounts backing bearer-token authentication.
///
/// Passwords and tokens never reach the store in clear text: callers pass an
/// argon2 PHC string and a token digest respectively.
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Register a user. Returns `None` if `email` is already taken.
  fn add_user(
    &self,
    email: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user and their password hash by email.
  fn get_user_credentials(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + '_;

  /// Resolve a bearer-token digest to the user it was issued to.
  fn get_user_by_token(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Replace (or with `None`, revoke) the user's token digest.
  fn set_user_token(
    &self,
    user: Uuid,
    token_digest: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the user's password hash.
  fn set_user_password(
    &self,
    user: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
