//! JSON REST API for Waypoint.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`TripStore`] and [`UserStore`]. Authentication is by bearer token (see
//! [`auth`]); TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = waypoint_api::api_router(Arc::new(store));
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod trips;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use waypoint_core::store::{TripStore, UserStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TripStore + UserStore + 'static,
{
  Router::new()
    // Trips
    .route("/trips", get(trips::list::<S>).post(trips::create::<S>))
    .route("/trips/owned", get(trips::list_owned::<S>))
    .route("/trips/openall", get(trips::list_public::<S>))
    .route("/trips/rsvp/{id}", patch(trips::rsvp::<S>))
    .route("/trips/unrsvp/{id}", patch(trips::unrsvp::<S>))
    .route(
      "/trips/{id}",
      get(trips::get_one::<S>)
        .patch(trips::update::<S>)
        .delete(trips::delete_one::<S>),
    )
    // Accounts
    .route("/sign-up", post(users::sign_up::<S>))
    .route("/sign-in", post(users::sign_in::<S>))
    .route("/change-password", patch(users::change_password::<S>))
    .route("/sign-out", delete(users::sign_out::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
