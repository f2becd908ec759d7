//! Handlers for `/trips` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/trips/openall` | No auth; every trip |
//! | `GET`    | `/trips` | Every trip |
//! | `GET`    | `/trips/owned` | Trips owned by the caller |
//! | `GET`    | `/trips/:id` | Any trip, no ownership check |
//! | `POST`   | `/trips` | Body: `{"trip":{...}}`; returns 201, owner is the caller |
//! | `PATCH`  | `/trips/:id` | Body: `{"trip":{...}}`; owner only; returns 204 |
//! | `PATCH`  | `/trips/rsvp/:id` | Caller joins; returns 204 |
//! | `PATCH`  | `/trips/unrsvp/:id` | Caller leaves; returns 204 |
//! | `DELETE` | `/trips/:id` | Owner only; returns 204 |
//!
//! Every route except `/trips/openall` requires a bearer token. Routes that
//! mutate an existing trip look it up first and answer 404 before any
//! ownership check runs.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use waypoint_core::{
  access::{require_found, require_ownership},
  store::{TripStore, UserStore},
  trip::{NewTrip, Trip, TripPatch},
};

use crate::{auth::CurrentUser, error::ApiError, extract::JsonBody};

// ─── Bodies ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /trips` and `PATCH /trips/:id`.
///
/// The inner object is kept loose here and narrowed by
/// [`NewTrip::from_json`] / [`TripPatch::from_json`].
#[derive(Debug, Deserialize)]
pub struct TripBody {
  pub trip: Value,
}

#[derive(Debug, Serialize)]
pub struct TripEnvelope {
  pub trip: Trip,
}

#[derive(Debug, Serialize)]
pub struct TripsEnvelope {
  pub trips: Vec<Trip>,
}

/// A path id that is not a UUID cannot name a stored trip.
fn parse_trip_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("trip {raw:?} not found")))
}

/// Look a trip up by id, mapping absence to not-found.
async fn find_trip<S>(store: &S, id: Uuid) -> Result<Trip, ApiError>
where
  S: TripStore,
{
  let found = store.get_trip(id).await.map_err(ApiError::store)?;
  Ok(require_found(found, id)?)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /trips/openall`: public index of every trip.
///
/// Same listing as `GET /trips` without the auth gate.
pub async fn list_public<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<TripsEnvelope>, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let trips = store.list_trips().await.map_err(ApiError::store)?;
  Ok(Json(TripsEnvelope { trips }))
}

/// `GET /trips`
pub async fn list<S>(
  CurrentUser(_caller): CurrentUser,
  State(store): State<Arc<S>>,
) -> Result<Json<TripsEnvelope>, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let trips = store.list_trips().await.map_err(ApiError::store)?;
  Ok(Json(TripsEnvelope { trips }))
}

/// `GET /trips/owned`
pub async fn list_owned<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
) -> Result<Json<TripsEnvelope>, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let trips = store
    .list_trips_owned_by(caller.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(TripsEnvelope { trips }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /trips/:id`: any authenticated caller may view any trip.
pub async fn get_one<S>(
  CurrentUser(_caller): CurrentUser,
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<TripEnvelope>, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let id = parse_trip_id(&raw_id)?;
  let trip = find_trip(&*store, id).await?;
  Ok(Json(TripEnvelope { trip }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /trips`: returns 201 + the stored trip. Any `owner` in the body is
/// ignored; the caller becomes the owner.
pub async fn create<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<TripBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let input = NewTrip::from_json(body.trip)?;
  let trip = store
    .create_trip(input, caller.id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(trip_id = %trip.id, owner = %caller.id, "trip created");
  Ok((StatusCode::CREATED, Json(TripEnvelope { trip })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /trips/:id`: owner only. Blank strings and non-editable keys in
/// the body are dropped before the merge.
pub async fn update<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
  JsonBody(body): JsonBody<TripBody>,
) -> Result<StatusCode, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let id = parse_trip_id(&raw_id)?;
  let patch = TripPatch::from_json(body.trip)?;

  let trip = find_trip(&*store, id).await?;
  require_ownership(caller.id, &trip)?;

  let empty = patch.is_empty();
  store.update_trip(id, patch).await.map_err(ApiError::store)?;
  tracing::debug!(trip_id = %id, empty, "trip updated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── RSVP ─────────────────────────────────────────────────────────────────────

/// `PATCH /trips/rsvp/:id`: the caller joins the trip. Ownership is not
/// required, and only the caller's own id is ever added.
pub async fn rsvp<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let id = parse_trip_id(&raw_id)?;
  find_trip(&*store, id).await?;

  store
    .add_attendee(id, caller.id)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(trip_id = %id, user = %caller.id, "rsvp");
  Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /trips/unrsvp/:id`: the caller leaves the trip.
pub async fn unrsvp<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let id = parse_trip_id(&raw_id)?;
  find_trip(&*store, id).await?;

  store
    .remove_attendee(id, caller.id)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(trip_id = %id, user = %caller.id, "un-rsvp");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /trips/:id`: owner only; permanent.
pub async fn delete_one<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: TripStore + UserStore + 'static,
{
  let id = parse_trip_id(&raw_id)?;
  let trip = find_trip(&*store, id).await?;
  require_ownership(caller.id, &trip)?;

  store.delete_trip(id).await.map_err(ApiError::store)?;
  tracing::info!(trip_id = %id, owner = %caller.id, "trip deleted");
  Ok(StatusCode::NO_CONTENT)
}
