//! Access-control checks applied by the trip routes.
//!
//! Mutating routes always call [`require_found`] before
//! [`require_ownership`], so a missing trip is reported as missing even to a
//! caller who could not have edited it anyway.

use uuid::Uuid;

use crate::{Error, Result, trip::Trip};

/// Turn the outcome of a lookup by id into an error if nothing was found.
pub fn require_found<T>(found: Option<T>, id: Uuid) -> Result<T> {
  found.ok_or(Error::TripNotFound(id))
}

/// Fail unless `requester` owns `trip`.
pub fn require_ownership(requester: Uuid, trip: &Trip) -> Result<()> {
  if trip.is_owned_by(requester) {
    Ok(())
  } else {
    Err(Error::NotOwner {
      trip_id: trip.id,
      requester,
    })
  }
}
