//! Error types for `waypoint-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("trip not found: {0}")]
  TripNotFound(Uuid),

  #[error("user {requester} does not own trip {trip_id}")]
  NotOwner { trip_id: Uuid, requester: Uuid },

  #[error("invalid input: {0}")]
  Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
