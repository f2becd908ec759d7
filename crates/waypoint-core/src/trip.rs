//! Trip: the sole persisted resource.
//!
//! A trip has exactly one owner, fixed at creation, and a set of attendees
//! who joined it themselves. Client input never reaches a [`Trip`] directly:
//! it is first narrowed to a [`NewTrip`] or a [`TripPatch`], neither of which
//! can express `id`, `owner`, `users` or the timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  patch::{nullable, nullable_date, optional_date, strip_blank_fields},
};

// ─── Stored representation ───────────────────────────────────────────────────

/// A persisted trip as returned by a [`TripStore`](crate::store::TripStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
  pub id:          Uuid,
  pub date:        Option<NaiveDate>,
  pub country:     Option<String>,
  pub city:        Option<String>,
  pub description: Option<String>,
  /// The creating user. Never changes after creation.
  pub owner:       Uuid,
  /// Attendees in the order they joined. Never contains duplicates.
  pub users:       Vec<Uuid>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Trip {
  pub fn is_owned_by(&self, user: Uuid) -> bool { self.owner == user }
}

// ─── Creation input ──────────────────────────────────────────────────────────

/// The client-controlled fields of a trip being created.
///
/// The owner is not part of this type; stores take it as a separate argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTrip {
  #[serde(default, deserialize_with = "optional_date")]
  pub date:        Option<NaiveDate>,
  pub country:     Option<String>,
  pub city:        Option<String>,
  pub description: Option<String>,
}

impl NewTrip {
  /// Narrow an arbitrary client-supplied JSON object to a [`NewTrip`].
  ///
  /// Unknown keys (including `owner`, `id` and `users`) are ignored.
  pub fn from_json(value: Value) -> Result<Self> {
    serde_json::from_value(value).map_err(|e| Error::Validation(e.to_string()))
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// A partial update to a trip's editable fields.
///
/// Each field distinguishes three cases:
/// - `None`: the key was absent, leave the stored value alone;
/// - `Some(None)`: the key was an explicit `null`, clear the stored value;
/// - `Some(Some(v))`: overwrite with `v`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TripPatch {
  #[serde(default, deserialize_with = "nullable_date")]
  pub date:        Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "nullable")]
  pub country:     Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub city:        Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub description: Option<Option<String>>,
}

impl TripPatch {
  /// Build a patch from a client-supplied JSON object.
  ///
  /// Keys holding an empty string are dropped first, so a half-filled form
  /// never blanks out stored fields. Keys outside the editable set are
  /// ignored.
  pub fn from_json(value: Value) -> Result<Self> {
    serde_json::from_value(strip_blank_fields(value))
      .map_err(|e| Error::Validation(e.to_string()))
  }

  /// `true` if applying this patch would leave every field untouched.
  pub fn is_empty(&self) -> bool {
    self.date.is_none()
      && self.country.is_none()
      && self.city.is_none()
      && self.description.is_none()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn new_trip_ignores_owner_and_users() {
    let input = NewTrip::from_json(json!({
      "country": "FR",
      "city":    "Paris",
      "date":    "2024-05-01",
      "owner":   Uuid::new_v4(),
      "users":   [Uuid::new_v4()],
    }))
    .unwrap();

    assert_eq!(input.country.as_deref(), Some("FR"));
    assert_eq!(input.city.as_deref(), Some("Paris"));
    assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(input.description, None);
  }

  #[test]
  fn new_trip_rejects_bad_date() {
    let err = NewTrip::from_json(json!({ "date": "next tuesday" })).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn blank_date_error_names_the_format() {
    let Error::Validation(message) = NewTrip::from_json(json!({ "date": "" })).unwrap_err() else {
      panic!("expected a validation error");
    };
    assert!(message.contains("date must be YYYY-MM-DD"), "{message}");

    let Error::Validation(message) =
      TripPatch::from_json(json!({ "date": "01/05/2024" })).unwrap_err()
    else {
      panic!("expected a validation error");
    };
    assert!(message.contains("date must be YYYY-MM-DD"), "{message}");
  }

  #[test]
  fn null_date_is_accepted() {
    assert_eq!(NewTrip::from_json(json!({ "date": null })).unwrap().date, None);
    assert_eq!(TripPatch::from_json(json!({ "date": null })).unwrap().date, Some(None));
  }

  #[test]
  fn new_trip_rejects_non_object() {
    let err = NewTrip::from_json(json!("Paris")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn patch_drops_blank_strings_and_owner() {
    let patch = TripPatch::from_json(json!({
      "city":        "",
      "description": "Nice trip",
      "owner":       Uuid::new_v4(),
    }))
    .unwrap();

    assert_eq!(patch, TripPatch {
      description: Some(Some("Nice trip".into())),
      ..TripPatch::default()
    });
  }

  #[test]
  fn patch_keeps_explicit_null() {
    let patch = TripPatch::from_json(json!({ "country": null })).unwrap();
    assert_eq!(patch.country, Some(None));
    assert_eq!(patch.city, None);
  }

  #[test]
  fn patch_of_only_blanks_is_empty() {
    let patch = TripPatch::from_json(json!({
      "date":    "",
      "country": "",
      "city":    "",
    }))
    .unwrap();
    assert!(patch.is_empty());
  }

  #[test]
  fn patch_rejects_wrong_types() {
    let err = TripPatch::from_json(json!({ "city": 42 })).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn trip_serialises_camel_case() {
    let now = Utc::now();
    let trip = Trip {
      id:          Uuid::nil(),
      date:        None,
      country:     Some("FR".into()),
      city:        None,
      description: None,
      owner:       Uuid::nil(),
      users:       vec![],
      created_at:  now,
      updated_at:  now,
    };
    let v = serde_json::to_value(&trip).unwrap();
    assert!(v.get("createdAt").is_some());
    assert!(v.get("updatedAt").is_some());
    assert_eq!(v["users"], json!([]));
    assert_eq!(v["date"], Value::Null);
  }
}
