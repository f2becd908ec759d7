//! Helpers for turning loosely-shaped client JSON into typed patches.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Recursively remove object keys whose value is the empty string.
///
/// Only `""` counts as blank: `null`, `false`, `0` and whitespace-only strings
/// are kept. Arrays are walked so objects nested inside them are cleaned too,
/// but blank array elements themselves are left in place.
pub fn strip_blank_fields(value: Value) -> Value {
  match value {
    Value::Object(map) => Value::Object(
      map
        .into_iter()
        .filter(|(_, v)| !is_blank(v))
        .map(|(k, v)| (k, strip_blank_fields(v)))
        .collect(),
    ),
    Value::Array(items) => {
      Value::Array(items.into_iter().map(strip_blank_fields).collect())
    }
    other => other,
  }
}

fn is_blank(value: &Value) -> bool {
  matches!(value, Value::String(s) if s.is_empty())
}

/// Deserialize a present key into `Some(..)`, so that together with
/// `#[serde(default)]` an explicit `null` (`Some(None)`) can be told apart from
/// an absent key (`None`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize an optional `YYYY-MM-DD` date, with an error that names the
/// field and the accepted format.
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let Some(raw) = Option::<String>::deserialize(deserializer)? else {
    return Ok(None);
  };
  NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
    .map(Some)
    .map_err(|_| D::Error::custom(format!("date must be YYYY-MM-DD, got {raw:?}")))
}

/// [`optional_date`] for patches: see [`nullable`].
pub(crate) fn nullable_date<'de, D>(
  deserializer: D,
) -> Result<Option<Option<NaiveDate>>, D::Error>
where
  D: Deserializer<'de>,
{
  optional_date(deserializer).map(Some)
}
