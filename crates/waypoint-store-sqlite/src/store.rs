//! [`SqliteStore`]: the SQLite implementation of [`TripStore`] and
//! [`UserStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use waypoint_core::{
  store::{TripStore, UserStore},
  trip::{NewTrip, Trip, TripPatch},
  user::{User, UserCredentials},
};

use crate::{
  Result,
  encode::{RawTrip, RawUser, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Waypoint store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_trips(&self, filter: TripFilter) -> Result<Vec<Trip>> {
    let raws: Vec<RawTrip> = self
      .conn
      .call(move |conn| Ok(load_trips(conn, &filter)?))
      .await?;

    raws.into_iter().map(RawTrip::into_trip).collect()
  }

  async fn fetch_user(&self, column: UserKey, value: String) -> Result<Option<RawUser>> {
    let sql = format!(
      "SELECT user_id, email, password_hash, created_at FROM users WHERE {} = ?1",
      column.as_column(),
    );

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![value], |row| {
            Ok(RawUser {
              user_id:       row.get(0)?,
              email:         row.get(1)?,
              password_hash: row.get(2)?,
              created_at:    row.get(3)?,
            })
          })
          .optional()?)
      })
      .await?;

    Ok(raw)
  }
}

// ─── Row loading ─────────────────────────────────────────────────────────────

enum TripFilter {
  All,
  OwnedBy(String),
  Id(String),
}

#[derive(Clone, Copy)]
enum UserKey {
  Email,
  TokenDigest,
}

impl UserKey {
  fn as_column(self) -> &'static str {
    match self {
      UserKey::Email => "email",
      UserKey::TokenDigest => "token_digest",
    }
  }
}

/// Read the trips matching `filter`, each with its attendees in join order.
fn load_trips(
  conn:   &rusqlite::Connection,
  filter: &TripFilter,
) -> rusqlite::Result<Vec<RawTrip>> {
  const SELECT: &str = "SELECT trip_id, trip_date, country, city, description,
                               owner, created_at, updated_at
                        FROM trips";

  let (sql, arg) = match filter {
    TripFilter::All => (format!("{SELECT} ORDER BY created_at, rowid"), None),
    TripFilter::OwnedBy(owner) => (
      format!("{SELECT} WHERE owner = ?1 ORDER BY created_at, rowid"),
      Some(owner.as_str()),
    ),
    TripFilter::Id(id) => (format!("{SELECT} WHERE trip_id = ?1"), Some(id.as_str())),
  };

  let map_row = |row: &rusqlite::Row<'_>| {
    Ok(RawTrip {
      trip_id:     row.get(0)?,
      trip_date:   row.get(1)?,
      country:     row.get(2)?,
      city:        row.get(3)?,
      description: row.get(4)?,
      owner:       row.get(5)?,
      created_at:  row.get(6)?,
      updated_at:  row.get(7)?,
      users:       Vec::new(),
    })
  };

  let mut stmt = conn.prepare(&sql)?;
  let mut trips = match arg {
    Some(a) => stmt
      .query_map(rusqlite::params![a], map_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?,
    None => stmt
      .query_map([], map_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?,
  };

  let mut attendees = conn.prepare_cached(
    "SELECT user_id FROM trip_attendees WHERE trip_id = ?1 ORDER BY rowid",
  )?;
  for trip in &mut trips {
    trip.users = attendees
      .query_map(rusqlite::params![trip.trip_id], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
  }

  Ok(trips)
}

// ─── TripStore impl ──────────────────────────────────────────────────────────

impl TripStore for SqliteStore {
  type Error = crate::Error;

  async fn create_trip(&self, input: NewTrip, owner: Uuid) -> Result<Trip> {
    let now = Utc::now();
    let trip = Trip {
      id:          Uuid::new_v4(),
      date:        input.date,
      country:     input.country,
      city:        input.city,
      description: input.description,
      owner,
      users:       Vec::new(),
      created_at:  now,
      updated_at:  now,
    };

    let id_str      = encode_uuid(trip.id);
    let date_str    = trip.date.map(encode_date);
    let country     = trip.country.clone();
    let city        = trip.city.clone();
    let description = trip.description.clone();
    let owner_str   = encode_uuid(owner);
    let at_str      = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO trips (
             trip_id, trip_date, country, city, description,
             owner, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            id_str,
            date_str,
            country,
            city,
            description,
            owner_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(trip)
  }

  async fn list_trips(&self) -> Result<Vec<Trip>> {
    self.fetch_trips(TripFilter::All).await
  }

  async fn list_trips_owned_by(&self, owner: Uuid) -> Result<Vec<Trip>> {
    self.fetch_trips(TripFilter::OwnedBy(encode_uuid(owner))).await
  }

  async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>> {
    Ok(self.fetch_trips(TripFilter::Id(encode_uuid(id))).await?.pop())
  }

  async fn update_trip(&self, id: Uuid, patch: TripPatch) -> Result<()> {
    // Build the SET clause from the fields present in the patch. `owner` has
    // no counterpart in `TripPatch`, so it can never appear here.
    let mut columns: Vec<&'static str> = vec![];
    let mut values: Vec<Option<String>> = vec![];

    if let Some(date) = patch.date {
      columns.push("trip_date");
      values.push(date.map(encode_date));
    }
    if let Some(country) = patch.country {
      columns.push("country");
      values.push(country);
    }
    if let Some(city) = patch.city {
      columns.push("city");
      values.push(city);
    }
    if let Some(description) = patch.description {
      columns.push("description");
      values.push(description);
    }
    columns.push("updated_at");
    values.push(Some(encode_dt(Utc::now())));

    let assignments = columns
      .iter()
      .enumerate()
      .map(|(i, column)| format!("{column} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    values.push(Some(encode_uuid(id)));
    let sql = format!(
      "UPDATE trips SET {assignments} WHERE trip_id = ?{}",
      values.len()
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_attendee(&self, id: Uuid, user: Uuid) -> Result<()> {
    let id_str   = encode_uuid(id);
    let user_str = encode_uuid(user);
    let at_str   = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT OR IGNORE INTO trip_attendees (trip_id, user_id, joined_at)
           SELECT ?1, ?2, ?3
           WHERE EXISTS (SELECT 1 FROM trips WHERE trip_id = ?1)",
          rusqlite::params![id_str, user_str, at_str],
        )?;
        if inserted > 0 {
          tx.execute(
            "UPDATE trips SET updated_at = ?2 WHERE trip_id = ?1",
            rusqlite::params![id_str, at_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_attendee(&self, id: Uuid, user: Uuid) -> Result<()> {
    let id_str   = encode_uuid(id);
    let user_str = encode_uuid(user);
    let at_str   = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM trip_attendees WHERE trip_id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user_str],
        )?;
        if removed > 0 {
          tx.execute(
            "UPDATE trips SET updated_at = ?2 WHERE trip_id = ?1",
            rusqlite::params![id_str, at_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_trip(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        // Attendee rows go with it via ON DELETE CASCADE.
        conn.execute(
          "DELETE FROM trips WHERE trip_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = crate::Error;

  async fn add_user(&self, email: String, password_hash: String) -> Result<Option<User>> {
    let user = User {
      id:         Uuid::new_v4(),
      email:      email.clone(),
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(user.id);
    let at_str = encode_dt(user.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![id_str, email, password_hash, at_str],
        )?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn get_user_credentials(&self, email: String) -> Result<Option<UserCredentials>> {
    self
      .fetch_user(UserKey::Email, email)
      .await?
      .map(RawUser::into_credentials)
      .transpose()
  }

  async fn get_user_by_token(&self, token_digest: String) -> Result<Option<User>> {
    self
      .fetch_user(UserKey::TokenDigest, token_digest)
      .await?
      .map(RawUser::into_user)
      .transpose()
  }

  async fn set_user_token(&self, user: Uuid, token_digest: Option<String>) -> Result<()> {
    let id_str = encode_uuid(user);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET token_digest = ?2, updated_at = ?3 WHERE user_id = ?1",
          rusqlite::params![id_str, token_digest, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_user_password(&self, user: Uuid, password_hash: String) -> Result<()> {
    let id_str = encode_uuid(user);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE user_id = ?1",
          rusqlite::params![id_str, password_hash, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
