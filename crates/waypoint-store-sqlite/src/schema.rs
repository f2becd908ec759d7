//! SQL schema for the Waypoint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- argon2 PHC string
    token_digest  TEXT UNIQUE,        -- hex SHA-256 of the live bearer token
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS trips (
    trip_id     TEXT PRIMARY KEY,
    trip_date   TEXT,                 -- YYYY-MM-DD or NULL
    country     TEXT,
    city        TEXT,
    description TEXT,
    owner       TEXT NOT NULL,        -- never updated after insert
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- One row per (trip, attendee); the primary key makes RSVPs a set.
CREATE TABLE IF NOT EXISTS trip_attendees (
    trip_id   TEXT NOT NULL REFERENCES trips(trip_id) ON DELETE CASCADE,
    user_id   TEXT NOT NULL,
    joined_at TEXT NOT NULL,
    PRIMARY KEY (trip_id, user_id)
);

CREATE INDEX IF NOT EXISTS trips_owner_idx   ON trips(owner);
CREATE INDEX IF NOT EXISTS trips_created_idx ON trips(created_at);

PRAGMA user_version = 1;
";
