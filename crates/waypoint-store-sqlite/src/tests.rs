//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use uuid::Uuid;
use waypoint_core::{
  store::{TripStore, UserStore},
  trip::{NewTrip, TripPatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn paris() -> NewTrip {
  NewTrip {
    date:        NaiveDate::from_ymd_opt(2024, 5, 1),
    country:     Some("FR".into()),
    city:        Some("Paris".into()),
    description: None,
  }
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_trip() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let trip = s.create_trip(paris(), owner).await.unwrap();
  assert_eq!(trip.owner, owner);
  assert!(trip.users.is_empty());
  assert_eq!(trip.created_at, trip.updated_at);

  let fetched = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, trip.id);
  assert_eq!(fetched.owner, owner);
  assert_eq!(fetched.country.as_deref(), Some("FR"));
  assert_eq!(fetched.city.as_deref(), Some("Paris"));
  assert_eq!(fetched.date, NaiveDate::from_ymd_opt(2024, 5, 1));
  assert_eq!(fetched.description, None);
}

#[tokio::test]
async fn get_trip_missing_returns_none() {
  let s = store().await;
  let result = s.get_trip(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_trips_returns_every_owner() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  s.create_trip(paris(), alice).await.unwrap();
  s.create_trip(NewTrip::default(), bob).await.unwrap();
  s.create_trip(NewTrip::default(), alice).await.unwrap();

  let all = s.list_trips().await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn list_trips_owned_by_filters_on_owner() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let first = s.create_trip(paris(), alice).await.unwrap();
  s.create_trip(NewTrip::default(), bob).await.unwrap();
  let second = s.create_trip(NewTrip::default(), alice).await.unwrap();

  let owned = s.list_trips_owned_by(alice).await.unwrap();
  let ids: Vec<Uuid> = owned.iter().map(|t| t.id).collect();
  assert_eq!(ids, vec![first.id, second.id]);
  assert!(owned.iter().all(|t| t.owner == alice));

  assert!(s.list_trips_owned_by(Uuid::new_v4()).await.unwrap().is_empty());
}

// ─── Partial update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_touches_only_present_fields() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let trip = s.create_trip(paris(), owner).await.unwrap();

  let patch = TripPatch {
    description: Some(Some("Nice trip".into())),
    ..TripPatch::default()
  };
  s.update_trip(trip.id, patch).await.unwrap();

  let updated = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(updated.description.as_deref(), Some("Nice trip"));
  assert_eq!(updated.city.as_deref(), Some("Paris"));
  assert_eq!(updated.country.as_deref(), Some("FR"));
  assert_eq!(updated.date, trip.date);
  assert_eq!(updated.owner, owner);
  assert_eq!(updated.created_at, trip.created_at);
  assert!(updated.updated_at >= trip.updated_at);
}

#[tokio::test]
async fn update_with_explicit_null_clears_field() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();

  let patch = TripPatch {
    date: Some(None),
    city: Some(None),
    ..TripPatch::default()
  };
  s.update_trip(trip.id, patch).await.unwrap();

  let updated = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(updated.date, None);
  assert_eq!(updated.city, None);
  assert_eq!(updated.country.as_deref(), Some("FR"));
}

#[tokio::test]
async fn empty_patch_leaves_fields_alone() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();

  s.update_trip(trip.id, TripPatch::default()).await.unwrap();

  let updated = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(updated.city, trip.city);
  assert_eq!(updated.country, trip.country);
  assert_eq!(updated.date, trip.date);
}

// ─── Attendees ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_attendee_is_idempotent() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();
  let bob = Uuid::new_v4();

  s.add_attendee(trip.id, bob).await.unwrap();
  s.add_attendee(trip.id, bob).await.unwrap();

  let fetched = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(fetched.users, vec![bob]);
}

#[tokio::test]
async fn attendees_keep_join_order() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();
  let bob = Uuid::new_v4();
  let carol = Uuid::new_v4();

  s.add_attendee(trip.id, carol).await.unwrap();
  s.add_attendee(trip.id, bob).await.unwrap();

  let fetched = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(fetched.users, vec![carol, bob]);
}

#[tokio::test]
async fn remove_attendee() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();
  let bob = Uuid::new_v4();
  let carol = Uuid::new_v4();
  s.add_attendee(trip.id, bob).await.unwrap();
  s.add_attendee(trip.id, carol).await.unwrap();

  s.remove_attendee(trip.id, bob).await.unwrap();

  let fetched = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(fetched.users, vec![carol]);
}

#[tokio::test]
async fn remove_absent_attendee_is_a_no_op() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();
  let bob = Uuid::new_v4();
  s.add_attendee(trip.id, bob).await.unwrap();
  let before = s.get_trip(trip.id).await.unwrap().unwrap();

  s.remove_attendee(trip.id, Uuid::new_v4()).await.unwrap();

  let after = s.get_trip(trip.id).await.unwrap().unwrap();
  assert_eq!(after, before);
}

#[tokio::test]
async fn add_attendee_to_missing_trip_writes_nothing() {
  let s = store().await;
  let missing = Uuid::new_v4();

  s.add_attendee(missing, Uuid::new_v4()).await.unwrap();

  assert!(s.get_trip(missing).await.unwrap().is_none());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_trip_and_attendees() {
  let s = store().await;
  let trip = s.create_trip(paris(), Uuid::new_v4()).await.unwrap();
  let keep = s.create_trip(NewTrip::default(), Uuid::new_v4()).await.unwrap();
  s.add_attendee(trip.id, Uuid::new_v4()).await.unwrap();

  s.delete_trip(trip.id).await.unwrap();

  assert!(s.get_trip(trip.id).await.unwrap().is_none());
  let remaining = s.list_trips().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].id, keep.id);
}

#[tokio::test]
async fn delete_missing_trip_is_ok() {
  let s = store().await;
  s.delete_trip(Uuid::new_v4()).await.unwrap();
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_user_and_fetch_credentials() {
  let s = store().await;

  let user = s
    .add_user("alice@example.com".into(), "$argon2id$fake".into())
    .await
    .unwrap()
    .expect("email is free");
  assert_eq!(user.email, "alice@example.com");

  let creds = s
    .get_user_credentials("alice@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.user, user);
  assert_eq!(creds.password_hash, "$argon2id$fake");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.add_user("alice@example.com".into(), "h1".into())
    .await
    .unwrap()
    .unwrap();

  let second = s
    .add_user("alice@example.com".into(), "h2".into())
    .await
    .unwrap();
  assert!(second.is_none());
}

#[tokio::test]
async fn unknown_email_has_no_credentials() {
  let s = store().await;
  let creds = s.get_user_credentials("nobody@example.com".into()).await.unwrap();
  assert!(creds.is_none());
}

#[tokio::test]
async fn token_lookup_and_revocation() {
  let s = store().await;
  let user = s
    .add_user("alice@example.com".into(), "h".into())
    .await
    .unwrap()
    .unwrap();

  assert!(s.get_user_by_token("digest".into()).await.unwrap().is_none());

  s.set_user_token(user.id, Some("digest".into())).await.unwrap();
  let found = s.get_user_by_token("digest".into()).await.unwrap().unwrap();
  assert_eq!(found.id, user.id);

  s.set_user_token(user.id, None).await.unwrap();
  assert!(s.get_user_by_token("digest".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn set_user_password_replaces_hash() {
  let s = store().await;
  let user = s
    .add_user("alice@example.com".into(), "old".into())
    .await
    .unwrap()
    .unwrap();

  s.set_user_password(user.id, "new".into()).await.unwrap();

  let creds = s
    .get_user_credentials("alice@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.password_hash, "new");
}
