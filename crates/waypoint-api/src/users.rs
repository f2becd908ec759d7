//! Handlers for account endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/sign-up` | Body: `{"credentials":{"email","password","password_confirmation"}}`; 201 |
//! | `POST`   | `/sign-in` | Body: `{"credentials":{"email","password"}}`; 201 with a fresh token |
//! | `PATCH`  | `/change-password` | Body: `{"passwords":{"old","new"}}`; 204 |
//! | `DELETE` | `/sign-out` | Revokes the caller's token; 204 |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use waypoint_core::{store::UserStore, user::User};

use crate::{
  auth::{CurrentUser, generate_token, hash_password, token_digest, verify_password},
  error::ApiError,
  extract::JsonBody,
};

// ─── Bodies ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub credentials: SignUpCredentials,
}

#[derive(Debug, Deserialize)]
pub struct SignUpCredentials {
  pub email:                 String,
  pub password:              String,
  pub password_confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub credentials: SignInCredentials,
}

#[derive(Debug, Deserialize)]
pub struct SignInCredentials {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
  pub passwords: Passwords,
}

#[derive(Debug, Deserialize)]
pub struct Passwords {
  pub old: String,
  pub new: String,
}

/// A user as returned to clients; `token` is only present on sign-in.
#[derive(Debug, Serialize)]
pub struct UserView {
  #[serde(flatten)]
  pub user:  User,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
  pub user: UserView,
}

// ─── Sign up ──────────────────────────────────────────────────────────────────

/// `POST /sign-up`
pub async fn sign_up<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<SignUpBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  let SignUpCredentials {
    email,
    password,
    password_confirmation,
  } = body.credentials;

  let email = email.trim();
  if email.is_empty() {
    return Err(ApiError::Validation("email must not be blank".into()));
  }
  if password.is_empty() {
    return Err(ApiError::Validation("password must not be blank".into()));
  }
  if password != password_confirmation {
    return Err(ApiError::Validation(
      "password confirmation does not match".into(),
    ));
  }

  let hash = hash_password(&password)?;
  let user = store
    .add_user(email.to_owned(), hash)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Conflict(format!("{email} is already registered")))?;

  tracing::info!(user = %user.id, "user registered");
  Ok((
    StatusCode::CREATED,
    Json(UserEnvelope {
      user: UserView { user, token: None },
    }),
  ))
}

// ─── Sign in ──────────────────────────────────────────────────────────────────

/// `POST /sign-in`: issues a new token, replacing any previous one.
pub async fn sign_in<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<SignInBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  let SignInCredentials { email, password } = body.credentials;

  let creds = store
    .get_user_credentials(email.trim().to_owned())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&password, &creds.password_hash) {
    return Err(ApiError::Unauthorized);
  }

  let token = generate_token();
  store
    .set_user_token(creds.user.id, Some(token_digest(&token)))
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(user = %creds.user.id, "signed in");
  Ok((
    StatusCode::CREATED,
    Json(UserEnvelope {
      user: UserView {
        user:  creds.user,
        token: Some(token),
      },
    }),
  ))
}

// ─── Change password ──────────────────────────────────────────────────────────

/// `PATCH /change-password`: the current token stays valid.
pub async fn change_password<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<ChangePasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: UserStore + 'static,
{
  let Passwords { old, new } = body.passwords;

  let creds = store
    .get_user_credentials(caller.email.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&old, &creds.password_hash) {
    return Err(ApiError::Validation("old password is incorrect".into()));
  }
  if new.is_empty() {
    return Err(ApiError::Validation("new password must not be blank".into()));
  }

  let hash = hash_password(&new)?;
  store
    .set_user_password(caller.id, hash)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Sign out ─────────────────────────────────────────────────────────────────

/// `DELETE /sign-out`
pub async fn sign_out<S>(
  CurrentUser(caller): CurrentUser,
  State(store): State<Arc<S>>,
) -> Result<StatusCode, ApiError>
where
  S: UserStore + 'static,
{
  store
    .set_user_token(caller.id, None)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(user = %caller.id, "signed out");
  Ok(StatusCode::NO_CONTENT)
}
