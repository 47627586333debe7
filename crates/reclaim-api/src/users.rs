//! Handlers for registration and login.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | 201 + profile; 400 if the username is taken |
//! | `POST` | `/login` | 200 + profile; 401 on bad credentials |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use reclaim_core::{
  media::MediaStore,
  store::BoardStore,
  user::{NewUser, UserProfile},
};
use serde::Deserialize;

use crate::{
  AppState, auth,
  error::{ApiError, store_err},
};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: String,
  pub password: String,
  pub email:    String,
  pub phone:    Option<String>,
  #[serde(default)]
  pub is_admin: bool,
}

/// `POST /register`
pub async fn register<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  for (name, value) in [
    ("username", &body.username),
    ("password", &body.password),
    ("email", &body.email),
  ] {
    if value.trim().is_empty() {
      return Err(ApiError::Validation(format!(
        "required field {name:?} is missing or empty"
      )));
    }
  }

  let password_hash = auth::hash_password(&body.password)?;
  let user = state
    .store
    .create_user(NewUser {
      username: body.username,
      password_hash,
      is_admin: body.is_admin,
      email: body.email,
      phone: body.phone,
    })
    .await
    .map_err(store_err)?;

  tracing::info!(username = %user.username, "registered user");
  Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /login` — the response never carries the stored hash, and the error
/// never says whether the username or the password was wrong.
pub async fn login<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<UserProfile>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let user = state
    .store
    .find_user_by_username(&body.username)
    .await
    .map_err(store_err)?
    .ok_or(ApiError::InvalidCredentials)?;

  if !auth::verify_password(&body.password, &user.password_hash) {
    return Err(ApiError::InvalidCredentials);
  }

  Ok(Json(UserProfile::from(user)))
}
