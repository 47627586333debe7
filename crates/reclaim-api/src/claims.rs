//! Handlers for `/claims` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/claims` | Body: [`NewClaimBody`]; 404 if the post is unknown |
//! | `GET`  | `/claims/:post_id` | All claims for a post, newest first |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use reclaim_core::{
  claim::{ClaimWithClaimant, NewClaim},
  media::MediaStore,
  store::BoardStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, store_err},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewClaimBody {
  pub post_id:      Uuid,
  pub claimant_id:  Uuid,
  pub reason:       String,
  pub contact_info: String,
}

/// `POST /claims` — returns 201 + the stored pending claim.
pub async fn create<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<NewClaimBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let claim = state
    .store
    .file_claim(NewClaim {
      post_id:      body.post_id,
      claimant_id:  body.claimant_id,
      reason:       body.reason,
      contact_info: body.contact_info,
    })
    .await
    .map_err(store_err)?;

  Ok((StatusCode::CREATED, Json(claim)))
}

// ─── List for post ────────────────────────────────────────────────────────────

/// `GET /claims/:post_id`
pub async fn list_for_post<S, M>(
  State(state): State<AppState<S, M>>,
  Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<ClaimWithClaimant>>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let claims = state
    .store
    .list_claims(post_id)
    .await
    .map_err(store_err)?;
  Ok(Json(claims))
}
