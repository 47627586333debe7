//! Handlers for `/admin` moderation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/admin/posts/pending` | Moderation queue, newest first |
//! | `GET` | `/admin/posts/approved` | Published posts, newest first |
//! | `GET` | `/admin/posts/:post_id/claims` | Claims with claimant usernames |
//! | `PATCH` | `/admin/posts/:post_id/approve` | Body `{"approve": bool}` |
//! | `PATCH` | `/admin/claims/:claim_id/approve` | Approve; discards competitors |
//! | `DELETE` | `/admin/claims/:claim_id` | Reject (delete) a claim |

use axum::{
  Json,
  extract::{Path, State},
};
use reclaim_core::{
  claim::{ClaimDecision, ClaimResolution, ClaimWithClaimant},
  media::MediaStore,
  post::{Post, PostQuery, PostStatus, PostWithAuthor},
  store::BoardStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, store_err},
};

// ─── Moderation queues ────────────────────────────────────────────────────────

/// `GET /admin/posts/pending`
pub async fn pending_posts<S, M>(
  State(state): State<AppState<S, M>>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let posts = state
    .store
    .list_posts(&PostQuery {
      status: Some(PostStatus::Pending),
      owner_id: None,
    })
    .await
    .map_err(store_err)?;
  Ok(Json(posts))
}

/// `GET /admin/posts/approved`
pub async fn approved_posts<S, M>(
  State(state): State<AppState<S, M>>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let posts = state
    .store
    .list_posts(&PostQuery {
      status: Some(PostStatus::Published),
      owner_id: None,
    })
    .await
    .map_err(store_err)?;
  Ok(Json(posts))
}

/// `GET /admin/posts/:post_id/claims`
pub async fn post_claims<S, M>(
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

// ─── Post approval ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
  pub approve: bool,
}

/// `PATCH /admin/posts/:post_id/approve` — body `{"approve": true|false}`.
pub async fn approve_post<S, M>(
  State(state): State<AppState<S, M>>,
  Path(post_id): Path<Uuid>,
  Json(body): Json<ApproveBody>,
) -> Result<Json<Post>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let post = state
    .store
    .set_post_approval(post_id, body.approve)
    .await
    .map_err(store_err)?;

  tracing::info!(post_id = %post.post_id, approve = body.approve, "moderated post");
  Ok(Json(post))
}

// ─── Claim resolution ─────────────────────────────────────────────────────────

/// `PATCH /admin/claims/:claim_id/approve`
pub async fn approve_claim<S, M>(
  State(state): State<AppState<S, M>>,
  Path(claim_id): Path<Uuid>,
) -> Result<Json<ClaimResolution>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let resolution = state
    .store
    .resolve_claim(claim_id, ClaimDecision::Approve)
    .await
    .map_err(store_err)?;

  tracing::info!(%claim_id, "approved claim");
  Ok(Json(resolution))
}

/// `DELETE /admin/claims/:claim_id`
pub async fn reject_claim<S, M>(
  State(state): State<AppState<S, M>>,
  Path(claim_id): Path<Uuid>,
) -> Result<Json<ClaimResolution>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let resolution = state
    .store
    .resolve_claim(claim_id, ClaimDecision::Reject)
    .await
    .map_err(store_err)?;

  tracing::info!(%claim_id, "rejected claim");
  Ok(Json(resolution))
}
