//! Handlers for `/posts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/posts` | Optional `?status=pending\|published` and `?owner_id=<uuid>` |
//! | `POST` | `/posts` | Multipart form; optional `image` part goes to the media store |

use axum::{
  Json,
  extract::{Multipart, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use reclaim_core::{
  media::MediaStore,
  post::{NewPost, PostQuery, PostStatus, PostWithAuthor},
  store::BoardStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, store_err},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:   Option<PostStatus>,
  pub owner_id: Option<Uuid>,
}

/// `GET /posts[?status=published][&owner_id=<uuid>]`
///
/// With `owner_id` the status filter is ignored: owners always see all of
/// their own posts.
pub async fn list<S, M>(
  State(state): State<AppState<S, M>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let posts = state
    .store
    .list_posts(&PostQuery {
      status:   params.status,
      owner_id: params.owner_id,
    })
    .await
    .map_err(store_err)?;
  Ok(Json(posts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /posts` — multipart form with text parts `owner_id`, `title`,
/// `description`, optional `location` and `date_found` (`YYYY-MM-DD`), and an
/// optional `image` file part.
pub async fn create<S, M>(
  State(state): State<AppState<S, M>>,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore,
  M: MediaStore,
{
  let mut owner_id: Option<Uuid> = None;
  let mut title = String::new();
  let mut description = String::new();
  let mut location: Option<String> = None;
  let mut date_found: Option<NaiveDate> = None;
  let mut image: Option<(Vec<u8>, String)> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
  {
    let Some(name) = field.name().map(str::to_owned) else {
      continue;
    };
    match name.as_str() {
      "owner_id" => {
        let text = read_text(&name, field).await?;
        owner_id = Some(Uuid::parse_str(&text).map_err(|_| {
          ApiError::Validation(format!("owner_id is not a valid uuid: {text:?}"))
        })?);
      }
      "title" => title = read_text(&name, field).await?,
      "description" => description = read_text(&name, field).await?,
      "location" => location = Some(read_text(&name, field).await?),
      "date_found" => {
        let text = read_text(&name, field).await?;
        date_found =
          Some(NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| {
            ApiError::Validation(format!(
              "date_found must be YYYY-MM-DD, got {text:?}"
            ))
          })?);
      }
      "image" => {
        let content_type = field
          .content_type()
          .unwrap_or("application/octet-stream")
          .to_owned();
        let data = field.bytes().await.map_err(|e| {
          ApiError::Validation(format!("failed to read image part: {e}"))
        })?;
        image = Some((data.to_vec(), content_type));
      }
      // Unknown parts are ignored rather than rejected.
      _ => {}
    }
  }

  let owner_id = owner_id
    .ok_or_else(|| ApiError::Validation("owner_id is required".to_owned()))?;
  if title.trim().is_empty() {
    return Err(ApiError::Validation("title is required".to_owned()));
  }
  if description.trim().is_empty() {
    return Err(ApiError::Validation("description is required".to_owned()));
  }

  let image_ref = match image {
    Some((data, content_type)) => Some(
      state
        .media
        .store(data, &content_type)
        .await
        .map_err(|e| ApiError::Internal(format!("media store failed: {e}")))?,
    ),
    None => None,
  };

  let post = state
    .store
    .create_post(NewPost {
      owner_id,
      title,
      description,
      image_ref,
      location,
      date_found,
    })
    .await
    .map_err(store_err)?;

  tracing::info!(post_id = %post.post_id, "created post");
  Ok((StatusCode::CREATED, Json(post)))
}

async fn read_text(
  name: &str,
  field: axum::extract::multipart::Field<'_>,
) -> Result<String, ApiError> {
  field
    .text()
    .await
    .map_err(|e| ApiError::Validation(format!("failed to read {name:?}: {e}")))
}
