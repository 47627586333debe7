//! Post — a found-item report submitted by a user.
//!
//! Moderation state and claimed-ness are separate tagged states rather than
//! booleans, so illegal combinations are unrepresentable. Posts are never
//! deleted; moderation flips `status`, claim resolution flips `claimed`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation state of a post. Only `Published` posts appear in the general
/// listing; the owner always sees their own posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
  Pending,
  Published,
}

/// Whether an approved claim has resolved ownership of the item.
/// `Claimed` is terminal; no operation reverses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimedState {
  Unclaimed,
  Claimed,
}

/// A found-item report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:     Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: String,
  /// Opaque reference returned by the media store; not interpreted here.
  pub image_ref:   Option<String>,
  pub location:    Option<String>,
  pub date_found:  Option<NaiveDate>,
  pub status:      PostStatus,
  pub claimed:     ClaimedState,
  pub posted_at:   DateTime<Utc>,
}

/// Input for [`BoardStore::create_post`](crate::store::BoardStore::create_post).
/// New posts always start `Pending` and `Unclaimed`.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: String,
  pub image_ref:   Option<String>,
  pub location:    Option<String>,
  pub date_found:  Option<NaiveDate>,
}

/// A post enriched with its owner's display username, resolved by the store
/// in a single joined query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAuthor {
  #[serde(flatten)]
  pub post:     Post,
  pub username: String,
}

/// Parameters for [`BoardStore::list_posts`](crate::store::BoardStore::list_posts).
///
/// When `owner_id` is set it takes precedence: the owner sees all of their
/// posts regardless of moderation state.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
  pub status:   Option<PostStatus>,
  pub owner_id: Option<Uuid>,
}
