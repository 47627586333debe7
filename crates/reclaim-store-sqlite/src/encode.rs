//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase strings. State
//! enums are stored as their lowercase names.

use chrono::{DateTime, NaiveDate, Utc};
use reclaim_core::{
  claim::{Claim, ClaimStatus, ClaimWithClaimant},
  post::{ClaimedState, Post, PostStatus, PostWithAuthor},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PostStatus ──────────────────────────────────────────────────────────────

pub fn encode_post_status(s: PostStatus) -> &'static str {
  match s {
    PostStatus::Pending => "pending",
    PostStatus::Published => "published",
  }
}

pub fn decode_post_status(s: &str) -> Result<PostStatus> {
  match s {
    "pending" => Ok(PostStatus::Pending),
    "published" => Ok(PostStatus::Published),
    other => Err(Error::DateParse(format!("unknown post status: {other:?}"))),
  }
}

// ─── ClaimedState ────────────────────────────────────────────────────────────

pub fn encode_claimed_state(s: ClaimedState) -> &'static str {
  match s {
    ClaimedState::Unclaimed => "unclaimed",
    ClaimedState::Claimed => "claimed",
  }
}

pub fn decode_claimed_state(s: &str) -> Result<ClaimedState> {
  match s {
    "unclaimed" => Ok(ClaimedState::Unclaimed),
    "claimed" => Ok(ClaimedState::Claimed),
    other => Err(Error::DateParse(format!("unknown claimed state: {other:?}"))),
  }
}

// ─── ClaimStatus ─────────────────────────────────────────────────────────────

pub fn encode_claim_status(s: ClaimStatus) -> &'static str {
  match s {
    ClaimStatus::Pending => "pending",
    ClaimStatus::Approved => "approved",
  }
}

pub fn decode_claim_status(s: &str) -> Result<ClaimStatus> {
  match s {
    "pending" => Ok(ClaimStatus::Pending),
    "approved" => Ok(ClaimStatus::Approved),
    other => Err(Error::DateParse(format!("unknown claim status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub is_admin:      bool,
  pub email:         String,
  pub phone:         Option<String>,
  pub registered_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      is_admin:      self.is_admin,
      email:         self.email,
      phone:         self.phone,
      registered_at: decode_dt(&self.registered_at)?,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:     String,
  pub owner_id:    String,
  pub title:       String,
  pub description: String,
  pub image_ref:   Option<String>,
  pub location:    Option<String>,
  pub date_found:  Option<String>,
  pub status:      String,
  pub claimed:     String,
  pub posted_at:   String,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:     decode_uuid(&self.post_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      title:       self.title,
      description: self.description,
      image_ref:   self.image_ref,
      location:    self.location,
      date_found:  self.date_found.as_deref().map(decode_date).transpose()?,
      status:      decode_post_status(&self.status)?,
      claimed:     decode_claimed_state(&self.claimed)?,
      posted_at:   decode_dt(&self.posted_at)?,
    })
  }
}

/// A `posts` row joined with the owner's username.
pub struct RawAuthoredPost {
  pub post:     RawPost,
  pub username: String,
}

impl RawAuthoredPost {
  pub fn into_authored(self) -> Result<PostWithAuthor> {
    Ok(PostWithAuthor {
      post:     self.post.into_post()?,
      username: self.username,
    })
  }
}

/// Raw strings read directly from a `claims` row.
pub struct RawClaim {
  pub claim_id:     String,
  pub post_id:      String,
  pub claimant_id:  String,
  pub reason:       String,
  pub contact_info: String,
  pub status:       String,
  pub filed_at:     String,
}

impl RawClaim {
  pub fn into_claim(self) -> Result<Claim> {
    Ok(Claim {
      claim_id:     decode_uuid(&self.claim_id)?,
      post_id:      decode_uuid(&self.post_id)?,
      claimant_id:  decode_uuid(&self.claimant_id)?,
      reason:       self.reason,
      contact_info: self.contact_info,
      status:       decode_claim_status(&self.status)?,
      filed_at:     decode_dt(&self.filed_at)?,
    })
  }
}

/// A `claims` row joined with the claimant's username.
pub struct RawAttributedClaim {
  pub claim:    RawClaim,
  pub username: String,
}

impl RawAttributedClaim {
  pub fn into_attributed(self) -> Result<ClaimWithClaimant> {
    Ok(ClaimWithClaimant {
      claim:    self.claim.into_claim()?,
      username: self.username,
    })
  }
}
