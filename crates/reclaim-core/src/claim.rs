//! Claim — a user's assertion of ownership over a specific post.
//!
//! A stored claim is either `Pending` or `Approved`. Rejection removes the
//! record entirely, so a rejected claim has no stored representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a stored claim. `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
  Pending,
  Approved,
}

impl ClaimStatus {
  pub fn is_approved(&self) -> bool { matches!(self, Self::Approved) }
}

/// An ownership assertion against a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
  pub claim_id:     Uuid,
  pub post_id:      Uuid,
  pub claimant_id:  Uuid,
  pub reason:       String,
  pub contact_info: String,
  pub status:       ClaimStatus,
  pub filed_at:     DateTime<Utc>,
}

/// Input for [`BoardStore::file_claim`](crate::store::BoardStore::file_claim).
#[derive(Debug, Clone)]
pub struct NewClaim {
  pub post_id:      Uuid,
  pub claimant_id:  Uuid,
  pub reason:       String,
  pub contact_info: String,
}

/// A claim enriched with the claimant's display username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimWithClaimant {
  #[serde(flatten)]
  pub claim:    Claim,
  pub username: String,
}

/// The administrator's verdict on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
  Approve,
  Reject,
}

/// Outcome of [`BoardStore::resolve_claim`](crate::store::BoardStore::resolve_claim).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClaimResolution {
  /// The claim was approved; its post is now claimed and `discarded`
  /// competing claims were removed.
  Approved { claim: Claim, discarded: usize },
  /// The claim record was deleted; nothing else was touched.
  Rejected,
}
