//! Error types for `reclaim-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("post not found: {0}")]
  PostNotFound(Uuid),

  #[error("claim not found: {0}")]
  ClaimNotFound(Uuid),

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),

  #[error("required field {0:?} is missing or empty")]
  MissingField(&'static str),

  /// The claim's parent post is already claimed by someone else.
  #[error("post {0} is already claimed")]
  PostAlreadyClaimed(Uuid),

  /// Approval is terminal: an approved claim can be neither re-resolved nor
  /// rejected. Deleting it would leave its post claimed with no claim record.
  #[error("claim {0} is already approved")]
  ClaimAlreadyApproved(Uuid),

  /// A claim references a post that no longer exists. Referential integrity
  /// keeps this unreachable in normal operation; surfacing it means the data
  /// needs operator reconciliation, not a retry.
  #[error("claim {claim_id} references missing post {post_id}")]
  MissingClaimTarget { claim_id: Uuid, post_id: Uuid },

  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
