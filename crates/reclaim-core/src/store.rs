//! The `BoardStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `reclaim-store-sqlite`). Higher layers (`reclaim-api`, `reclaim-server`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  claim::{Claim, ClaimDecision, ClaimResolution, ClaimWithClaimant, NewClaim},
  post::{NewPost, Post, PostQuery, PostWithAuthor},
  user::{NewUser, User},
};

/// Abstraction over a Reclaim board backend.
///
/// Every operation is request-triggered and short-lived; the backend provides
/// whatever coordination it needs. The one multi-record transition —
/// approving a claim — must be atomic with respect to concurrent
/// `resolve_claim` and `set_post_approval` calls on the same post.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BoardStore: Send + Sync {
  type Error: std::error::Error
    + Into<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. The password hash is supplied by the caller.
  ///
  /// Fails with a username-taken error if the username already exists.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up a user by exact username. Returns `None` if not found.
  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new found-item report in the `Pending`/`Unclaimed` state.
  ///
  /// Fails with a user-not-found error if `owner_id` is unknown.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Retrieve a post by id. Returns `None` if not found.
  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// List posts matching `query`, most recently posted first, each enriched
  /// with the owner's username in one joined query.
  fn list_posts<'a>(
    &'a self,
    query: &'a PostQuery,
  ) -> impl Future<Output = Result<Vec<PostWithAuthor>, Self::Error>> + Send + 'a;

  /// Set a post's moderation state: `true` publishes, `false` returns it to
  /// `Pending`. Idempotent; no other field changes.
  fn set_post_approval(
    &self,
    id: Uuid,
    approve: bool,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  // ── Claims ────────────────────────────────────────────────────────────

  /// File a new `Pending` claim against a post.
  ///
  /// Fails if `reason` or `contact_info` is empty, or if the post or the
  /// claimant does not exist. Filing against an already-claimed post is
  /// permitted; such a claim can only ever be rejected.
  fn file_claim(
    &self,
    input: NewClaim,
  ) -> impl Future<Output = Result<Claim, Self::Error>> + Send + '_;

  /// All claims for a post, newest first, each enriched with the claimant's
  /// username.
  fn list_claims(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ClaimWithClaimant>, Self::Error>> + Send + '_;

  /// Retrieve a claim by id. Returns `None` if not found.
  fn get_claim(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Claim>, Self::Error>> + Send + '_;

  /// Resolve a claim.
  ///
  /// Rejection deletes the claim record and touches nothing else. Approval
  /// marks the claim approved, marks its post claimed, and deletes every
  /// competing claim for the same post — as one atomic unit. Approval fails
  /// if the post is already claimed.
  ///
  /// Approval is terminal: both decisions fail on an already-approved claim,
  /// since deleting it would leave a claimed post with no claim record.
  fn resolve_claim(
    &self,
    id: Uuid,
    decision: ClaimDecision,
  ) -> impl Future<Output = Result<ClaimResolution, Self::Error>> + Send + '_;
}
