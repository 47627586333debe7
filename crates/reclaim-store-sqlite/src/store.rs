//! [`SqliteStore`] — the SQLite implementation of [`BoardStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use reclaim_core::{
  claim::{Claim, ClaimDecision, ClaimResolution, ClaimStatus, ClaimWithClaimant, NewClaim},
  post::{ClaimedState, NewPost, Post, PostQuery, PostStatus, PostWithAuthor},
  store::BoardStore,
  user::{NewUser, User},
};

use crate::{
  encode::{
    encode_claim_status, encode_claimed_state, encode_date, encode_dt,
    encode_post_status, encode_uuid, RawAttributedClaim, RawAuthoredPost,
    RawClaim, RawPost, RawUser,
  },
  schema::SCHEMA,
  Error, Result,
};

const POST_COLUMNS: &str = "post_id, owner_id, title, description, image_ref, \
                            location, date_found, status, claimed, posted_at";

const CLAIM_COLUMNS: &str =
  "claim_id, post_id, claimant_id, reason, contact_info, status, filed_at";

fn read_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPost> {
  Ok(RawPost {
    post_id:     row.get(0)?,
    owner_id:    row.get(1)?,
    title:       row.get(2)?,
    description: row.get(3)?,
    image_ref:   row.get(4)?,
    location:    row.get(5)?,
    date_found:  row.get(6)?,
    status:      row.get(7)?,
    claimed:     row.get(8)?,
    posted_at:   row.get(9)?,
  })
}

fn read_claim_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawClaim> {
  Ok(RawClaim {
    claim_id:     row.get(0)?,
    post_id:      row.get(1)?,
    claimant_id:  row.get(2)?,
    reason:       row.get(3)?,
    contact_info: row.get(4)?,
    status:       row.get(5)?,
    filed_at:     row.get(6)?,
  })
}

fn read_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    username:      row.get(1)?,
    password_hash: row.get(2)?,
    is_admin:      row.get(3)?,
    email:         row.get(4)?,
    phone:         row.get(5)?,
    registered_at: row.get(6)?,
  })
}

// Outcomes smuggled out of `conn.call` closures so domain failures are not
// conflated with database errors.

enum FileOutcome {
  Filed,
  MissingPost,
  MissingClaimant,
}

enum RejectOutcome {
  NoClaim,
  AlreadyApproved,
  Rejected,
}

enum ApproveOutcome {
  NoClaim,
  NoPost { post_id: String },
  AlreadyClaimed { post_id: String },
  Approved { claim: RawClaim, discarded: usize },
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Reclaim board store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// funnel through one connection thread, and the claim-approval path runs in
/// an explicit transaction, so two concurrent approvals on claims for the
/// same post cannot both succeed.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── BoardStore impl ─────────────────────────────────────────────────────────

impl BoardStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      is_admin:      input.is_admin,
      email:         input.email,
      phone:         input.phone,
      registered_at: Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let hash     = user.password_hash.clone();
    let is_admin = user.is_admin;
    let email    = user.email.clone();
    let phone    = user.phone.clone();
    let at_str   = encode_dt(user.registered_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO users (
             user_id, username, password_hash, is_admin, email, phone,
             registered_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, username, hash, is_admin, email, phone, at_str,
          ],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::Core(reclaim_core::Error::UsernameTaken(
        user.username,
      )));
    }
    Ok(user)
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, password_hash, is_admin, email, phone,
                    registered_at
             FROM users WHERE username = ?1",
            rusqlite::params![username],
            read_user_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, password_hash, is_admin, email, phone,
                    registered_at
             FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            read_user_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:     Uuid::new_v4(),
      owner_id:    input.owner_id,
      title:       input.title,
      description: input.description,
      image_ref:   input.image_ref,
      location:    input.location,
      date_found:  input.date_found,
      status:      PostStatus::Pending,
      claimed:     ClaimedState::Unclaimed,
      posted_at:   Utc::now(),
    };

    let id_str       = encode_uuid(post.post_id);
    let owner_str    = encode_uuid(post.owner_id);
    let title        = post.title.clone();
    let description  = post.description.clone();
    let image_ref    = post.image_ref.clone();
    let location     = post.location.clone();
    let date_str     = post.date_found.map(encode_date);
    let status_str   = encode_post_status(post.status).to_owned();
    let claimed_str  = encode_claimed_state(post.claimed).to_owned();
    let at_str       = encode_dt(post.posted_at);

    let owner_exists: bool = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![owner_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO posts (
             post_id, owner_id, title, description, image_ref, location,
             date_found, status, claimed, posted_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            owner_str,
            title,
            description,
            image_ref,
            location,
            date_str,
            status_str,
            claimed_str,
            at_str,
          ],
        )?;
        Ok(true)
      })
      .await?;

    if !owner_exists {
      return Err(Error::Core(reclaim_core::Error::UserNotFound(
        post.owner_id,
      )));
    }
    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1"),
            rusqlite::params![id_str],
            read_post_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self, query: &PostQuery) -> Result<Vec<PostWithAuthor>> {
    let owner_str  = query.owner_id.map(encode_uuid);
    let status_str = query.status.map(encode_post_status).map(str::to_owned);

    let raws: Vec<RawAuthoredPost> = self
      .conn
      .call(move |conn| {
        let select = "SELECT
             p.post_id, p.owner_id, p.title, p.description, p.image_ref,
             p.location, p.date_found, p.status, p.claimed, p.posted_at,
             u.username
           FROM posts p JOIN users u ON u.user_id = p.owner_id";

        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawAuthoredPost {
            post:     read_post_row(row)?,
            username: row.get(10)?,
          })
        };

        // Owner filter wins: the owner sees all of their posts regardless
        // of moderation state.
        let rows = if let Some(owner) = owner_str {
          let mut stmt = conn.prepare(&format!(
            "{select} WHERE p.owner_id = ?1 ORDER BY p.posted_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![owner], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else if let Some(status) = status_str {
          let mut stmt = conn.prepare(&format!(
            "{select} WHERE p.status = ?1 ORDER BY p.posted_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![status], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("{select} ORDER BY p.posted_at DESC"))?;
          stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuthoredPost::into_authored).collect()
  }

  async fn set_post_approval(&self, id: Uuid, approve: bool) -> Result<Post> {
    let id_str = encode_uuid(id);
    let status = if approve {
      PostStatus::Published
    } else {
      PostStatus::Pending
    };
    let status_str = encode_post_status(status).to_owned();

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE posts SET status = ?1 WHERE post_id = ?2",
          rusqlite::params![status_str, id_str],
        )?;
        Ok(
          conn
            .query_row(
              &format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1"),
              rusqlite::params![id_str],
              read_post_row,
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some(raw) => raw.into_post(),
      None => Err(Error::Core(reclaim_core::Error::PostNotFound(id))),
    }
  }

  // ── Claims ────────────────────────────────────────────────────────────────

  async fn file_claim(&self, input: NewClaim) -> Result<Claim> {
    if input.reason.trim().is_empty() {
      return Err(Error::Core(reclaim_core::Error::MissingField("reason")));
    }
    if input.contact_info.trim().is_empty() {
      return Err(Error::Core(reclaim_core::Error::MissingField(
        "contact_info",
      )));
    }

    let claim = Claim {
      claim_id:     Uuid::new_v4(),
      post_id:      input.post_id,
      claimant_id:  input.claimant_id,
      reason:       input.reason,
      contact_info: input.contact_info,
      status:       ClaimStatus::Pending,
      filed_at:     Utc::now(),
    };

    let id_str       = encode_uuid(claim.claim_id);
    let post_str     = encode_uuid(claim.post_id);
    let claimant_str = encode_uuid(claim.claimant_id);
    let reason       = claim.reason.clone();
    let contact      = claim.contact_info.clone();
    let status_str   = encode_claim_status(claim.status).to_owned();
    let at_str       = encode_dt(claim.filed_at);

    let outcome: FileOutcome = self
      .conn
      .call(move |conn| {
        let post_exists: bool = conn
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !post_exists {
          return Ok(FileOutcome::MissingPost);
        }

        let claimant_exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![claimant_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !claimant_exists {
          return Ok(FileOutcome::MissingClaimant);
        }

        conn.execute(
          "INSERT INTO claims (
             claim_id, post_id, claimant_id, reason, contact_info, status,
             filed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, post_str, claimant_str, reason, contact, status_str,
            at_str,
          ],
        )?;
        Ok(FileOutcome::Filed)
      })
      .await?;

    match outcome {
      FileOutcome::Filed => Ok(claim),
      FileOutcome::MissingPost => Err(Error::Core(
        reclaim_core::Error::PostNotFound(claim.post_id),
      )),
      FileOutcome::MissingClaimant => Err(Error::Core(
        reclaim_core::Error::UserNotFound(claim.claimant_id),
      )),
    }
  }

  async fn list_claims(&self, post_id: Uuid) -> Result<Vec<ClaimWithClaimant>> {
    let post_str = encode_uuid(post_id);

    let raws: Vec<RawAttributedClaim> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             c.claim_id, c.post_id, c.claimant_id, c.reason, c.contact_info,
             c.status, c.filed_at, u.username
           FROM claims c JOIN users u ON u.user_id = c.claimant_id
           WHERE c.post_id = ?1
           ORDER BY c.filed_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![post_str], |row| {
            Ok(RawAttributedClaim {
              claim:    read_claim_row(row)?,
              username: row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAttributedClaim::into_attributed)
      .collect()
  }

  async fn get_claim(&self, id: Uuid) -> Result<Option<Claim>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawClaim> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = ?1"),
            rusqlite::params![id_str],
            read_claim_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawClaim::into_claim).transpose()
  }

  async fn resolve_claim(
    &self,
    id: Uuid,
    decision: ClaimDecision,
  ) -> Result<ClaimResolution> {
    match decision {
      ClaimDecision::Reject => self.reject_claim(id).await,
      ClaimDecision::Approve => self.approve_claim(id).await,
    }
  }
}

// ─── Claim resolution internals ──────────────────────────────────────────────

impl SqliteStore {
  /// The reject path: delete the claim record. An approved claim is never
  /// deleted — its post is claimed, and removing the record would leave no
  /// trace of who claimed it.
  async fn reject_claim(&self, id: Uuid) -> Result<ClaimResolution> {
    let id_str = encode_uuid(id);

    let outcome: RejectOutcome = self
      .conn
      .call(move |conn| {
        let status: Option<String> = conn
          .query_row(
            "SELECT status FROM claims WHERE claim_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(status) = status else {
          return Ok(RejectOutcome::NoClaim);
        };
        if status == "approved" {
          return Ok(RejectOutcome::AlreadyApproved);
        }

        conn.execute(
          "DELETE FROM claims WHERE claim_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(RejectOutcome::Rejected)
      })
      .await?;

    match outcome {
      RejectOutcome::NoClaim => {
        Err(Error::Core(reclaim_core::Error::ClaimNotFound(id)))
      }
      RejectOutcome::AlreadyApproved => {
        Err(Error::Core(reclaim_core::Error::ClaimAlreadyApproved(id)))
      }
      RejectOutcome::Rejected => Ok(ClaimResolution::Rejected),
    }
  }

  /// The approve path: mark the claim approved, mark its post claimed, and
  /// delete every competing claim for the same post — committed as one
  /// SQLite transaction so the three writes appear atomic to all readers.
  async fn approve_claim(&self, id: Uuid) -> Result<ClaimResolution> {
    let id_str = encode_uuid(id);

    let outcome: ApproveOutcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw: Option<RawClaim> = tx
          .query_row(
            &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = ?1"),
            rusqlite::params![id_str],
            read_claim_row,
          )
          .optional()?;
        let Some(mut raw) = raw else {
          return Ok(ApproveOutcome::NoClaim);
        };

        // Guard on the post's claimed state inside the transaction; this is
        // what prevents two approvals on one post from both succeeding.
        let claimed: Option<String> = tx
          .query_row(
            "SELECT claimed FROM posts WHERE post_id = ?1",
            rusqlite::params![raw.post_id.clone()],
            |row| row.get(0),
          )
          .optional()?;
        let Some(claimed) = claimed else {
          return Ok(ApproveOutcome::NoPost { post_id: raw.post_id });
        };
        if claimed == "claimed" {
          return Ok(ApproveOutcome::AlreadyClaimed { post_id: raw.post_id });
        }

        tx.execute(
          "UPDATE claims SET status = 'approved' WHERE claim_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "UPDATE posts SET claimed = 'claimed' WHERE post_id = ?1",
          rusqlite::params![raw.post_id.clone()],
        )?;
        let discarded = tx.execute(
          "DELETE FROM claims WHERE post_id = ?1 AND claim_id != ?2",
          rusqlite::params![raw.post_id.clone(), id_str],
        )?;

        tx.commit()?;

        raw.status = "approved".to_owned();
        Ok(ApproveOutcome::Approved { claim: raw, discarded })
      })
      .await?;

    match outcome {
      ApproveOutcome::NoClaim => {
        Err(Error::Core(reclaim_core::Error::ClaimNotFound(id)))
      }
      ApproveOutcome::NoPost { post_id } => {
        Err(Error::Core(reclaim_core::Error::MissingClaimTarget {
          claim_id: id,
          post_id:  crate::encode::decode_uuid(&post_id)?,
        }))
      }
      ApproveOutcome::AlreadyClaimed { post_id } => {
        Err(Error::Core(reclaim_core::Error::PostAlreadyClaimed(
          crate::encode::decode_uuid(&post_id)?,
        )))
      }
      ApproveOutcome::Approved { claim, discarded } => {
        Ok(ClaimResolution::Approved {
          claim: claim.into_claim()?,
          discarded,
        })
      }
    }
  }
}
