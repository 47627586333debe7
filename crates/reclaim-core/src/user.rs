//! User — registered account records.
//!
//! The stored [`User`] carries the argon2 PHC string and is never serialised
//! to clients; API responses use the [`UserProfile`] projection instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Immutable after creation; never deleted in normal
/// flow.
#[derive(Debug, Clone)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub is_admin:      bool,
  pub email:         String,
  pub phone:         Option<String>,
  pub registered_at: DateTime<Utc>,
}

/// Input for [`BoardStore::create_user`](crate::store::BoardStore::create_user).
/// The password is hashed before it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
  pub is_admin:      bool,
  pub email:         String,
  pub phone:         Option<String>,
}

/// The client-visible projection of a [`User`] — everything except the
/// credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub user_id:       Uuid,
  pub username:      String,
  pub is_admin:      bool,
  pub email:         String,
  pub registered_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
  fn from(u: User) -> Self {
    UserProfile {
      user_id:       u.user_id,
      username:      u.username,
      is_admin:      u.is_admin,
      email:         u.email,
      registered_at: u.registered_at,
    }
  }
}
