//! Password hashing and verification (argon2).

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::ApiError;

/// Hash a plaintext password into an argon2 PHC string
/// (`$argon2id$v=19$…`).
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plain.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored PHC string. Any parse or
/// verification failure counts as a mismatch.
pub fn verify_password(plain: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(plain.as_bytes(), &parsed)
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_and_verify_round_trip() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("hunter2", "not-a-phc-string"));
  }
}
