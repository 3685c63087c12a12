//! Password hashing and verification
//!
//! Argon2id with a fresh random salt per password. Hashes are stored as PHC
//! strings, so the parameters travel with the hash and can be tightened later
//! without invalidating existing accounts.

use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};
use argon2::Argon2;

use crate::error::{AuthError, Result};

fn hasher() -> Argon2<'static> {
    Argon2::default()
}

/// Hash a password into a PHC string (`$argon2id$v=19$...`)
///
/// # Example
///
/// ```
/// use bizlink_auth::password::hash_password;
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordError(format!("password hash failed: {}", e)))
}

/// Check a password against a stored PHC hash
///
/// A wrong password is `Ok(false)`; only a malformed hash or an internal
/// Argon2 failure is an error.
///
/// # Example
///
/// ```
/// use bizlink_auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::PasswordError(format!("invalid password hash: {}", e)))?;

    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswordError(format!(
            "password verification failed: {}",
            e
        ))),
    }
}
