//! Credential helpers: argon2 hashing and input normalization.

use std::sync::LazyLock;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password must be at most 128 characters")]
    TooLong,
    #[error("Passwords do not match")]
    Mismatch,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Trim and lowercase an address; `None` unless it has exactly one `@` with
/// text on both sides.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

/// Check length bounds. Counted in characters, not bytes.
///
/// # Errors
///
/// Returns [`PasswordError::TooShort`] or [`PasswordError::TooLong`].
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    if len > MAX_PASSWORD_LEN {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

/// Validate a new password together with its confirmation.
///
/// # Errors
///
/// Returns [`PasswordError::Mismatch`] before any length error.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), PasswordError> {
    if password != confirm {
        return Err(PasswordError::Mismatch);
    }
    validate_password(password)
}

/// Hash checked when a login names no account, so unknown addresses cost the
/// same argon2 work as wrong passwords. Empty if hashing failed at startup.
static DECOY_HASH: LazyLock<String> = LazyLock::new(|| hash_password("decoy-password").unwrap_or_default());

/// Hash with argon2id and a fresh random salt, returning the PHC string.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if argon2 rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Constant-time verification against a stored PHC string. A malformed hash
/// never verifies.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Run [`hash_password`] on the blocking pool; argon2 is deliberately slow.
///
/// # Errors
///
/// Propagates hashing failures and reports a panicked worker as
/// [`PasswordError::Hash`].
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
}

/// Run [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, stored_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .unwrap_or(false)
}

/// Spend one verification on [`DECOY_HASH`]; the outcome is discarded.
pub async fn verify_decoy_blocking(password: String) {
    let _ = verify_password_blocking(password, DECOY_HASH.clone()).await;
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
