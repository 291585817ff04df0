//! Bearer-token session management.
//!
//! ARCHITECTURE
//! ============
//! Tokens are opaque random strings handed to the client once. The database
//! keeps only their SHA-256 digest (see [`hash_token`]) with an expiry, so a
//! leaked `sessions` table cannot be replayed. The client sends the raw token
//! in `Authorization: Bearer <token>`; refresh rotates it so a stolen copy
//! stops working after the owner's next refresh.
//!
//! TRADE-OFFS
//! ==========
//! Rotation is destructive (`DELETE ... RETURNING` inside a transaction), so two
//! tabs refreshing with the same token race and only one wins. The loser sees
//! 401, finds the winner's token in shared storage, and adopts it.

use std::fmt::Write;
use std::time::Duration;

use rand::Rng;
use sha2::{Digest, Sha256};
use shared::User;
use sqlx::{PgExecutor, PgPool, Row};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::user::{USER_COLUMNS, user_from_row};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// SHA-256 hex digest of a raw token, as stored in the database.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Create a session for the given user, returning the raw token.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_hours: i32) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token_hash, user_id, expires_at)
         VALUES ($1, $2, now() + make_interval(hours => $3))",
    )
    .bind(hash_token(&token))
    .bind(user_id)
    .bind(ttl_hours)
    .execute(pool)
    .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.token_hash = $1 AND s.expires_at > now()",
        *USER_COLUMNS
    );
    let row = sqlx::query(&sql).bind(hash_token(token)).fetch_optional(pool).await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete every session belonging to `user_id`. Returns how many were revoked.
pub async fn delete_user_sessions<'e>(db: impl PgExecutor<'e>, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Replace a live token with a fresh one. `None` when `old_token` is unknown
/// or expired.
pub async fn rotate_session(pool: &PgPool, old_token: &str, ttl_hours: i32) -> Result<Option<String>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("DELETE FROM sessions WHERE token_hash = $1 AND expires_at > now() RETURNING user_id")
        .bind(hash_token(old_token))
        .fetch_optional(&mut *tx)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let user_id: Uuid = row.get("user_id");

    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token_hash, user_id, expires_at)
         VALUES ($1, $2, now() + make_interval(hours => $3))",
    )
    .bind(hash_token(&token))
    .bind(user_id)
    .bind(ttl_hours)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(token))
}

/// Remove expired sessions and stale reset tokens.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let sessions = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    let resets = sqlx::query("DELETE FROM password_resets WHERE expires_at <= now() OR used_at IS NOT NULL")
        .execute(pool)
        .await?;
    Ok(sessions.rows_affected() + resets.rows_affected())
}

/// Spawn the background sweep that calls [`purge_expired`] every `interval`.
pub fn spawn_purge_task(pool: PgPool, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "expired session sweep configured");
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match purge_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "purged expired credentials"),
                Err(e) => warn!(error = %e, "expired session sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
