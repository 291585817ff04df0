//! Forgot/reset password tokens.
//!
//! Only the SHA-256 digest of a reset token is stored; the raw value exists in
//! the emailed link alone. Consumption is a single `UPDATE ... RETURNING`, so a
//! token can be redeemed at most once even under concurrent requests.

use sqlx::{PgExecutor, PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::session::{self, generate_token, hash_token};
use super::user;

/// Link to the frontend reset page carrying `token`.
#[must_use]
pub fn reset_link(app_url: &str, token: &str) -> String {
    format!("{}/reset?token={token}", app_url.trim_end_matches('/'))
}

/// Issue a reset token for `user_id`, invalidating any outstanding ones.
/// Returns the raw token.
pub async fn create_reset(pool: &PgPool, user_id: Uuid, ttl_minutes: i32) -> Result<String, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM password_resets WHERE user_id = $1 AND used_at IS NULL")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let token = generate_token();
    sqlx::query(
        "INSERT INTO password_resets (token_hash, user_id, expires_at)
         VALUES ($1, $2, now() + make_interval(mins => $3))",
    )
    .bind(hash_token(&token))
    .bind(user_id)
    .bind(ttl_minutes)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(token)
}

/// Mark a reset token used and return its owner. `None` when the token is
/// unknown, expired, or already used.
pub async fn consume_reset<'e>(db: impl PgExecutor<'e>, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
    if token.trim().is_empty() {
        return Ok(None);
    }
    let row = sqlx::query(
        "UPDATE password_resets
         SET used_at = now()
         WHERE token_hash = $1 AND used_at IS NULL AND expires_at > now()
         RETURNING user_id",
    )
    .bind(hash_token(token))
    .fetch_optional(db)
    .await?;

    Ok(row.map(|r| r.get("user_id")))
}

/// Redeem `token`: store `password_hash` for its owner and revoke every
/// session they hold, in one transaction. Returns the owner, or `None` when
/// the token is not redeemable. On any error nothing is changed and the
/// token stays usable.
pub async fn complete_reset(pool: &PgPool, token: &str, password_hash: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(user_id) = consume_reset(&mut *tx, token).await? else {
        return Ok(None);
    };
    user::store_password_hash(&mut *tx, user_id, password_hash).await?;
    let revoked = session::delete_user_sessions(&mut *tx, user_id).await?;

    tx.commit().await?;
    info!(%user_id, revoked, "password reset completed");
    Ok(Some(user_id))
}

#[cfg(test)]
#[path = "password_reset_test.rs"]
mod tests;
