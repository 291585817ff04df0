//! User accounts: registration, credential checks, password changes.

use std::sync::LazyLock;

use shared::{Role, User};
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::password::{self, PasswordError, normalize_email};
use crate::db::timestamp_column;

pub const MAX_NAME_LEN: usize = 100;

/// Column list for a [`User`] selected from `users u`.
pub(crate) static USER_COLUMNS: LazyLock<String> =
    LazyLock::new(|| format!("u.id, u.name, u.email, u.role, {}", timestamp_column("u.created_at", "created_at")));

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Name is required")]
    MissingName,
    #[error("Name must be at most 100 characters")]
    NameTooLong,
    #[error("An account with that email already exists")]
    EmailTaken,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Map a row selected with [`USER_COLUMNS`].
pub(crate) fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = role.parse::<Role>().map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role,
        created_at: row.try_get("created_at")?,
    })
}

/// Trim and bound a display name.
///
/// # Errors
///
/// Returns [`UserError::MissingName`] or [`UserError::NameTooLong`].
pub fn normalize_name(name: &str) -> Result<String, UserError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(UserError::MissingName);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(UserError::NameTooLong);
    }
    Ok(trimmed.to_owned())
}

/// Validated sign-up input, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    /// Validate raw sign-up fields. `admin` decides the role.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure in field order: name, email, password.
    pub fn parse(name: &str, email: &str, password: &str, admin: bool) -> Result<Self, UserError> {
        let name = normalize_name(name)?;
        let email = normalize_email(email).ok_or(UserError::InvalidEmail)?;
        password::validate_password(password)?;
        Ok(Self {
            name,
            email,
            password: password.to_owned(),
            role: if admin { Role::Admin } else { Role::User },
        })
    }
}

/// Insert a new account.
///
/// # Errors
///
/// Returns [`UserError::EmailTaken`] on a duplicate address.
pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, UserError> {
    let password_hash = password::hash_password_blocking(new_user.password).await?;

    let sql = format!(
        "INSERT INTO users AS u (name, email, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING {}",
        *USER_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => UserError::EmailTaken,
            other => UserError::Db(other),
        })?;

    let user = user_from_row(&row)?;
    info!(user_id = %user.id, role = user.role.as_str(), "user registered");
    Ok(user)
}

/// Look up an account by address (any casing).
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, UserError> {
    let Some(email) = normalize_email(email) else {
        return Ok(None);
    };
    let sql = format!("SELECT {} FROM users u WHERE u.email = $1", *USER_COLUMNS);
    let row = sqlx::query(&sql).bind(email).fetch_optional(pool).await?;
    Ok(row.as_ref().map(user_from_row).transpose()?)
}

/// Check an email/password pair. `None` for an unknown address or a wrong
/// password; callers must not distinguish the two.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<Option<User>, UserError> {
    let Some(email) = normalize_email(email) else {
        return Ok(None);
    };
    let sql = format!("SELECT {}, u.password_hash FROM users u WHERE u.email = $1", *USER_COLUMNS);
    let Some(row) = sqlx::query(&sql).bind(email).fetch_optional(pool).await? else {
        password::verify_decoy_blocking(password.to_owned()).await;
        return Ok(None);
    };

    let stored_hash: String = row.try_get("password_hash")?;
    if !password::verify_password_blocking(password.to_owned(), stored_hash).await {
        return Ok(None);
    }
    Ok(Some(user_from_row(&row)?))
}

/// Replace a user's password with an already-computed argon2 hash.
pub async fn store_password_hash<'e>(
    db: impl PgExecutor<'e>,
    user_id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(user_id)
        .bind(password_hash)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
