//! Application service: submission, listing, and the review workflow.
//!
//! DESIGN
//! ======
//! Each user owns at most one application (`UNIQUE (user_id)`). Re-submitting
//! edits the applicant fields but never touches `status`; only admins move an
//! application through [`Status`] via [`update_status`].

use std::sync::LazyLock;

use shared::{Application, ApplicationInput, Status, User};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::db::timestamp_column;

pub const MAX_FIELD_LEN: usize = 200;
pub const MAX_ESSAY_LEN: usize = 5000;
pub const MIN_GRADUATION_YEAR: i32 = 1950;
pub const MAX_GRADUATION_YEAR: i32 = 2100;

static APPLICATION_SELECT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT a.id, a.user_id, u.name AS applicant_name, u.email AS applicant_email,
                a.school, a.major, a.graduation_year, a.essay, a.status, {}, {}
         FROM applications a
         JOIN users u ON u.id = a.user_id",
        timestamp_column("a.created_at", "created_at"),
        timestamp_column("a.updated_at", "updated_at"),
    )
});

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("application not found: {0}")]
    NotFound(Uuid),
    #[error("not allowed to access application: {0}")]
    Forbidden(Uuid),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn application_from_row(row: &PgRow) -> Result<Application, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status.parse::<Status>().map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(Application {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        applicant_name: row.try_get("applicant_name")?,
        applicant_email: row.try_get("applicant_email")?,
        school: row.try_get("school")?,
        major: row.try_get("major")?,
        graduation_year: row.try_get("graduation_year")?,
        essay: row.try_get("essay")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Trim and bound applicant input.
///
/// # Errors
///
/// Returns [`ApplicationError::Invalid`] naming the first bad field.
pub fn validate_input(input: &ApplicationInput) -> Result<ApplicationInput, ApplicationError> {
    let school = required_field("School", &input.school)?;
    let major = required_field("Major", &input.major)?;
    if !(MIN_GRADUATION_YEAR..=MAX_GRADUATION_YEAR).contains(&input.graduation_year) {
        return Err(ApplicationError::Invalid(format!(
            "Graduation year must be between {MIN_GRADUATION_YEAR} and {MAX_GRADUATION_YEAR}"
        )));
    }
    let essay = input.essay.trim().to_owned();
    if essay.chars().count() > MAX_ESSAY_LEN {
        return Err(ApplicationError::Invalid(format!("Essay must be at most {MAX_ESSAY_LEN} characters")));
    }
    Ok(ApplicationInput { school, major, graduation_year: input.graduation_year, essay })
}

fn required_field(label: &str, value: &str) -> Result<String, ApplicationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApplicationError::Invalid(format!("{label} is required")));
    }
    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(ApplicationError::Invalid(format!("{label} must be at most {MAX_FIELD_LEN} characters")));
    }
    Ok(trimmed.to_owned())
}

/// Whether `viewer` may read `application`.
#[must_use]
pub fn can_view(viewer: &User, application: &Application) -> bool {
    viewer.role.is_admin() || application.user_id == viewer.id
}

// =============================================================================
// QUERIES
// =============================================================================

/// Create or edit the caller's application.
///
/// # Errors
///
/// Returns [`ApplicationError::Invalid`] before touching the database when the
/// input does not validate.
pub async fn upsert_application(
    pool: &PgPool,
    user_id: Uuid,
    input: &ApplicationInput,
) -> Result<Application, ApplicationError> {
    let input = validate_input(input)?;
    let row = sqlx::query(
        r"INSERT INTO applications (user_id, school, major, graduation_year, essay)
          VALUES ($1, $2, $3, $4, $5)
          ON CONFLICT (user_id) DO UPDATE
          SET school = EXCLUDED.school,
              major = EXCLUDED.major,
              graduation_year = EXCLUDED.graduation_year,
              essay = EXCLUDED.essay,
              updated_at = now()
          RETURNING id",
    )
    .bind(user_id)
    .bind(&input.school)
    .bind(&input.major)
    .bind(input.graduation_year)
    .bind(&input.essay)
    .fetch_one(pool)
    .await?;

    let id: Uuid = row.get("id");
    info!(application_id = %id, %user_id, "application saved");
    fetch_application(pool, id).await?.ok_or(ApplicationError::NotFound(id))
}

async fn fetch_application(pool: &PgPool, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
    let sql = format!("{} WHERE a.id = $1", *APPLICATION_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(application_from_row).transpose()
}

/// Applications visible to `viewer`: all for admins, the caller's own otherwise.
/// Newest first; `status` narrows the admin view.
pub async fn list_applications(
    pool: &PgPool,
    viewer: &User,
    status: Option<Status>,
) -> Result<Vec<Application>, ApplicationError> {
    let rows = if viewer.role.is_admin() {
        let sql = format!(
            "{} WHERE ($1::text IS NULL OR a.status = $1) ORDER BY a.created_at DESC",
            *APPLICATION_SELECT
        );
        sqlx::query(&sql)
            .bind(status.map(Status::as_str))
            .fetch_all(pool)
            .await?
    } else {
        let sql = format!("{} WHERE a.user_id = $1 ORDER BY a.created_at DESC", *APPLICATION_SELECT);
        sqlx::query(&sql).bind(viewer.id).fetch_all(pool).await?
    };

    Ok(rows
        .iter()
        .map(application_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Fetch one application on behalf of `viewer`.
///
/// # Errors
///
/// [`ApplicationError::NotFound`] for an unknown id, [`ApplicationError::Forbidden`]
/// when a non-admin asks for someone else's application.
pub async fn get_application(pool: &PgPool, id: Uuid, viewer: &User) -> Result<Application, ApplicationError> {
    let application = fetch_application(pool, id)
        .await?
        .ok_or(ApplicationError::NotFound(id))?;
    if !can_view(viewer, &application) {
        return Err(ApplicationError::Forbidden(id));
    }
    Ok(application)
}

/// Move an application to `status`. Authorization is the caller's job.
pub async fn update_status(pool: &PgPool, id: Uuid, status: Status) -> Result<Application, ApplicationError> {
    let updated = sqlx::query("UPDATE applications SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(ApplicationError::NotFound(id));
    }

    info!(application_id = %id, status = status.as_str(), "application status updated");
    fetch_application(pool, id).await?.ok_or(ApplicationError::NotFound(id))
}

#[cfg(test)]
#[path = "application_test.rs"]
mod tests;
