//! Application routes: submit, list, view, and the admin status workflow.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::{Application, ApplicationInput, Status, StatusUpdate};
use uuid::Uuid;

use super::auth::{AdminUser, AuthUser};
use crate::envelope::{ApiJson, ApiResult, respond};
use crate::error::ApiError;
use crate::services::application as app_svc;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Parse a path id; malformed ids read as unknown applications.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Application not found".to_owned()))
}

/// Parse the optional `?status=` filter. Empty means unfiltered.
fn parse_status_filter(raw: Option<&str>) -> Result<Option<Status>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Status>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

/// `GET /api/applications`: the caller's application, or every application
/// for admins.
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Application>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let applications = app_svc::list_applications(&state.pool, &auth.user, status).await?;
    Ok(respond(applications))
}

/// `POST /api/applications`: create or edit the caller's application.
pub async fn submit_application(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ApplicationInput>,
) -> ApiResult<Application> {
    let application = app_svc::upsert_application(&state.pool, auth.user.id, &body).await?;
    Ok(respond(application))
}

/// `GET /api/applications/{id}`
pub async fn get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Application> {
    let id = parse_id(&id)?;
    let application = app_svc::get_application(&state.pool, id, &auth.user).await?;
    Ok(respond(application))
}

/// `PUT /api/applications/{id}/status`: admin only.
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> ApiResult<Application> {
    let id = parse_id(&id)?;
    let application = app_svc::update_status(&state.pool, id, body.status).await?;
    tracing::info!(admin_id = %admin.user.id, application_id = %id, status = %body.status, "status changed by admin");
    Ok(respond(application))
}

#[cfg(test)]
#[path = "applications_test.rs"]
mod tests;
