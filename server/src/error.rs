//! HTTP error mapping.
//!
//! ERROR HANDLING
//! ==============
//! Every handler returns `Result<_, ApiError>`. Service errors convert through
//! `From`, so handlers use `?` and the status/body mapping lives here only.
//! Server-side failures are logged with their cause and reach the client as a
//! generic message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::ErrorBody;

use crate::services::application::ApplicationError;
use crate::services::password::PasswordError;
use crate::services::user::UserError;

const INTERNAL_MESSAGE: &str = "Something went wrong, please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized("You must be signed in to do that.".to_owned())
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the user.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Database(_) => INTERNAL_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }

    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody { status: self.status_code().as_u16(), error: self.public_message() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Hash(_) => Self::Internal(err.to_string()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidEmail | UserError::MissingName | UserError::NameTooLong => {
                Self::BadRequest(err.to_string())
            }
            UserError::EmailTaken => Self::Conflict(err.to_string()),
            UserError::Password(inner) => inner.into(),
            UserError::Db(inner) => Self::Database(inner),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(_) => Self::NotFound("Application not found".to_owned()),
            ApplicationError::Forbidden(_) => Self::Forbidden("You do not have access to that application".to_owned()),
            ApplicationError::Invalid(message) => Self::BadRequest(message),
            ApplicationError::Database(inner) => Self::Database(inner),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
