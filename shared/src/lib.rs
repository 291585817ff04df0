//! Shared REST DTOs for the client/server boundary.
//!
//! This crate owns the JSON representation used by both `server` and `client`.
//! Every successful response is wrapped in an [`Envelope`]; every failure is an
//! [`ErrorBody`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Returned when a string does not name a known [`Status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid application status: {0}")]
pub struct ParseStatusError(pub String);

/// Returned when a string does not name a known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);

/// Workflow state of an [`Application`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Received from the applicant, not yet looked at.
    #[default]
    Submitted,
    /// Looked at by an admin, no decision yet.
    Reviewed,
    Accepted,
    Rejected,
}

impl Status {
    /// Every status in workflow order. Selectors offer exactly these.
    pub const ALL: [Self; 4] = [Self::Submitted, Self::Reviewed, Self::Accepted, Self::Rejected];

    /// Wire/storage name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable label for option lists and badges.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Reviewed => "Reviewed",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}

/// Authorization level of a [`User`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Public view of a user account. Credentials never leave the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Account creation time, RFC 3339.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// An applicant's submission and its review state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub school: String,
    pub major: String,
    pub graduation_year: i32,
    pub essay: String,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Success wrapper: every 2xx body is `{"response": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
}

impl<T> Envelope<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }

    pub fn into_inner(self) -> T {
        self.response
    }
}

/// Failure payload: every 4xx/5xx body is `{"status": 401, "error": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// Returned by sign-up, login, and refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Plain acknowledgement for endpoints with no record to return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
    pub token: String,
}

/// Applicant-editable fields of an [`Application`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub school: String,
    pub major: String,
    pub graduation_year: i32,
    pub essay: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: Status,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
