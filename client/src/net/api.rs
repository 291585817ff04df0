//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning [`ApiError::Transport`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Successful bodies arrive as `{"response": ...}` and are unwrapped here.
//! Failures carry the server's `{status, error}` payload unchanged; when no
//! payload can be decoded (network failure, proxy error page) callers get a
//! transport error instead.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "hydrate"))]
use serde::de::DeserializeOwned;
#[cfg(any(test, feature = "hydrate"))]
use shared::Envelope;
use shared::{
    Application, ApplicationInput, ErrorBody, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    ResetPasswordRequest, SignupRequest, Status, User,
};

#[cfg(feature = "hydrate")]
use gloo_net::http::{Request, RequestBuilder};
#[cfg(feature = "hydrate")]
use shared::StatusUpdate;

/// Why an API call failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with an error payload.
    Server(ErrorBody),
    /// No usable answer: network failure, undecodable body, or SSR.
    Transport(String),
}

impl ApiError {
    /// Text suitable for a flash message.
    pub fn message(&self) -> &str {
        match self {
            Self::Server(body) => &body.error,
            Self::Transport(msg) => msg,
        }
    }

    /// HTTP status of a server error payload.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server(body) => Some(body.status),
            Self::Transport(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[cfg(not(feature = "hydrate"))]
    fn unavailable() -> Self {
        Self::Transport("not available on server".to_owned())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// ENDPOINTS & DECODING
// =============================================================================

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn applications_endpoint(status: Option<Status>) -> String {
    match status {
        Some(status) => format!("/api/applications?status={}", status.as_str()),
        None => "/api/applications".to_owned(),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn application_endpoint(id: &str) -> String {
    format!("/api/applications/{id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn application_status_endpoint(id: &str) -> String {
    format!("/api/applications/{id}/status")
}

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

/// Turn a non-2xx answer into an [`ApiError`], preferring the server payload.
#[cfg(any(test, feature = "hydrate"))]
fn decode_error(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(payload) => ApiError::Server(payload),
        Err(_) => ApiError::Transport(request_failed_message(status)),
    }
}

/// Decode a `{response}` envelope, or the error payload for non-2xx.
#[cfg(any(test, feature = "hydrate"))]
fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(decode_error(status, body));
    }
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::Transport(e.to_string()))
}

/// Accept any 2xx answer and ignore its body.
#[cfg(any(test, feature = "hydrate"))]
fn decode_empty(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) { Ok(()) } else { Err(decode_error(status, body)) }
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[cfg(feature = "hydrate")]
fn transport(e: gloo_net::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[cfg(feature = "hydrate")]
fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header("Authorization", &bearer_header(token))
}

#[cfg(feature = "hydrate")]
async fn exchange(request: Result<Request, gloo_net::Error>) -> Result<(u16, String), ApiError> {
    let response = request.map_err(transport)?.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    Ok((status, body))
}

#[cfg(feature = "hydrate")]
async fn fetch<T: DeserializeOwned>(request: Result<Request, gloo_net::Error>) -> Result<T, ApiError> {
    let (status, body) = exchange(request).await?;
    decode_envelope(status, &body)
}

// =============================================================================
// AUTH
// =============================================================================

/// `POST /auth/signup`.
///
/// # Errors
///
/// Returns the server's error payload (duplicate email, weak password, ...).
pub async fn signup(body: &SignupRequest) -> Result<LoginResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(Request::post("/auth/signup").json(body)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err(ApiError::unavailable())
    }
}

/// `POST /auth/login`.
///
/// # Errors
///
/// Returns the server's error payload on bad credentials.
pub async fn login(body: &LoginRequest) -> Result<LoginResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(Request::post("/auth/login").json(body)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err(ApiError::unavailable())
    }
}

/// `POST /api/auth/forgot`.
///
/// # Errors
///
/// Returns the server's error payload for a malformed address.
pub async fn forgot_password(body: &ForgotPasswordRequest) -> Result<MessageResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(Request::post("/api/auth/forgot").json(body)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err(ApiError::unavailable())
    }
}

/// `POST /api/auth/reset`.
///
/// # Errors
///
/// Returns the server's error payload (mismatch, weak password, dead token).
pub async fn reset_password(body: &ResetPasswordRequest) -> Result<MessageResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(Request::post("/api/auth/reset").json(body)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err(ApiError::unavailable())
    }
}

/// `GET /api/auth/refresh`: trade a live token for a fresh one.
///
/// # Errors
///
/// Returns a 401 payload when the token is no longer valid.
pub async fn refresh(token: &str) -> Result<LoginResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(authorized(Request::get("/api/auth/refresh"), token).build()).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
        Err(ApiError::unavailable())
    }
}

/// `GET /api/auth/me`.
///
/// # Errors
///
/// Returns a 401 payload when the token is no longer valid.
pub async fn fetch_me(token: &str) -> Result<User, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(authorized(Request::get("/api/auth/me"), token).build()).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
        Err(ApiError::unavailable())
    }
}

/// `POST /api/auth/logout`: revoke `token` server-side.
///
/// # Errors
///
/// Returns the server's error payload or a transport error.
pub async fn logout(token: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let (status, body) = exchange(authorized(Request::post("/api/auth/logout"), token).build()).await?;
        decode_empty(status, &body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
        Err(ApiError::unavailable())
    }
}

// =============================================================================
// APPLICATIONS
// =============================================================================

/// `GET /api/applications`, optionally narrowed to one status (admins only).
///
/// # Errors
///
/// Returns the server's error payload or a transport error.
pub async fn list_applications(token: &str, status: Option<Status>) -> Result<Vec<Application>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = applications_endpoint(status);
        fetch(authorized(Request::get(&url), token).build()).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, status);
        Err(ApiError::unavailable())
    }
}

/// `GET /api/applications/{id}`.
///
/// # Errors
///
/// Returns 403/404 payloads for applications the caller cannot see.
pub async fn get_application(token: &str, id: &str) -> Result<Application, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = application_endpoint(id);
        fetch(authorized(Request::get(&url), token).build()).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, id);
        Err(ApiError::unavailable())
    }
}

/// `POST /api/applications`: create or edit the caller's application.
///
/// # Errors
///
/// Returns the server's validation message.
pub async fn submit_application(token: &str, input: &ApplicationInput) -> Result<Application, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        fetch(authorized(Request::post("/api/applications"), token).json(input)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, input);
        Err(ApiError::unavailable())
    }
}

/// `PUT /api/applications/{id}/status` (admin).
///
/// # Errors
///
/// Returns 403 for non-admins and 404 for unknown ids.
pub async fn update_application_status(token: &str, id: &str, status: Status) -> Result<Application, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = application_status_endpoint(id);
        fetch(authorized(Request::put(&url), token).json(&StatusUpdate { status })).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, id, status);
        Err(ApiError::unavailable())
    }
}
