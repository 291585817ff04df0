//! Auth routes: sign-up, login, token refresh, logout, password reset.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use shared::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest, SignupRequest, User,
};
use tracing::{info, warn};

use crate::envelope::{ApiJson, ApiResult, respond};
use crate::error::ApiError;
use crate::services::mailer::ResetEmail;
use crate::services::password::{hash_password_blocking, normalize_email, validate_new_password};
use crate::services::user::{self as user_svc, NewUser};
use crate::services::{password_reset, session};
use crate::state::AppState;

pub(crate) const FORGOT_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent.";
pub(crate) const RESET_MESSAGE: &str = "Your password has been reset. Please sign in with your new password.";
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub(crate) const INVALID_RESET_TOKEN: &str = "This reset link is invalid or has expired";

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Authenticated user resolved from `Authorization: Bearer <token>`.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::unauthorized())?;
        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(ApiError::unauthorized());
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

/// [`AuthUser`] that must hold the admin role.
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.user.role.is_admin() {
            return Err(ApiError::Forbidden("Admin access required".to_owned()));
        }
        Ok(Self(auth))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /auth/signup`: create an account and sign it in.
pub async fn signup(State(state): State<AppState>, ApiJson(body): ApiJson<SignupRequest>) -> ApiResult<LoginResponse> {
    let admin = state.config.is_admin_email(&body.email);
    let new_user = NewUser::parse(&body.name, &body.email, &body.password, admin)?;
    let user = user_svc::create_user(&state.pool, new_user).await?;
    let token = session::create_session(&state.pool, user.id, state.config.session_ttl_hours).await?;

    info!(user_id = %user.id, "user signed up");
    Ok(respond(LoginResponse { token, user }))
}

/// `POST /auth/login`: exchange credentials for a bearer token.
pub async fn login(State(state): State<AppState>, ApiJson(body): ApiJson<LoginRequest>) -> ApiResult<LoginResponse> {
    let user = user_svc::authenticate(&state.pool, &body.email, &body.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_owned()))?;
    let token = session::create_session(&state.pool, user.id, state.config.session_ttl_hours).await?;

    info!(user_id = %user.id, "user signed in");
    Ok(respond(LoginResponse { token, user }))
}

/// `GET /api/auth/refresh`: rotate the caller's token.
pub async fn refresh(State(state): State<AppState>, auth: AuthUser) -> ApiResult<LoginResponse> {
    let token = session::rotate_session(&state.pool, &auth.token, state.config.session_ttl_hours)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(respond(LoginResponse { token, user: auth.user }))
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> ApiResult<User> {
    Ok(respond(auth.user))
}

/// `POST /api/auth/logout`: revoke the caller's token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<StatusCode, ApiError> {
    session::delete_session(&state.pool, &auth.token).await?;
    info!(user_id = %auth.user.id, "user signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/auth/forgot`: email a reset link. The reply is identical
/// whether or not the address has an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<MessageResponse> {
    let Some(email) = normalize_email(&body.email) else {
        return Err(ApiError::BadRequest("Enter a valid email address".to_owned()));
    };

    // Issue and send off the request path so response time does not reveal
    // whether the account exists.
    if let Some(user) = user_svc::find_by_email(&state.pool, &email).await? {
        tokio::spawn(send_reset_email(state, user));
    }

    Ok(respond(MessageResponse { message: FORGOT_MESSAGE.to_owned() }))
}

async fn send_reset_email(state: AppState, user: User) {
    let token = match password_reset::create_reset(&state.pool, user.id, state.config.reset_ttl_minutes).await {
        Ok(token) => token,
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "could not issue password reset token");
            return;
        }
    };
    let message = ResetEmail {
        to: user.email,
        name: user.name,
        link: password_reset::reset_link(&state.config.app_url, &token),
        ttl_minutes: state.config.reset_ttl_minutes,
    };
    match state.mailer.send_password_reset(&message).await {
        Ok(()) => info!(user_id = %user.id, "password reset requested"),
        Err(e) => warn!(user_id = %user.id, error = %e, "password reset email failed"),
    }
}

/// `POST /api/auth/reset`: set a new password from an emailed token and
/// revoke every existing session.
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> ApiResult<MessageResponse> {
    validate_new_password(&body.password, &body.password_confirm)?;

    let password_hash = hash_password_blocking(body.password).await?;
    password_reset::complete_reset(&state.pool, &body.token, &password_hash)
        .await?
        .ok_or_else(|| ApiError::BadRequest(INVALID_RESET_TOKEN.to_owned()))?;

    Ok(respond(MessageResponse { message: RESET_MESSAGE.to_owned() }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
