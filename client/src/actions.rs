//! Action creators: API calls whose results feed the session and flash state.
//!
//! DESIGN
//! ======
//! Each network action is split into the call itself and a synchronous
//! `complete_*` step that dispatches the result. The `complete_*` steps carry
//! the state rules and are what the tests exercise. Failures are returned
//! unchanged so pages can show the server's message.

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;

use leptos::prelude::*;
use shared::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest, SignupRequest,
};

use crate::net::api::{self, ApiError};
use crate::state::flash::{FlashKind, FlashState};
use crate::state::session::{Dispatch, SessionAction};

// =============================================================================
// SESSION
// =============================================================================

/// Store the token and user from a login-shaped response, verbatim.
///
/// # Errors
///
/// Passes `result`'s error through without touching the session.
pub fn complete_login<D: Dispatch>(
    store: &D,
    result: Result<LoginResponse, ApiError>,
) -> Result<LoginResponse, ApiError> {
    let response = result?;
    store.dispatch(SessionAction::SetToken(Some(response.token.clone())));
    store.dispatch(SessionAction::SetUser(Some(response.user.clone())));
    Ok(response)
}

/// Create an account and sign it in.
///
/// # Errors
///
/// Returns the server's error payload or a transport error.
pub async fn sign_up<D: Dispatch>(store: &D, body: &SignupRequest) -> Result<LoginResponse, ApiError> {
    complete_login(store, api::signup(body).await)
}

/// Exchange credentials for a session.
///
/// # Errors
///
/// Returns the server's error payload or a transport error.
pub async fn sign_in<D: Dispatch>(store: &D, body: &LoginRequest) -> Result<LoginResponse, ApiError> {
    complete_login(store, api::login(body).await)
}

/// Forget the local session. Always clears both token and user.
pub fn sign_out<D: Dispatch>(store: &D) {
    store.dispatch(SessionAction::SetToken(None));
    store.dispatch(SessionAction::SetUser(None));
}

/// Revoke the token server-side, then [`sign_out`]. Revocation is
/// best-effort; the local session is cleared either way.
pub async fn sign_out_and_revoke<D: Dispatch>(store: &D) {
    if let Some(token) = store.token() {
        if let Err(_e) = api::logout(&token).await {
            #[cfg(feature = "hydrate")]
            log::warn!("logout request failed: {_e}");
        }
    }
    sign_out(store);
}

/// Store a rotated token and its user.
///
/// # Errors
///
/// Passes `result`'s error through without touching the session.
pub fn complete_refresh<D: Dispatch>(
    store: &D,
    result: Result<LoginResponse, ApiError>,
) -> Result<LoginResponse, ApiError> {
    let response = result?;
    store.dispatch(SessionAction::SetUser(Some(response.user.clone())));
    store.dispatch(SessionAction::SetToken(Some(response.token.clone())));
    Ok(response)
}

/// Rotate the current token. With no token the session is cleared and
/// `Ok(None)` returned without a request.
///
/// # Errors
///
/// Returns the server's error payload (401 once the token has expired) or a
/// transport error; the session is left as it was.
pub async fn refresh_token<D: Dispatch>(store: &D) -> Result<Option<LoginResponse>, ApiError> {
    let Some(token) = store.token() else {
        store.dispatch(SessionAction::SetUser(None));
        store.dispatch(SessionAction::SetToken(None));
        return Ok(None);
    };
    complete_refresh(store, api::refresh(&token).await).map(Some)
}

/// Handle a 401 from refreshing `rejected`. When `stored` holds a different
/// token, another tab rotated first: adopt its token and return it so the
/// caller can load the matching user. Otherwise the session is over and this
/// tab signs out.
pub fn refresh_rejected<D: Dispatch>(store: &D, rejected: Option<&str>, stored: Option<String>) -> Option<String> {
    let stored = stored.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty());
    match stored {
        Some(token) if Some(token.as_str()) != rejected => {
            store.dispatch(SessionAction::SetToken(Some(token.clone())));
            Some(token)
        }
        _ => {
            sign_out(store);
            None
        }
    }
}

/// React to another tab writing the stored token. An empty or absent value
/// signs this tab out; anything else becomes this tab's token.
///
/// Returns `true` when the token changed to a new non-empty value, so the
/// caller can reload the user that goes with it.
pub fn storage_changed<D: Dispatch>(store: &D, stored_token: Option<String>) -> bool {
    let stored_token = stored_token.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty());
    match stored_token {
        None => {
            sign_out(store);
            false
        }
        Some(token) => {
            let changed = store.token().as_deref() != Some(token.as_str());
            store.dispatch(SessionAction::SetToken(Some(token)));
            changed
        }
    }
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

/// Ask for a reset link.
///
/// # Errors
///
/// Returns the server's error payload or a transport error.
pub async fn forgot_password(email: &str) -> Result<MessageResponse, ApiError> {
    api::forgot_password(&ForgotPasswordRequest { email: email.trim().to_owned() }).await
}

/// Set a new password from an emailed token.
///
/// # Errors
///
/// Returns the server's error payload or a transport error.
pub async fn reset_password(password: &str, password_confirm: &str, token: &str) -> Result<MessageResponse, ApiError> {
    let body = ResetPasswordRequest {
        password: password.to_owned(),
        password_confirm: password_confirm.to_owned(),
        token: token.to_owned(),
    };
    api::reset_password(&body).await
}

// =============================================================================
// FLASH
// =============================================================================

pub fn send_flash_message(flash: RwSignal<FlashState>, message: impl Into<String>, kind: FlashKind) {
    let message = message.into();
    flash.update(|f| f.send(message, kind));
}

pub fn clear_flash_messages(flash: RwSignal<FlashState>) {
    flash.update(FlashState::clear);
}
