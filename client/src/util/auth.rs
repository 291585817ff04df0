//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{SessionState, SessionStore};

/// Whether a route guard should send the visitor to `/login`.
pub fn should_redirect_unauth(state: &SessionState) -> bool {
    !state.loading && !state.is_signed_in()
}

/// Whether a signed-in visitor on `/login` or `/signup` should move on to `/`.
pub fn should_redirect_home(state: &SessionState) -> bool {
    !state.loading && state.is_signed_in()
}

/// Redirect to `/login` whenever the session has loaded and nobody is signed in.
pub fn install_unauth_redirect<F>(session: SessionStore, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&session.get()) {
            navigate("/login", NavigateOptions::default());
        }
    });
}

/// Redirect to `/` once a session exists (after sign-in, or on a page meant
/// for signed-out visitors).
pub fn install_home_redirect<F>(session: SessionStore, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_home(&session.get()) {
            navigate("/", NavigateOptions::default());
        }
    });
}
