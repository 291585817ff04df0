//! Session state for the current browser user.
//!
//! DESIGN
//! ======
//! The session is a reducer: every change arrives as a [`SessionAction`] and
//! goes through [`SessionState::apply`]. Action creators in `crate::actions`
//! only see the [`Dispatch`] seam, so they can be exercised against a plain
//! in-memory recorder in tests.
//!
//! The bearer token is mirrored into `localStorage` by [`SessionStore`] on
//! every `SetToken`, outside the reducer. Other tabs observe that write through
//! the `storage` event (see `crate::util::storage`). Storage is shared by every
//! tab, so dropping a token only removes the stored copy while it is still the
//! token being dropped (see [`stored_token_write`]).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;
use shared::User;

use crate::util::storage;

/// A single session transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    SetToken(Option<String>),
    SetUser(Option<User>),
    /// Marks the startup token check as running or finished.
    SetLoading(bool),
}

/// Who is signed in, and with which token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
}

impl SessionState {
    /// State before the stored token has been checked.
    pub fn initial() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Apply one action. A missing or blank token also clears the user.
    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::SetToken(token) => {
                let token = token.filter(|t| !t.trim().is_empty());
                if token.is_none() {
                    self.user = None;
                }
                self.token = token;
            }
            SessionAction::SetUser(user) => self.user = user,
            SessionAction::SetLoading(loading) => self.loading = loading,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }
}

/// Effect of a `SetToken` on the token shared through `localStorage`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredTokenWrite {
    Save(String),
    Remove,
    Keep,
}

/// Decide the storage write for `SetToken(next)` in a tab holding `previous`
/// while storage holds `stored`. A new token is always saved; clearing removes
/// the stored value only when it is still `previous`, so a tab that lost a
/// refresh race cannot erase the winner's token.
pub fn stored_token_write(next: Option<&str>, previous: Option<&str>, stored: Option<&str>) -> StoredTokenWrite {
    match next.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => StoredTokenWrite::Save(token.to_owned()),
        None if previous.is_some() && previous == stored => StoredTokenWrite::Remove,
        None => StoredTokenWrite::Keep,
    }
}

/// Sink for session actions, plus read access to the current token.
pub trait Dispatch {
    fn dispatch(&self, action: SessionAction);

    /// Current token without subscribing to changes.
    fn token(&self) -> Option<String>;
}

/// Reactive session store provided through context.
#[derive(Clone, Copy)]
pub struct SessionStore {
    state: RwSignal<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self { state: RwSignal::new(SessionState::initial()) }
    }

    /// Tracked snapshot of the session.
    pub fn get(&self) -> SessionState {
        self.state.get()
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.state.with(SessionState::is_admin)
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for SessionStore {
    fn dispatch(&self, action: SessionAction) {
        if let SessionAction::SetToken(token) = &action {
            let previous = self.token();
            let stored = storage::load_token();
            match stored_token_write(token.as_deref(), previous.as_deref(), stored.as_deref()) {
                StoredTokenWrite::Save(token) => storage::save_token(&token),
                StoredTokenWrite::Remove => storage::clear_token(),
                StoredTokenWrite::Keep => {}
            }
        }
        self.state.update(|s| s.apply(action));
    }

    fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }
}
