//! Token persistence and cross-tab session sync.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token lives in `localStorage` under [`TOKEN_KEY`] so a reload
//! keeps the user signed in. Writes from one tab reach the others through the
//! window `storage` event; [`install_storage_sync`] feeds those into
//! `actions::storage_changed`.
//!
//! TRADE-OFFS
//! ==========
//! The synced value is read from the event itself rather than from this tab's
//! store, which has not seen the other tab's write yet. Requires a browser;
//! SSR paths no-op.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use crate::state::session::SessionStore;

pub const TOKEN_KEY: &str = "token";

/// Whether a `storage` event concerns the token. `key` is `None` when another
/// tab cleared all of `localStorage`.
pub fn is_token_event(key: Option<&str>) -> bool {
    key.is_none_or(|k| k == TOKEN_KEY)
}

/// Token to sync to after a `storage` event. A clear that is already
/// superseded by a later write (including this tab's own, which raises no
/// event here) yields the current stored value instead.
pub fn latest_stored_token(event_value: Option<String>, current: Option<String>) -> Option<String> {
    event_value.filter(|t| !t.trim().is_empty()).or(current)
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Read the persisted token.
pub fn load_token() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.trim().is_empty())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn save_token(token: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }
}

pub fn clear_token() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

/// Keep `session` in step with token writes made by other tabs.
///
/// A new token from elsewhere may belong to a different account, so the
/// matching user is fetched with it.
pub fn install_storage_sync(session: SessionStore) {
    #[cfg(feature = "hydrate")]
    {
        use leptos::prelude::*;

        use crate::state::session::{Dispatch, SessionAction};

        let handle = window_event_listener(leptos::ev::storage, move |ev: web_sys::StorageEvent| {
            if !is_token_event(ev.key().as_deref()) {
                return;
            }
            let stored = latest_stored_token(ev.new_value(), load_token());
            if !crate::actions::storage_changed(&session, stored) {
                return;
            }
            let Some(token) = session.token() else {
                return;
            };
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_me(&token).await {
                    Ok(user) => session.dispatch(SessionAction::SetUser(Some(user))),
                    Err(e) => log::warn!("session sync: could not load user: {e}"),
                }
            });
        });
        on_cleanup(move || handle.remove());
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = session;
    }
}
