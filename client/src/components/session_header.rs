//! Top bar with the signed-in user's name and a sign-out button.

use leptos::prelude::*;

use crate::state::session::SessionStore;

#[component]
pub fn SessionHeader() -> impl IntoView {
    let session = expect_context::<SessionStore>();

    let identity = move || {
        session
            .user()
            .map(|u| if u.role.is_admin() { format!("{} (admin)", u.name) } else { u.name })
            .unwrap_or_default()
    };

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            crate::actions::sign_out_and_revoke(&session).await;
        });
    };

    view! {
        <header class="session-header">
            <a class="session-header__brand" href="/">"Applytrack"</a>
            <span class="session-header__user">{identity}</span>
            <button class="session-header__sign-out" type="button" on:click=on_sign_out>
                "Sign out"
            </button>
        </header>
    }
}
