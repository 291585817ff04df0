//! Login page: email + password sign-in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use shared::LoginRequest;

use crate::actions::{clear_flash_messages, send_flash_message};
use crate::state::flash::{FlashKind, FlashState};
use crate::state::session::SessionStore;
use crate::util::auth::install_home_redirect;

fn validate_login_input(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let flash = expect_context::<RwSignal<FlashState>>();
    install_home_redirect(session, use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        clear_flash_messages(flash);
        let body = match validate_login_input(&email.get(), &password.get()) {
            Ok(body) => body,
            Err(msg) => {
                send_flash_message(flash, msg, FlashKind::Red);
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            // Success flips the session; the home redirect takes it from there.
            if let Err(e) = crate::actions::sign_in(&session, &body).await {
                send_flash_message(flash, e.message(), FlashKind::Red);
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = body;
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Applytrack"</h1>
                <p class="auth-card__subtitle">"Sign in"</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <p class="auth-card__links">
                    <a href="/forgot">"Forgot your password?"</a>
                    " · "
                    <a href="/signup">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
