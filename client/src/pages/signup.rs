//! Sign-up page: name, email, and password.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use shared::SignupRequest;

use crate::actions::{clear_flash_messages, send_flash_message};
use crate::state::flash::{FlashKind, FlashState};
use crate::state::session::SessionStore;
use crate::util::auth::install_home_redirect;

fn validate_signup_input(name: &str, email: &str, password: &str) -> Result<SignupRequest, &'static str> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err("All fields are required.");
    }
    Ok(SignupRequest { name: name.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let flash = expect_context::<RwSignal<FlashState>>();
    install_home_redirect(session, use_navigate());

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        clear_flash_messages(flash);
        let body = match validate_signup_input(&name.get(), &email.get(), &password.get()) {
            Ok(body) => body,
            Err(msg) => {
                send_flash_message(flash, msg, FlashKind::Red);
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::actions::sign_up(&session, &body).await {
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
                <p class="auth-card__subtitle">"Create an account"</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="text"
                        placeholder="Full name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
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
                        placeholder="Password (8+ characters)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Sign Up"
                    </button>
                </form>
                <p class="auth-card__links">
                    <a href="/login">"Already have an account? Sign in"</a>
                </p>
            </div>
        </div>
    }
}
