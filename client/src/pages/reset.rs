//! Reset-password page, reached from the emailed `/reset?token=...` link.

#[cfg(test)]
#[path = "reset_test.rs"]
mod reset_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::actions::{clear_flash_messages, send_flash_message};
use crate::state::flash::{FlashKind, FlashState};

const MISSING_TOKEN: &str = "This reset link is missing its token. Request a new one.";

/// Client-side pre-check; the server repeats every rule.
fn validate_reset_input(password: &str, confirm: &str, token: Option<&str>) -> Result<String, &'static str> {
    let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(MISSING_TOKEN)?;
    if password.is_empty() {
        return Err("Enter a new password.");
    }
    if password != confirm {
        return Err("Passwords do not match");
    }
    Ok(token.to_owned())
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let flash = expect_context::<RwSignal<FlashState>>();
    let query = use_query_map();
    let token = move || query.with(|q| q.get("token"));

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let done = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        clear_flash_messages(flash);
        let password_value = password.get();
        let confirm_value = confirm.get();
        let token_value = match validate_reset_input(&password_value, &confirm_value, token().as_deref()) {
            Ok(token) => token,
            Err(msg) => {
                send_flash_message(flash, msg, FlashKind::Red);
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::actions::reset_password(&password_value, &confirm_value, &token_value).await {
                Ok(reply) => {
                    send_flash_message(flash, reply.message, FlashKind::Green);
                    password.set(String::new());
                    confirm.set(String::new());
                    done.set(true);
                }
                Err(e) => send_flash_message(flash, e.message(), FlashKind::Red),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = token_value;
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Applytrack"</h1>
                <p class="auth-card__subtitle">"Choose a new password"</p>
                <Show
                    when=move || !done.get()
                    fallback=|| view! { <a class="auth-button" href="/login">"Sign in"</a> }
                >
                    <form class="auth-form" on:submit=on_submit>
                        <input
                            class="auth-input"
                            type="password"
                            placeholder="New password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type="password"
                            placeholder="Confirm new password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| confirm.set(event_target_value(&ev))
                        />
                        <button class="auth-button" type="submit" disabled=move || busy.get()>
                            "Reset Password"
                        </button>
                    </form>
                </Show>
            </div>
        </div>
    }
}
