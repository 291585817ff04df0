//! Forgot-password page: request a reset link by email.

use leptos::prelude::*;

use crate::actions::{clear_flash_messages, send_flash_message};
use crate::state::flash::{FlashKind, FlashState};

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let flash = expect_context::<RwSignal<FlashState>>();
    let email = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        clear_flash_messages(flash);
        let email_value = email.get().trim().to_owned();
        if email_value.is_empty() {
            send_flash_message(flash, "Enter your email first.", FlashKind::Red);
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::actions::forgot_password(&email_value).await {
                Ok(reply) => {
                    send_flash_message(flash, reply.message, FlashKind::Green);
                    email.set(String::new());
                }
                Err(e) => send_flash_message(flash, e.message(), FlashKind::Red),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = email_value;
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Applytrack"</h1>
                <p class="auth-card__subtitle">"Reset your password"</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Send Reset Link"
                    </button>
                </form>
                <p class="auth-card__links">
                    <a href="/login">"Back to sign in"</a>
                </p>
            </div>
        </div>
    }
}
