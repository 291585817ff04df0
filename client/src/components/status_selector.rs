//! Admin control for moving an application through its review workflow.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered next to each application in the admin dashboard and on the
//! application detail page. The selected value only changes once the server
//! confirms it; a failed update leaves the previous status selected and
//! reports the error as a red flash message.

#[cfg(test)]
#[path = "status_selector_test.rs"]
mod status_selector_test;

use leptos::prelude::*;
use shared::{Application, Status};

use crate::actions::{clear_flash_messages, send_flash_message};
use crate::net::api::ApiError;
use crate::state::flash::{FlashKind, FlashState};
use crate::state::session::SessionStore;

pub const STATUS_UPDATED_MESSAGE: &str = "Successfully updated application status!";

/// `(value, label)` pairs for the `<select>`, one per status, in workflow order.
pub fn status_options() -> [(&'static str, &'static str); 4] {
    Status::ALL.map(|s| (s.as_str(), s.label()))
}

/// What the selector shows after an update attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub status: Status,
    pub kind: FlashKind,
    pub message: String,
}

/// Success shows the status the server stored; failure keeps `prior`.
pub fn selection_outcome(prior: Status, result: &Result<Application, ApiError>) -> SelectionOutcome {
    match result {
        Ok(application) => SelectionOutcome {
            status: application.status,
            kind: FlashKind::Green,
            message: STATUS_UPDATED_MESSAGE.to_owned(),
        },
        Err(e) => SelectionOutcome { status: prior, kind: FlashKind::Red, message: e.message().to_owned() },
    }
}

/// Status `<select>` for one application.
#[component]
pub fn StatusSelector(
    application: Application,
    /// Called with the server's copy after a successful update.
    #[prop(optional)]
    on_updated: Option<Callback<Application>>,
) -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let flash = expect_context::<RwSignal<FlashState>>();
    let status = RwSignal::new(application.status);
    let busy = RwSignal::new(false);
    let id = application.id.to_string();

    let on_change = move |ev: leptos::ev::Event| {
        let Ok(selected) = event_target_value(&ev).parse::<Status>() else {
            return;
        };
        let prior = status.get_untracked();
        if selected == prior || busy.get_untracked() {
            return;
        }
        clear_flash_messages(flash);

        #[cfg(feature = "hydrate")]
        {
            use crate::state::session::Dispatch;

            let Some(token) = session.token() else {
                status.set(prior);
                send_flash_message(flash, "You must be signed in to do that.", FlashKind::Red);
                return;
            };
            let id = id.clone();
            busy.set(true);
            leptos::task::spawn_local(async move {
                let result = crate::net::api::update_application_status(&token, &id, selected).await;
                let outcome = selection_outcome(prior, &result);
                status.set(outcome.status);
                send_flash_message(flash, outcome.message, outcome.kind);
                if let (Ok(updated), Some(callback)) = (result, on_updated) {
                    callback.run(updated);
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&id, session, on_updated);
            status.set(prior);
            send_flash_message(flash, "not available on server", FlashKind::Red);
        }
    };

    view! {
        <div class="status-selector">
            <select
                required
                name="status"
                class="status-selector__select"
                prop:value=move || status.get().as_str()
                disabled=move || busy.get()
                on:change=on_change
            >
                {status_options()
                    .into_iter()
                    .map(|(value, label)| view! { <option value=value>{label}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}
