//! Application detail page at `/applications/:id`.
//!
//! Owners see their own application read-only; admins additionally get the
//! status selector.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use shared::Application;

use crate::actions::send_flash_message;
use crate::components::session_header::SessionHeader;
use crate::components::status_selector::StatusSelector;
use crate::state::flash::{FlashKind, FlashState};
use crate::state::session::{Dispatch, SessionStore};
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn ApplicationPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let flash = expect_context::<RwSignal<FlashState>>();
    install_unauth_redirect(session, use_navigate());

    let params = use_params_map();
    let application_id = move || params.with(|p| p.get("id")).unwrap_or_default();
    let application = RwSignal::new(None::<Application>);

    Effect::new(move || {
        let id = application_id();
        let Some(token) = session.token() else {
            return;
        };
        if id.is_empty() {
            return;
        }
        leptos::task::spawn_local(async move {
            match crate::net::api::get_application(&token, &id).await {
                Ok(found) => application.set(Some(found)),
                Err(e) => send_flash_message(flash, e.message(), FlashKind::Red),
            }
        });
    });

    let on_updated = Callback::new(move |updated: Application| application.set(Some(updated)));

    view! {
        <Show when=move || session.get().is_signed_in()>
            <SessionHeader/>
            <main class="application-detail">
                <a class="application-detail__back" href="/">"Back to dashboard"</a>
                {move || {
                    application
                        .get()
                        .map(|app| {
                            let is_admin = session.is_admin();
                            let selector_app = app.clone();
                            view! {
                                <article class="application-card">
                                    <h2>{app.applicant_name.clone()}</h2>
                                    <p class="application-card__email">{app.applicant_email.clone()}</p>
                                    <dl>
                                        <dt>"School"</dt>
                                        <dd>{app.school.clone()}</dd>
                                        <dt>"Major"</dt>
                                        <dd>{app.major.clone()}</dd>
                                        <dt>"Graduation year"</dt>
                                        <dd>{app.graduation_year}</dd>
                                        <dt>"Status"</dt>
                                        <dd>{app.status.label()}</dd>
                                        <dt>"Submitted"</dt>
                                        <dd>{app.created_at.clone()}</dd>
                                    </dl>
                                    <h3>"Essay"</h3>
                                    <p class="application-card__essay">{app.essay.clone()}</p>
                                    <Show when=move || is_admin>
                                        <StatusSelector
                                            application=selector_app.clone()
                                            on_updated=on_updated
                                        />
                                    </Show>
                                </article>
                            }
                        })
                }}
            </main>
        </Show>
    }
}
