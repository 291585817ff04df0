//! Dashboard: the applicant's own application form, or the admin review list.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Applicants create and edit their
//! single application here; admins see every application, narrow the list by
//! status, and move applications through the workflow with
//! [`StatusSelector`].

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use shared::{Application, ApplicationInput, Status};

use crate::actions::{clear_flash_messages, send_flash_message};
use crate::components::session_header::SessionHeader;
use crate::components::status_selector::{StatusSelector, status_options};
use crate::state::flash::{FlashKind, FlashState};
use crate::state::session::{Dispatch, SessionStore};
use crate::util::auth::install_unauth_redirect;

const APPLICATION_SAVED: &str = "Your application has been saved!";

/// Collect the form fields into a request body.
fn build_application_input(
    school: &str,
    major: &str,
    graduation_year: &str,
    essay: &str,
) -> Result<ApplicationInput, &'static str> {
    let school = school.trim();
    let major = major.trim();
    let essay = essay.trim();
    if school.is_empty() || major.is_empty() || essay.is_empty() {
        return Err("Fill in every field before submitting.");
    }
    let graduation_year = graduation_year
        .trim()
        .parse::<i32>()
        .map_err(|_| "Graduation year must be a number.")?;
    Ok(ApplicationInput {
        school: school.to_owned(),
        major: major.to_owned(),
        graduation_year,
        essay: essay.to_owned(),
    })
}

/// `""` (the "All" option) means no filter.
fn parse_status_filter(value: &str) -> Option<Status> {
    value.parse().ok()
}

/// Fold a confirmed status change into the admin list. The row is replaced
/// while it still matches `filter` and dropped once it no longer does.
fn apply_status_change(list: &mut Vec<Application>, updated: Application, filter: Option<Status>) {
    if filter.is_some_and(|status| status != updated.status) {
        list.retain(|a| a.id != updated.id);
    } else if let Some(row) = list.iter_mut().find(|a| a.id == updated.id) {
        *row = updated;
    }
}

/// Dashboard page. Redirects to `/login` if nobody is signed in.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    install_unauth_redirect(session, use_navigate());

    view! {
        <Show
            when=move || session.get().is_signed_in()
            fallback=|| view! { <div class="dashboard-loading">"Loading..."</div> }
        >
            <SessionHeader/>
            <main class="dashboard">
                {move || {
                    if session.is_admin() {
                        view! { <AdminDashboard/> }.into_any()
                    } else {
                        view! { <ApplicantDashboard/> }.into_any()
                    }
                }}
            </main>
        </Show>
    }
}

// =============================================================================
// APPLICANT
// =============================================================================

#[component]
fn ApplicantDashboard() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let flash = expect_context::<RwSignal<FlashState>>();

    let current = RwSignal::new(None::<Application>);
    let school = RwSignal::new(String::new());
    let major = RwSignal::new(String::new());
    let graduation_year = RwSignal::new(String::new());
    let essay = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let fill = move |application: Application| {
        school.set(application.school.clone());
        major.set(application.major.clone());
        graduation_year.set(application.graduation_year.to_string());
        essay.set(application.essay.clone());
        current.set(Some(application));
    };

    Effect::new(move || {
        let Some(token) = session.token() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::net::api::list_applications(&token, None).await {
                Ok(list) => {
                    if let Some(application) = list.into_iter().next() {
                        fill(application);
                    }
                }
                Err(e) => send_flash_message(flash, e.message(), FlashKind::Red),
            }
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        clear_flash_messages(flash);
        let input = match build_application_input(&school.get(), &major.get(), &graduation_year.get(), &essay.get()) {
            Ok(input) => input,
            Err(msg) => {
                send_flash_message(flash, msg, FlashKind::Red);
                return;
            }
        };
        let Some(token) = session.token() else {
            return;
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::submit_application(&token, &input).await {
                Ok(application) => {
                    fill(application);
                    send_flash_message(flash, APPLICATION_SAVED, FlashKind::Green);
                }
                Err(e) => send_flash_message(flash, e.message(), FlashKind::Red),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (token, input);
    };

    let status_label = move || current.get().map(|a| a.status.label()).unwrap_or("Not submitted");

    view! {
        <section class="applicant-dashboard">
            <h2>"Your application"</h2>
            <p class="applicant-dashboard__status">
                "Status: "
                <strong>{status_label}</strong>
            </p>
            <form class="application-form" on:submit=on_submit>
                <label>
                    "School"
                    <input
                        type="text"
                        prop:value=move || school.get()
                        on:input=move |ev| school.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Major"
                    <input
                        type="text"
                        prop:value=move || major.get()
                        on:input=move |ev| major.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Graduation year"
                    <input
                        type="number"
                        prop:value=move || graduation_year.get()
                        on:input=move |ev| graduation_year.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Essay"
                    <textarea
                        rows="8"
                        prop:value=move || essay.get()
                        on:input=move |ev| essay.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    {move || if current.get().is_some() { "Update Application" } else { "Submit Application" }}
                </button>
            </form>
        </section>
    }
}

// =============================================================================
// ADMIN
// =============================================================================

#[component]
fn AdminDashboard() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let flash = expect_context::<RwSignal<FlashState>>();

    let filter = RwSignal::new(None::<Status>);
    let applications = RwSignal::new(Vec::<Application>::new());
    let loading = RwSignal::new(true);

    Effect::new(move || {
        let status = filter.get();
        let Some(token) = session.token() else {
            return;
        };
        loading.set(true);
        leptos::task::spawn_local(async move {
            match crate::net::api::list_applications(&token, status).await {
                Ok(list) => applications.set(list),
                Err(e) => send_flash_message(flash, e.message(), FlashKind::Red),
            }
            loading.set(false);
        });
    });

    let on_updated = Callback::new(move |updated: Application| {
        let status = filter.get_untracked();
        applications.update(|list| apply_status_change(list, updated, status));
    });

    view! {
        <section class="admin-dashboard">
            <div class="admin-dashboard__toolbar">
                <h2>"Applications"</h2>
                <label>
                    "Show "
                    <select on:change=move |ev| filter.set(parse_status_filter(&event_target_value(&ev)))>
                        <option value="">"All"</option>
                        {status_options()
                            .into_iter()
                            .map(|(value, label)| view! { <option value=value>{label}</option> })
                            .collect_view()}
                    </select>
                </label>
            </div>
            <Show
                when=move || !applications.with(Vec::is_empty)
                fallback=move || {
                    view! {
                        <p class="admin-dashboard__empty">
                            {move || if loading.get() { "Loading..." } else { "No applications yet." }}
                        </p>
                    }
                }
            >
                <table class="applications-table">
                    <thead>
                        <tr>
                            <th>"Applicant"</th>
                            <th>"Email"</th>
                            <th>"School"</th>
                            <th>"Major"</th>
                            <th>"Year"</th>
                            <th>"Status"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || applications.get()
                            key=|a| (a.id, a.status)
                            children=move |application| {
                                let href = format!("/applications/{}", application.id);
                                view! {
                                    <tr>
                                        <td>
                                            <a href=href>{application.applicant_name.clone()}</a>
                                        </td>
                                        <td>{application.applicant_email.clone()}</td>
                                        <td>{application.school.clone()}</td>
                                        <td>{application.major.clone()}</td>
                                        <td>{application.graduation_year}</td>
                                        <td>
                                            <StatusSelector application=application on_updated=on_updated/>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}
