//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::flash_banner::FlashBanner;
use crate::pages::{
    application::ApplicationPage, dashboard::DashboardPage, forgot::ForgotPasswordPage, login::LoginPage,
    reset::ResetPasswordPage, signup::SignupPage,
};
use crate::state::flash::FlashState;
use crate::state::session::SessionStore;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session store and flash messages, restores the stored token,
/// and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = SessionStore::new();
    let flash = RwSignal::new(FlashState::default());
    provide_context(session);
    provide_context(flash);

    #[cfg(feature = "hydrate")]
    restore_session(session);

    view! {
        <Stylesheet id="leptos" href="/pkg/applytrack.css"/>
        <Title text="Applytrack"/>

        <Router>
            <FlashBanner/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("signup") view=SignupPage/>
                <Route path=StaticSegment("forgot") view=ForgotPasswordPage/>
                <Route path=StaticSegment("reset") view=ResetPasswordPage/>
                <Route path=StaticSegment("") view=DashboardPage/>
                <Route path=(StaticSegment("applications"), ParamSegment("id")) view=ApplicationPage/>
            </Routes>
        </Router>
    }
}

/// Load the stored token, rotate it, and start listening for other tabs.
/// A rejected token gives way to a newer one another tab stored, or signs the
/// tab out; a network failure keeps it for the next attempt.
#[cfg(feature = "hydrate")]
fn restore_session(session: SessionStore) {
    use crate::actions;
    use crate::state::session::{Dispatch, SessionAction};
    use crate::util::storage;

    storage::install_storage_sync(session);

    leptos::task::spawn_local(async move {
        if let Some(token) = storage::load_token() {
            session.dispatch(SessionAction::SetToken(Some(token)));
        }
        let refreshed = session.token();
        match actions::refresh_token(&session).await {
            Ok(_) => {}
            Err(e) if e.is_unauthorized() => {
                if let Some(token) = actions::refresh_rejected(&session, refreshed.as_deref(), storage::load_token()) {
                    match crate::net::api::fetch_me(&token).await {
                        Ok(user) => session.dispatch(SessionAction::SetUser(Some(user))),
                        Err(e) if e.is_unauthorized() => actions::sign_out(&session),
                        Err(e) => log::warn!("could not load user for stored token: {e}"),
                    }
                }
            }
            Err(e) => log::warn!("token refresh failed: {e}"),
        }
        session.dispatch(SessionAction::SetLoading(false));
    });
}
