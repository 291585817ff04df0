//! # client
//!
//! Leptos + WASM frontend for Applytrack: sign-in flows, the applicant's
//! application form, and the admin review dashboard.
//!
//! ARCHITECTURE
//! ============
//! `net::api` is the only module that talks HTTP. `actions` wraps those calls
//! and feeds their results into the session store (`state::session`) and
//! flash messages (`state::flash`). Pages and components read both through
//! Leptos context.

pub mod actions;
pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
