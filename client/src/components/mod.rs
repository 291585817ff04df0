//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session store and flash messages from Leptos context
//! providers installed by `app::App`.

pub mod flash_banner;
pub mod session_header;
pub mod status_selector;
