//! Client-side reactive state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plain data structs wrapped in `RwSignal` and provided through Leptos
//! context by `app::App`. Reducer-style `apply`/`send` methods keep the
//! transitions testable without a browser.

pub mod flash;
pub mod session;
