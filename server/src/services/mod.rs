//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request translation and auth plumbing.

pub mod application;
pub mod mailer;
pub mod password;
pub mod password_reset;
pub mod session;
pub mod user;
