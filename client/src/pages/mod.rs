//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`.

pub mod application;
pub mod dashboard;
pub mod forgot;
pub mod login;
pub mod reset;
pub mod signup;
