//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles every REST call; request and response bodies are the
//! `shared` crate types the server also uses.

pub mod api;
