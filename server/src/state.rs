//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the parsed configuration, and the mailer used for
//! password resets.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::mailer::{self, Mailer};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: ServerConfig) -> Self {
        let mailer = mailer::from_config(&config);
        Self::with_mailer(pool, config, mailer)
    }

    #[must_use]
    pub fn with_mailer(pool: PgPool, config: ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, config: Arc::new(config), mailer }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
