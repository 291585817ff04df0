//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` before calling
//! [`ServerConfig::from_env`]; everything else receives the parsed struct.

use crate::services::password::normalize_email;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SESSION_TTL_HOURS: i32 = 24 * 7;
pub const DEFAULT_RESET_TTL_MINUTES: i32 = 60;
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Credentials for the Resend delivery API. Absent means reset links are
/// only written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendConfig {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub session_ttl_hours: i32,
    pub reset_ttl_minutes: i32,
    /// Public origin used to build links in outgoing email.
    pub app_url: String,
    /// Normalized addresses that receive the admin role at sign-up.
    pub admin_emails: Vec<String>,
    pub resend: Option<ResendConfig>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `SESSION_TTL_HOURS`: default 168
    /// - `RESET_TTL_MINUTES`: default 60
    /// - `APP_URL`: default `http://localhost:3000`
    /// - `ADMIN_EMAILS`: comma-separated list
    /// - `RESEND_API_KEY` + `RESEND_FROM`: enable email delivery
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent or a numeric
    /// variable does not parse as a positive number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let port = env_parse("PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let session_ttl_hours = env_parse_positive("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        let reset_ttl_minutes = env_parse_positive("RESET_TTL_MINUTES", DEFAULT_RESET_TTL_MINUTES)?;

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| DEFAULT_APP_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let admin_emails = parse_admin_emails(std::env::var("ADMIN_EMAILS").ok().as_deref());

        let resend = match (std::env::var("RESEND_API_KEY").ok(), std::env::var("RESEND_FROM").ok()) {
            (Some(api_key), Some(from)) if !api_key.trim().is_empty() && !from.trim().is_empty() => {
                Some(ResendConfig { api_key, from })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            port,
            db_max_connections,
            session_ttl_hours,
            reset_ttl_minutes,
            app_url,
            admin_emails,
            resend,
        })
    }

    /// Whether `email` (any casing) is configured as an administrator.
    #[must_use]
    pub fn is_admin_email(&self, email: &str) -> bool {
        normalize_email(email).is_some_and(|email| self.admin_emails.contains(&email))
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}

fn env_parse_positive(var: &'static str, default: i32) -> Result<i32, ConfigError> {
    let value = env_parse(var, default)?;
    if value <= 0 {
        return Err(ConfigError::Invalid { var, value: value.to_string() });
    }
    Ok(value)
}

/// Split a comma-separated list, dropping blanks and malformed addresses.
pub(crate) fn parse_admin_emails(raw: Option<&str>) -> Vec<String> {
    let mut emails: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .filter_map(normalize_email)
        .collect();
    emails.sort();
    emails.dedup();
    emails
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
