//! Outgoing email for password resets.
//!
//! DESIGN
//! ======
//! Routes depend on the [`Mailer`] trait only. Production uses Resend when
//! `RESEND_API_KEY`/`RESEND_FROM` are set; otherwise [`LogMailer`] writes the
//! link to the log so local setups can still complete a reset.

use std::sync::Arc;

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use tracing::info;

use crate::config::ServerConfig;

const PASSWORD_RESET_TEMPLATE: &str = include_str!("../../templates/password_reset.html");
const PASSWORD_RESET_SUBJECT: &str = "Reset your Applytrack password";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// A reset email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEmail {
    pub to: String,
    pub name: String,
    pub link: String,
    pub ttl_minutes: i32,
}

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, email: &ResetEmail) -> Result<(), MailError>;
}

/// Delivers through the Resend HTTP API.
pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(api_key: &str, from: String) -> Self {
        Self { client: Resend::new(api_key), from }
    }
}

#[async_trait::async_trait]
impl Mailer for ResendMailer {
    async fn send_password_reset(&self, email: &ResetEmail) -> Result<(), MailError> {
        let html = render_password_reset(email);
        let to = [email.to.as_str()];
        let message = CreateEmailBaseOptions::new(&self.from, to, PASSWORD_RESET_SUBJECT).with_html(&html);
        self.client
            .emails
            .send(message)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Logs the link instead of sending anything.
pub struct LogMailer;

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &ResetEmail) -> Result<(), MailError> {
        info!(to = %email.to, link = %email.link, "password reset link (email delivery not configured)");
        Ok(())
    }
}

/// Pick the mailer implied by `config`.
#[must_use]
pub fn from_config(config: &ServerConfig) -> Arc<dyn Mailer> {
    match &config.resend {
        Some(resend) => Arc::new(ResendMailer::new(&resend.api_key, resend.from.clone())),
        None => Arc::new(LogMailer),
    }
}

/// Fill the reset template. Substituted values are HTML-escaped; the
/// account name goes in last so it cannot smuggle in another placeholder.
#[must_use]
pub fn render_password_reset(email: &ResetEmail) -> String {
    PASSWORD_RESET_TEMPLATE
        .replace("{{TTL_MINUTES}}", &email.ttl_minutes.to_string())
        .replace("{{LINK}}", &html_escape::encode_double_quoted_attribute(&email.link))
        .replace("{{NAME}}", &html_escape::encode_text(&email.name))
}

#[cfg(test)]
#[path = "mailer_test.rs"]
mod tests;
