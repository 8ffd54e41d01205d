pub mod auth;
pub mod chat;
pub mod config;
pub mod history;
pub mod send;

use anyhow::{Context, Result, anyhow};
use inquiro_core::config::Config;
use inquiro_core::credentials::{self, SESSION_EXPIRED_HINT};
use inquiro_core::transport::{HttpTransport, TransportError};

/// Builds the HTTP client for one-shot commands.
fn transport(config: &Config) -> Result<HttpTransport> {
    HttpTransport::from_config(config, credentials::default_store()).context("create API client")
}

/// Maps a failed request to a user-facing error.
fn request_failed(error: TransportError, action: &str) -> anyhow::Error {
    if error.is_unauthorized() {
        return anyhow!(SESSION_EXPIRED_HINT);
    }
    tracing::warn!(kind = %error.kind, status = ?error.status, "{action} failed");
    anyhow::Error::new(error).context(action.to_string())
}
