//! Tracing subscriber setup.
//!
//! Interactive mode owns the terminal, so it logs to a daily rolling file.
//! Non-interactive commands log to stderr.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "inquiro.log";

/// Initializes file logging for interactive mode.
///
/// The returned guard flushes buffered lines on drop and must be held for the
/// lifetime of the session.
pub fn init_file_logging(config: &Config) -> Result<WorkerGuard> {
    let dir = config.logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .compact();

    tracing_subscriber::registry()
        .with(build_env_filter(&config.logging.level))
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Initializes stderr logging for one-shot commands.
///
/// Silently keeps an already-installed subscriber.
pub fn init_stderr_logging(config: &Config) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(&config.logging.level))
        .with(fmt_layer)
        .try_init();
}

/// `RUST_LOG` wins over the configured level.
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
