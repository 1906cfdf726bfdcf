//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber once per process
//! - Mirror output to a log file when configured (service mode has no console)
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - File output is plain text without ANSI colors

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid log filter '{0}'")]
    Filter(String),

    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}

/// Install the global subscriber according to `config`.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.log_level)?,
    };

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::LogFile {
                    path: path.display().to_string(),
                    source,
                })?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}

fn default_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(format!("fontwatch={level},warn"))
        .map_err(|_| LoggingError::Filter(level.to_string()))
}
