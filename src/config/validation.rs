//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, bounded grace periods)
//! - Reject directory names that would escape the public root
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::{Component, Path};

use crate::config::schema::{ServiceConfig, SettleStrategy};

/// Longest grace period accepted for the fixed settle strategy.
const MAX_GRACE_MS: u64 = 60_000;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::new("service.name", "must not be empty"));
    }
    if config.service.tick_interval_ms == 0 {
        errors.push(ValidationError::new(
            "service.tick_interval_ms",
            "must be greater than zero",
        ));
    }

    if config.fonts.root_dir.is_none() && config.fonts.root_env.trim().is_empty() {
        errors.push(ValidationError::new(
            "fonts.root_env",
            "must name an environment variable when root_dir is unset",
        ));
    }
    if !is_single_component(&config.fonts.dir_name) {
        errors.push(ValidationError::new(
            "fonts.dir_name",
            format!("'{}' must be a single directory name", config.fonts.dir_name),
        ));
    }

    let settle = &config.fonts.settle;
    if settle.grace_ms > MAX_GRACE_MS {
        errors.push(ValidationError::new(
            "fonts.settle.grace_ms",
            format!("must be at most {} ms", MAX_GRACE_MS),
        ));
    }
    if settle.strategy == SettleStrategy::Stable {
        if settle.stable_poll_ms == 0 {
            errors.push(ValidationError::new(
                "fonts.settle.stable_poll_ms",
                "must be greater than zero",
            ));
        }
        if settle.stable_max_wait_ms < settle.stable_poll_ms {
            errors.push(ValidationError::new(
                "fonts.settle.stable_max_wait_ms",
                "must not be shorter than stable_poll_ms",
            ));
        }
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
