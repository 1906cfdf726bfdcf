//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the font watcher service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service identity and loop timing.
    pub service: ServiceSection,

    /// Font directory location and registration behavior.
    pub fonts: FontsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Service identity and dispatch loop settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Name registered with the host service manager.
    pub name: String,

    /// Heartbeat interval of the dispatch loop in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "fontwatch".to_string(),
            tick_interval_ms: 500,
        }
    }
}

/// Where the watched font directory lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Environment variable holding the public data root.
    pub root_env: String,

    /// Explicit root, overriding `root_env` when set.
    pub root_dir: Option<PathBuf>,

    /// Name of the font directory below the root.
    pub dir_name: String,

    /// How long to let a new file settle before registering it.
    pub settle: SettleConfig,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            root_env: "PUBLIC".to_string(),
            root_dir: None,
            dir_name: "fonts".to_string(),
            settle: SettleConfig::default(),
        }
    }
}

/// Strategy used to wait for a freshly created file to be fully written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettleStrategy {
    /// Sleep for `grace_ms` and then register.
    Fixed,
    /// Poll the file size until it stops changing (bounded by `stable_max_wait_ms`).
    Stable,
}

/// Settle (debounce) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SettleConfig {
    pub strategy: SettleStrategy,

    /// Fixed grace period in milliseconds.
    pub grace_ms: u64,

    /// Poll interval for the `stable` strategy in milliseconds.
    pub stable_poll_ms: u64,

    /// Upper bound on the `stable` wait in milliseconds.
    pub stable_max_wait_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            strategy: SettleStrategy::Fixed,
            grace_ms: 100,
            stable_poll_ms: 100,
            stable_max_wait_ms: 5_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Optional file that receives log output in addition to stdout.
    pub log_file: Option<PathBuf>,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
