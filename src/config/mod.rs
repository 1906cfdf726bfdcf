//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, or defaults)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → loader.rs resolves <root>/<dir_name> once at startup
//!     → FontDirectory handed to the control loop
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the service has no reload path
//! - All fields have defaults so the service runs without a config file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, resolve_font_dir, ConfigError};
pub use schema::ObservabilityConfig;
pub use schema::ServiceConfig;
pub use schema::SettleConfig;
pub use schema::SettleStrategy;
