//! Font file handling subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     directory.rs (create if absent, list files)
//!     → registrar.rs for each existing file
//!
//! Running:
//!     Created change event
//!     → tracker.rs guard + spawned task
//!     → registrar.rs (settle, one platform.rs call, log outcome)
//! ```
//!
//! # Design Decisions
//! - Registration failures are logged only; nothing is retried
//! - Tasks run to completion even after the service stops

pub mod directory;
pub mod platform;
pub mod registrar;
pub mod tracker;

pub use directory::{DirectoryBootstrapper, FontDirectory};
pub use platform::{FontApi, SystemFontApi};
pub use registrar::{FontRegistrar, RegistrationOutcome, SettlePolicy};
pub use tracker::{RegistrationGuard, RegistrationTracker};
