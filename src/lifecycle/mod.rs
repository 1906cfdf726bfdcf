//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Host service manager / signals.rs
//!     → control.rs (ControlRequest: Interrogate, Stop, Shutdown, Unknown)
//!     → service control loop
//!     → status.rs (StatusReporter) → host
//!
//! Stop / Shutdown:
//!     control loop → shutdown.rs (Shutdown::trigger) → watcher pump exits
//!
//! Startup (startup.rs):
//!     Directory → existing fonts → watcher → watch registration → Running
//!     Any failure → StopPending, never Running
//! ```
//!
//! # Design Decisions
//! - Ordered startup: the host only sees Running once watching has begun
//! - The shutdown signal is separate from the watcher's failure path
//! - Status transitions are monotonic

pub mod control;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod status;

pub use control::ControlRequest;
pub use shutdown::Shutdown;
pub use startup::StartupError;
pub use status::{AcceptedControls, ServiceState, ServiceStatus, StatusReporter};
