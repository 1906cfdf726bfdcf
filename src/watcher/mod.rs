//! Font directory watching subsystem.
//!
//! # Data Flow
//! ```text
//! Platform notification (notify callback thread)
//!     → backend.rs (notify::Event → ChangeEvent, or WatchError)
//!     → raw notice channel
//!     → pump.rs (logs failures, stops on the shutdown signal)
//!     → change event channel
//!     → service control loop
//! ```
//!
//! # Design Decisions
//! - Platform event flags become `ChangeKind` at the backend boundary
//! - Shutdown arrives on its own broadcast channel, never as a failure value
//! - `FontWatcher` owns every watcher resource; dropping it releases them

pub mod backend;
pub mod event;
pub mod handle;
pub mod pump;

pub use backend::{NotifyBackend, RawNotice, RawSender, WatchBackend, WatchError};
pub use event::{ChangeEvent, ChangeKind};
pub use handle::FontWatcher;
pub use pump::PumpExit;
