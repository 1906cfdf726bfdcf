//! Service core.
//!
//! # Data Flow
//! ```text
//! host ──ControlRequest──▶ ┌──────────────────────┐ ──ServiceStatus──▶ host
//!                          │  control_loop.rs     │
//! heartbeat tick ────────▶ │  (one select! per    │ ──spawn──▶ FontRegistrar task
//! watcher ──ChangeEvent──▶ │   iteration)         │ ──trigger──▶ Shutdown → watcher
//!                          └──────────────────────┘
//! ```

pub mod control_loop;

pub use control_loop::{LoopExit, NotifyControlLoop, ServiceControlLoop};
