//! Host adapters.
//!
//! # Data Flow
//! ```text
//! Foreground (console.rs):
//!     Ctrl-C / SIGTERM → ControlRequest → control loop → status log lines
//!
//! Windows service (windows.rs):
//!     SCM control → ControlRequest → control loop → ServiceStatus → SCM
//! ```
//!
//! # Design Decisions
//! - Hosts only translate; all service semantics live in the control loop
//! - Service mode exists only on Windows; elsewhere use the foreground host

pub mod console;
#[cfg(windows)]
pub mod windows;

use thiserror::Error;

use crate::config::{ConfigError, ServiceConfig};
use crate::lifecycle::StartupError;
use crate::observability::EventLog;
use crate::service::LoopExit;

/// Errors that end the process.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("startup failed: {0}")]
    Startup(#[from] StartupError),

    #[cfg(windows)]
    #[error("service control manager error: {0}")]
    Scm(#[from] windows_service::Error),

    #[error("service mode is only available on Windows, run with --debug")]
    Unsupported,

    #[error("service already started in this process")]
    AlreadyStarted,
}

/// Run under the platform service manager.
pub fn run_service(config: ServiceConfig, log: EventLog) -> Result<(), HostError> {
    #[cfg(windows)]
    {
        windows::run(config, log)
    }

    #[cfg(not(windows))]
    {
        let _ = (config, log);
        Err(HostError::Unsupported)
    }
}

/// Map the loop's exit onto the process result.
pub fn exit_result(exit: LoopExit) -> Result<(), HostError> {
    match exit {
        LoopExit::Stopped { by, watcher } => {
            tracing::debug!(request = %by, ?watcher, "Control loop finished");
            Ok(())
        }
        LoopExit::StartupFailed(e) => Err(HostError::Startup(e)),
    }
}
