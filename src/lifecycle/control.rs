//! Control requests delivered by the host service manager.

use std::fmt;

/// A request from the host, consumed exactly once by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Report the current status again.
    Interrogate,
    Stop,
    /// The machine is shutting down.
    Shutdown,
    /// Any control code the service does not handle.
    Unknown(u32),
}

impl fmt::Display for ControlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlRequest::Interrogate => write!(f, "interrogate"),
            ControlRequest::Stop => write!(f, "stop"),
            ControlRequest::Shutdown => write!(f, "shutdown"),
            ControlRequest::Unknown(code) => write!(f, "#{}", code),
        }
    }
}
