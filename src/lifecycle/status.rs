//! Service status state machine and reporting.
//!
//! # States
//! ```text
//! StartPending → Running → StopPending → Stopped
//! StartPending ──────────→ StopPending          (fatal startup failure)
//! ```
//!
//! # Design Decisions
//! - Transitions only move forward; a state is never revisited
//! - Only Running accepts Stop and Shutdown
//! - Every accepted transition is reported to the host

use tokio::sync::mpsc;

/// Lifecycle state of the service, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceState {
    StartPending,
    Running,
    StopPending,
    Stopped,
}

/// Set of control requests the service currently accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcceptedControls {
    pub stop: bool,
    pub shutdown: bool,
}

impl AcceptedControls {
    pub const NONE: Self = Self {
        stop: false,
        shutdown: false,
    };

    pub const STOP_AND_SHUTDOWN: Self = Self {
        stop: true,
        shutdown: true,
    };
}

/// Status as reported to the host service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub accepts: AcceptedControls,
}

impl ServiceStatus {
    /// Status for `state` with the controls that state accepts.
    pub fn for_state(state: ServiceState) -> Self {
        let accepts = match state {
            ServiceState::Running => AcceptedControls::STOP_AND_SHUTDOWN,
            _ => AcceptedControls::NONE,
        };
        Self { state, accepts }
    }
}

/// Owns the current status and pushes every transition to the host.
#[derive(Debug)]
pub struct StatusReporter {
    current: Option<ServiceStatus>,
    sink: mpsc::UnboundedSender<ServiceStatus>,
}

impl StatusReporter {
    pub fn new(sink: mpsc::UnboundedSender<ServiceStatus>) -> Self {
        Self {
            current: None,
            sink,
        }
    }

    /// Move to `state` and report it.
    ///
    /// Returns `false` (and reports nothing) when `state` is not ahead of
    /// the current state.
    pub fn transition(&mut self, state: ServiceState) -> bool {
        if let Some(current) = self.current {
            if state <= current.state {
                tracing::warn!(
                    from = ?current.state,
                    to = ?state,
                    "Ignoring backwards service status transition"
                );
                return false;
            }
        }

        let status = ServiceStatus::for_state(state);
        self.current = Some(status);
        self.send(status);
        true
    }

    /// Report the current status again without changing it.
    pub fn echo(&self) {
        if let Some(status) = self.current {
            self.send(status);
        }
    }

    fn send(&self, status: ServiceStatus) {
        if self.sink.send(status).is_err() {
            tracing::debug!(state = ?status.state, "Status sink closed, report dropped");
        }
    }
}
