//! In-flight registration tracking.
//!
//! Registration tasks are never joined or cancelled; the tracker only counts
//! them so shutdown can report how many are still running.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Counts registration tasks that have not finished yet.
#[derive(Debug, Clone, Default)]
pub struct RegistrationTracker {
    in_flight: Arc<AtomicUsize>,
}

impl RegistrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new task. Returns a guard that decrements on drop.
    pub fn track(&self) -> RegistrationGuard {
        let count = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_in_flight(count);
        RegistrationGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Guard held by a registration task for its whole lifetime.
#[derive(Debug)]
pub struct RegistrationGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        let count = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_in_flight(count);
    }
}
