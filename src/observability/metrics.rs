//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fontwatch_registrations_total` (counter): registration attempts by outcome
//! - `fontwatch_watch_events_total` (counter): watcher events by kind
//! - `fontwatch_registrations_in_flight` (gauge): registration tasks not yet finished
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::fonts::RegistrationOutcome;
use crate::watcher::ChangeKind;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_registration(outcome: &RegistrationOutcome) {
    let label = match outcome {
        RegistrationOutcome::Added { .. } => "added",
        RegistrationOutcome::Failed { .. } => "failed",
        RegistrationOutcome::Skipped => "skipped",
    };
    counter!("fontwatch_registrations_total", "outcome" => label).increment(1);
}

pub fn record_watch_event(kind: ChangeKind) {
    let label = match kind {
        ChangeKind::Created => "created",
        ChangeKind::Other => "other",
    };
    counter!("fontwatch_watch_events_total", "kind" => label).increment(1);
}

pub fn record_in_flight(count: usize) {
    gauge!("fontwatch_registrations_in_flight").set(count as f64);
}
