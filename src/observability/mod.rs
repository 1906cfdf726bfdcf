//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Components produce:
//!     → events.rs (coded event records through an injected EventLog)
//!     → metrics.rs (counters, gauges)
//!     → tracing macros directly for diagnostics
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, optional log file)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Event records reach tracing through a sink handed to each component
//! - Metrics are cheap (atomic increments) and off unless enabled

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventCode, EventLog, EventRecord, EventSink, MemorySink, Severity, TracingSink};
