//! Service event log.
//!
//! # Responsibilities
//! - Carry the coded event records the host operator reads (startup,
//!   shutdown, per-file outcomes, watcher failures, bad control requests)
//! - Let each component receive its sink at construction instead of
//!   reaching for a process-wide handle
//!
//! # Design Decisions
//! - Codes are small integers kept stable across releases but not a public contract
//! - `TracingSink` forwards to `tracing`; `MemorySink` keeps records for inspection

use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Numeric identifiers for event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    /// Service start/stop and unexpected control requests.
    Service,
    /// The directory watcher could not be constructed.
    WatcherUnavailable,
    /// The directory watcher reported a failure while running.
    WatcherFailure,
    /// The font directory could not be registered with the watcher.
    WatchRegistration,
    /// The font directory could not be listed.
    DirectoryListing,
    /// The font directory could not be created.
    DirectoryCreation,
    /// A font file was added to the font table.
    FontAdded,
    /// The font API rejected a file.
    FontRejected,
    /// The font directory was created at startup.
    DirectoryCreated,
}

impl EventCode {
    /// Raw identifier written alongside each record.
    pub fn id(self) -> u32 {
        match self {
            EventCode::Service => 1,
            EventCode::WatcherUnavailable => 2,
            EventCode::WatcherFailure => 3,
            EventCode::WatchRegistration => 4,
            EventCode::DirectoryListing => 7,
            EventCode::DirectoryCreation => 8,
            EventCode::FontAdded => 10,
            EventCode::FontRejected => 11,
            EventCode::DirectoryCreated => 22,
        }
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A single event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub severity: Severity,
    pub code: EventCode,
    pub message: String,
}

/// Destination for event records.
pub trait EventSink: Send + Sync {
    fn record(&self, record: EventRecord);
}

/// Cloneable handle to an event sink, passed to components at construction.
#[derive(Clone)]
pub struct EventLog {
    sink: Arc<dyn EventSink>,
}

impl EventLog {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Event log that forwards to `tracing`, tagged with the service name.
    pub fn tracing(service: impl Into<String>) -> Self {
        Self::new(Arc::new(TracingSink::new(service)))
    }

    pub fn info(&self, code: EventCode, message: impl Into<String>) {
        self.emit(Severity::Info, code, message.into());
    }

    pub fn warning(&self, code: EventCode, message: impl Into<String>) {
        self.emit(Severity::Warning, code, message.into());
    }

    pub fn error(&self, code: EventCode, message: impl Into<String>) {
        self.emit(Severity::Error, code, message.into());
    }

    fn emit(&self, severity: Severity, code: EventCode, message: String) {
        self.sink.record(EventRecord {
            severity,
            code,
            message,
        });
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}

/// Sink writing records as `tracing` events.
#[derive(Debug)]
pub struct TracingSink {
    service: String,
}

impl TracingSink {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl EventSink for TracingSink {
    fn record(&self, record: EventRecord) {
        let event_id = record.code.id();
        match record.severity {
            Severity::Info => {
                tracing::info!(service = %self.service, event_id, "{}", record.message)
            }
            Severity::Warning => {
                tracing::warn!(service = %self.service, event_id, "{}", record.message)
            }
            Severity::Error => {
                tracing::error!(service = %self.service, event_id, "{}", record.message)
            }
        }
    }
}

/// Sink keeping every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<EventRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    /// Number of records carrying `code`.
    pub fn count(&self, code: EventCode) -> usize {
        self.lock().iter().filter(|r| r.code == code).count()
    }

    /// Number of records at `severity`.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.lock().iter().filter(|r| r.severity == severity).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EventRecord>> {
        // A panic while holding the lock leaves the vector intact.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for MemorySink {
    fn record(&self, record: EventRecord) {
        self.lock().push(record);
    }
}
