//! Owned watcher handle: backend, event stream and pump task together.

use std::path::Path;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::observability::EventLog;
use crate::watcher::backend::{RawSender, WatchBackend, WatchError};
use crate::watcher::event::ChangeEvent;
use crate::watcher::pump::{run_pump, PumpExit};

/// A running directory watcher.
///
/// Dropping the handle releases the backend, which closes the raw channel
/// and lets the pump finish on its own. `close` does the same and waits for
/// the pump.
pub struct FontWatcher<B: WatchBackend> {
    backend: B,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    pump: JoinHandle<PumpExit>,
}

impl<B: WatchBackend> FontWatcher<B> {
    /// Build the backend through `build` and spawn the pump.
    ///
    /// `shutdown` is the done signal the pump listens on; it must be
    /// subscribed before the coordinator can fire.
    pub fn start<F>(
        build: F,
        shutdown: broadcast::Receiver<()>,
        log: EventLog,
    ) -> Result<Self, WatchError>
    where
        F: FnOnce(RawSender) -> Result<B, WatchError>,
    {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let backend = build(raw_tx)?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(run_pump(raw_rx, events_tx, shutdown, log));

        Ok(Self {
            backend,
            events: events_rx,
            pump,
        })
    }

    /// Register `dir` for change notifications.
    pub fn watch(&mut self, dir: &Path) -> Result<(), WatchError> {
        self.backend.watch(dir)
    }

    /// Next change event; `None` once the pump has stopped.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    /// Release the backend and wait for the pump to finish.
    pub async fn close(self) -> Option<PumpExit> {
        let Self {
            backend,
            events,
            pump,
        } = self;
        drop(backend);
        drop(events);

        match pump.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                tracing::error!(error = %e, "Watcher pump task failed");
                None
            }
        }
    }
}
