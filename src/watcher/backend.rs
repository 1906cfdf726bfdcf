//! Change-notification backends.
//!
//! A backend pushes raw notices into the pump's channel from whatever thread
//! the platform delivers them on. Dropping the backend releases the platform
//! watch and closes the channel.

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::watcher::event::ChangeEvent;

/// Genuine watcher failures. Shutdown never travels through this type.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("notify backend error: {0}")]
    Notify(#[from] notify::Error),

    #[error("watch backend unavailable: {0}")]
    Unavailable(String),
}

/// A change event or a failure, as produced by a backend.
pub type RawNotice = Result<ChangeEvent, WatchError>;

/// Sending half of the raw notice channel handed to a backend at construction.
pub type RawSender = mpsc::UnboundedSender<RawNotice>;

/// Platform watch subsystem as seen by the service.
pub trait WatchBackend: Send {
    /// Begin watching `dir` (non-recursively) for changes.
    fn watch(&mut self, dir: &Path) -> Result<(), WatchError>;
}

/// Backend over `notify`'s recommended watcher for the platform.
pub struct NotifyBackend {
    inner: RecommendedWatcher,
}

impl NotifyBackend {
    /// Construct the platform watcher; events flow into `raw`.
    pub fn new(raw: RawSender) -> Result<Self, WatchError> {
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(event) {
                        let _ = raw.send(Ok(change));
                    }
                }
                Err(e) => {
                    let _ = raw.send(Err(WatchError::Notify(e)));
                }
            },
            Config::default(),
        )?;

        Ok(Self { inner })
    }
}

impl WatchBackend for NotifyBackend {
    fn watch(&mut self, dir: &Path) -> Result<(), WatchError> {
        self.inner.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %dir.display(), "Watching font directory");
        Ok(())
    }
}

impl std::fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyBackend").finish_non_exhaustive()
    }
}
