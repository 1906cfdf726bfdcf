//! Startup failures.
//!
//! Every variant is fatal: the control loop reports StopPending without ever
//! reaching Running.

use std::path::PathBuf;

use thiserror::Error;

use crate::observability::EventCode;
use crate::watcher::WatchError;

#[derive(Debug, Error)]
pub enum StartupError {
    /// The font directory was missing and could not be created.
    #[error("could not create font directory {path}, check the account's permissions: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The font directory exists but could not be listed.
    #[error("could not list font directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The change-notification backend could not be constructed.
    #[error("could not start directory watcher: {0}")]
    WatcherUnavailable(#[source] WatchError),

    /// The watcher refused to watch the font directory.
    #[error("watcher could not watch directory {path}: {source}")]
    WatchRegistration {
        path: PathBuf,
        source: WatchError,
    },
}

impl StartupError {
    /// Event code used when logging this failure.
    pub fn event_code(&self) -> EventCode {
        match self {
            StartupError::CreateDir { .. } => EventCode::DirectoryCreation,
            StartupError::ReadDir { .. } => EventCode::DirectoryListing,
            StartupError::WatcherUnavailable(_) => EventCode::WatcherUnavailable,
            StartupError::WatchRegistration { .. } => EventCode::WatchRegistration,
        }
    }
}
