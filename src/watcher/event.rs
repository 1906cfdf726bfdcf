//! Change events and translation from platform notifications.

use std::path::PathBuf;

use notify::event::CreateKind;
use notify::{Event, EventKind};

/// Kind of change observed in the watched directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A new file appeared.
    Created,
    /// Anything else (modification, removal, rename, access, new folders).
    Other,
}

impl ChangeKind {
    /// Map a notify event kind onto the service's two-kind model.
    pub fn from_notify(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(CreateKind::Folder) => ChangeKind::Other,
            EventKind::Create(_) => ChangeKind::Created,
            _ => ChangeKind::Other,
        }
    }
}

/// A single change in the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Created,
        }
    }

    pub fn other(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Other,
        }
    }

    pub fn is_created(&self) -> bool {
        self.kind == ChangeKind::Created
    }

    /// One change event per path carried by a notify event.
    pub fn from_notify(event: Event) -> Vec<ChangeEvent> {
        let kind = ChangeKind::from_notify(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| ChangeEvent { path, kind })
            .collect()
    }
}
