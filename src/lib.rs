//! Font directory watcher service library.

pub mod config;
pub mod fonts;
pub mod host;
pub mod lifecycle;
pub mod observability;
pub mod service;
pub mod watcher;

pub use config::schema::ServiceConfig;
pub use lifecycle::{ControlRequest, ServiceState, ServiceStatus, Shutdown};
pub use service::{LoopExit, ServiceControlLoop};
