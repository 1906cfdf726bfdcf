//! Foreground (debug) host.

use tokio::sync::mpsc;

use crate::config::ServiceConfig;
use crate::host::{exit_result, HostError};
use crate::lifecycle::{signals, ServiceStatus};
use crate::observability::EventLog;
use crate::service::{LoopExit, NotifyControlLoop, ServiceControlLoop};
use crate::watcher::{RawSender, WatchBackend, WatchError};

/// Run the service in the foreground until Ctrl-C or SIGTERM.
pub fn run(config: &ServiceConfig, log: EventLog) -> Result<(), HostError> {
    let service = NotifyControlLoop::from_config(config, log)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let exit = runtime.block_on(run_foreground(service));
    exit_result(exit)
}

/// Drive `service` with signal-based control requests, logging each status.
pub async fn run_foreground<B, F>(service: ServiceControlLoop<B, F>) -> LoopExit
where
    B: WatchBackend,
    F: FnOnce(RawSender) -> Result<B, WatchError>,
{
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (status_tx, mut status_rx) = mpsc::unbounded_channel::<ServiceStatus>();

    let signal_task = tokio::spawn(signals::forward_signals(request_tx));
    let reporter = tokio::spawn(async move {
        while let Some(status) = status_rx.recv().await {
            tracing::info!(
                state = ?status.state,
                accepts = ?status.accepts,
                "Service status changed"
            );
        }
    });

    let exit = service.run(request_rx, status_tx).await;

    signal_task.abort();
    let _ = reporter.await;
    exit
}
