//! OS signal handling for the foreground host.
//!
//! # Responsibilities
//! - Translate Ctrl-C into a Stop request
//! - Translate SIGTERM (unix) into a Shutdown request
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - One request per process; the control loop exits on the first

use tokio::sync::mpsc;

use crate::lifecycle::ControlRequest;

/// Wait for the first termination signal and map it to a control request.
pub async fn wait_for_terminal_signal() -> ControlRequest {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => ControlRequest::Stop,
                    _ = term.recv() => ControlRequest::Shutdown,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "SIGTERM handler unavailable, listening for Ctrl-C only"
                );
                ctrl_c_request().await
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c_request().await
    }
}

async fn ctrl_c_request() -> ControlRequest {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return std::future::pending().await;
    }
    ControlRequest::Stop
}

/// Forward the first termination signal into the control request channel.
pub async fn forward_signals(requests: mpsc::UnboundedSender<ControlRequest>) {
    let request = wait_for_terminal_signal().await;
    tracing::info!(request = %request, "Termination signal received");
    let _ = requests.send(request);
}
