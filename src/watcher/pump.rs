//! The watcher's internal dispatch.
//!
//! Moves raw notices from the backend to the control loop, logging genuine
//! failures along the way, until the shutdown signal fires or either side of
//! the pipe goes away.

use tokio::sync::{broadcast, mpsc};

use crate::observability::{metrics, EventCode, EventLog};
use crate::watcher::backend::RawNotice;
use crate::watcher::event::ChangeEvent;

/// Why the pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// The shutdown signal was received.
    Shutdown,
    /// The backend was released and its channel closed.
    SourceClosed,
    /// The control loop stopped listening for events.
    ConsumerGone,
}

/// Run the pump until one of the `PumpExit` conditions occurs.
///
/// The shutdown branch is polled first so that, once signalled, no further
/// event is forwarded.
pub async fn run_pump(
    mut raw: mpsc::UnboundedReceiver<RawNotice>,
    events: mpsc::UnboundedSender<ChangeEvent>,
    mut shutdown: broadcast::Receiver<()>,
    log: EventLog,
) -> PumpExit {
    loop {
        tokio::select! {
            biased;

            // A closed or lagged channel means the coordinator is gone or has
            // fired; both end the pump the same way.
            _ = shutdown.recv() => {
                tracing::debug!("Watcher pump received shutdown signal");
                return PumpExit::Shutdown;
            }
            _ = events.closed() => return PumpExit::ConsumerGone,
            notice = raw.recv() => match notice {
                Some(Ok(change)) => {
                    metrics::record_watch_event(change.kind);
                    if events.send(change).is_err() {
                        return PumpExit::ConsumerGone;
                    }
                }
                Some(Err(e)) => {
                    log.error(
                        EventCode::WatcherFailure,
                        format!("watcher returned an error ({})", e),
                    );
                }
                None => return PumpExit::SourceClosed,
            },
        }
    }
}
