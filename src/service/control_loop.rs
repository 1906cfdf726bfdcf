//! The service control loop.
//!
//! # Responsibilities
//! - Bring the service up: font directory, existing fonts, watcher
//! - Multiplex heartbeat ticks, host control requests and change events
//! - Spawn one registration task per created file
//! - Signal the watcher and report the stop sequence to the host
//!
//! # State Transitions
//! ```text
//! StartPending → Running:      directory listed, fonts registered, watch active
//! StartPending → StopPending:  any startup failure (never Running)
//! Running → Running:           tick, Interrogate, unknown control, change event
//! Running → StopPending:       Stop or Shutdown (watcher signalled first)
//! StopPending → Stopped:       watcher released
//! ```
//!
//! # Design Decisions
//! - One event source per iteration, chosen at random among ready sources
//! - Registration tasks are detached; shutdown neither awaits nor cancels them
//! - A closed control channel is treated as Shutdown

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};

use crate::config::validation::validate_config;
use crate::config::{resolve_font_dir, ConfigError, ServiceConfig};
use crate::fonts::{
    DirectoryBootstrapper, FontDirectory, FontRegistrar, RegistrationTracker, SettlePolicy,
    SystemFontApi,
};
use crate::lifecycle::{
    ControlRequest, ServiceState, ServiceStatus, Shutdown, StartupError, StatusReporter,
};
use crate::observability::{EventCode, EventLog};
use crate::watcher::{FontWatcher, NotifyBackend, PumpExit, RawSender, WatchBackend, WatchError};

/// Shortest heartbeat the loop will run with.
const MIN_TICK: Duration = Duration::from_millis(1);

/// How the control loop ended.
#[derive(Debug)]
pub enum LoopExit {
    /// The host asked the service to stop. `watcher` is how the watcher's
    /// pump ended, `None` if its task failed.
    Stopped {
        by: ControlRequest,
        watcher: Option<PumpExit>,
    },
    /// Startup failed before the service reached Running.
    StartupFailed(StartupError),
}

/// Factory signature for the production backend.
pub type NotifyBackendFactory = fn(RawSender) -> Result<NotifyBackend, WatchError>;

/// Control loop over the platform's notify backend.
pub type NotifyControlLoop = ServiceControlLoop<NotifyBackend, NotifyBackendFactory>;

/// The service's single dispatch loop. `run` consumes it, so an instance
/// can only ever be run once.
pub struct ServiceControlLoop<B, F> {
    font_dir: FontDirectory,
    tick: Duration,
    registrar: FontRegistrar,
    tracker: RegistrationTracker,
    log: EventLog,
    build_backend: F,
    _backend: PhantomData<fn() -> B>,
}

impl NotifyControlLoop {
    /// Wire the loop to the real font API and notify backend.
    pub fn from_config(config: &ServiceConfig, log: EventLog) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let font_dir = resolve_font_dir(config)?;
        let registrar = FontRegistrar::new(
            Arc::new(SystemFontApi),
            SettlePolicy::from_config(&config.fonts.settle),
            log.clone(),
        );

        Ok(ServiceControlLoop::new(
            font_dir,
            Duration::from_millis(config.service.tick_interval_ms),
            registrar,
            log,
            NotifyBackend::new as NotifyBackendFactory,
        ))
    }
}

impl<B, F> ServiceControlLoop<B, F>
where
    B: WatchBackend,
    F: FnOnce(RawSender) -> Result<B, WatchError>,
{
    /// `tick` is raised to at least one millisecond.
    pub fn new(
        font_dir: FontDirectory,
        tick: Duration,
        registrar: FontRegistrar,
        log: EventLog,
        build_backend: F,
    ) -> Self {
        Self {
            font_dir,
            tick: tick.max(MIN_TICK),
            registrar,
            tracker: RegistrationTracker::new(),
            log,
            build_backend,
            _backend: PhantomData,
        }
    }

    /// Handle on the in-flight registration count, usable after `run` returns.
    pub fn tracker(&self) -> RegistrationTracker {
        self.tracker.clone()
    }

    /// Run the service until the host stops it or startup fails.
    ///
    /// Every status transition is sent on `status`, ending with Stopped.
    pub async fn run(
        self,
        mut requests: mpsc::UnboundedReceiver<ControlRequest>,
        status: mpsc::UnboundedSender<ServiceStatus>,
    ) -> LoopExit {
        let Self {
            font_dir,
            tick,
            registrar,
            tracker,
            log,
            build_backend,
            ..
        } = self;

        let mut status = StatusReporter::new(status);
        status.transition(ServiceState::StartPending);

        let shutdown = Shutdown::new();
        let startup =
            start_watching(&font_dir, &registrar, &tracker, &log, build_backend, &shutdown).await;
        let mut watcher = match startup {
            Ok(watcher) => watcher,
            Err(e) => {
                log.error(e.event_code(), e.to_string());
                status.transition(ServiceState::StopPending);
                status.transition(ServiceState::Stopped);
                return LoopExit::StartupFailed(e);
            }
        };

        status.transition(ServiceState::Running);
        tracing::info!(path = %font_dir, "Service running");

        let mut ticker = time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events_open = true;

        let by = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::trace!("Heartbeat");
                }
                request = requests.recv() => match request {
                    Some(ControlRequest::Interrogate) => status.echo(),
                    Some(request @ (ControlRequest::Stop | ControlRequest::Shutdown)) => {
                        tracing::info!(request = %request, "Stop requested");
                        shutdown.trigger();
                        break request;
                    }
                    Some(ControlRequest::Unknown(code)) => {
                        log.error(
                            EventCode::Service,
                            format!("unexpected control request #{}", code),
                        );
                    }
                    None => {
                        tracing::warn!("Control channel closed, shutting down");
                        shutdown.trigger();
                        break ControlRequest::Shutdown;
                    }
                },
                event = watcher.next_event(), if events_open => match event {
                    Some(change) if change.is_created() => {
                        spawn_registration(&registrar, &tracker, change.path);
                    }
                    Some(change) => {
                        tracing::trace!(
                            path = %change.path.display(),
                            "Ignoring non-creation change"
                        );
                    }
                    None => {
                        events_open = false;
                        tracing::warn!("Watcher event stream ended unexpectedly");
                    }
                },
            }
        };

        status.transition(ServiceState::StopPending);

        let pump_exit = watcher.close().await;
        tracing::debug!(?pump_exit, "Watcher released");
        if pump_exit != Some(PumpExit::Shutdown) {
            tracing::warn!(?pump_exit, "Watcher pump did not end on the shutdown signal");
        }

        let in_flight = tracker.in_flight();
        if in_flight > 0 {
            tracing::info!(in_flight, "Font registrations left running after stop");
        }

        status.transition(ServiceState::Stopped);
        LoopExit::Stopped {
            by,
            watcher: pump_exit,
        }
    }
}

/// Startup sequence up to (not including) the Running report.
async fn start_watching<B, F>(
    font_dir: &FontDirectory,
    registrar: &FontRegistrar,
    tracker: &RegistrationTracker,
    log: &EventLog,
    build_backend: F,
    shutdown: &Shutdown,
) -> Result<FontWatcher<B>, StartupError>
where
    B: WatchBackend,
    F: FnOnce(RawSender) -> Result<B, WatchError>,
{
    let existing = DirectoryBootstrapper::new(log.clone()).ensure(font_dir)?;
    register_existing(registrar, tracker, existing).await;

    let mut watcher = FontWatcher::start(build_backend, shutdown.subscribe(), log.clone())
        .map_err(StartupError::WatcherUnavailable)?;

    if let Err(source) = watcher.watch(font_dir.as_path()) {
        watcher.close().await;
        return Err(StartupError::WatchRegistration {
            path: font_dir.as_path().to_path_buf(),
            source,
        });
    }

    Ok(watcher)
}

/// Register the files found at startup concurrently and wait for all of them.
async fn register_existing(
    registrar: &FontRegistrar,
    tracker: &RegistrationTracker,
    files: Vec<PathBuf>,
) {
    if files.is_empty() {
        return;
    }
    tracing::info!(count = files.len(), "Registering fonts already in the directory");

    let mut batch = JoinSet::new();
    for path in files {
        let registrar = registrar.clone();
        let guard = tracker.track();
        batch.spawn(async move {
            let _guard = guard;
            registrar.register(&path).await
        });
    }

    while let Some(result) = batch.join_next().await {
        if let Err(e) = result {
            tracing::error!(error = %e, "Startup registration task failed");
        }
    }
}

/// Fire-and-forget registration of one created file.
fn spawn_registration(registrar: &FontRegistrar, tracker: &RegistrationTracker, path: PathBuf) {
    let registrar = registrar.clone();
    let guard = tracker.track();
    tokio::spawn(async move {
        let _guard = guard;
        registrar.register(&path).await;
    });
}
