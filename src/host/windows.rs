//! Windows service control manager host.

use std::ffi::OsString;
use std::sync::OnceLock;
use std::time::Duration;

use tokio::sync::mpsc;
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState as ScmState,
    ServiceStatus as ScmStatus, ServiceType,
};
use windows_service::service_control_handler::{
    self, ServiceControlHandlerResult, ServiceStatusHandle,
};
use windows_service::{define_windows_service, service_dispatcher};

use crate::config::ServiceConfig;
use crate::host::{exit_result, HostError};
use crate::lifecycle::{ControlRequest, ServiceState, ServiceStatus};
use crate::observability::{EventCode, EventLog};
use crate::service::{LoopExit, NotifyControlLoop};

/// Wait hint reported with pending states.
const PENDING_WAIT_HINT: Duration = Duration::from_secs(10);

/// Exit code reported when startup failed.
const STARTUP_FAILED_EXIT: u32 = 1;

struct Launch {
    config: ServiceConfig,
    log: EventLog,
}

static LAUNCH: OnceLock<Launch> = OnceLock::new();

define_windows_service!(ffi_service_main, service_main);

/// Hand the process over to the service dispatcher. Blocks until the service stops.
pub fn run(config: ServiceConfig, log: EventLog) -> Result<(), HostError> {
    let name = config.service.name.clone();
    LAUNCH
        .set(Launch { config, log })
        .map_err(|_| HostError::AlreadyStarted)?;
    service_dispatcher::start(&name, ffi_service_main)?;
    Ok(())
}

fn service_main(_arguments: Vec<OsString>) {
    let Some(launch) = LAUNCH.get() else {
        return;
    };
    if let Err(e) = run_service(launch) {
        launch.log.error(
            EventCode::Service,
            format!("{} service failed: {}", launch.config.service.name, e),
        );
    }
}

fn run_service(launch: &Launch) -> Result<(), HostError> {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let event_handler = move |control: ServiceControl| -> ServiceControlHandlerResult {
        let request = match control {
            ServiceControl::Interrogate => ControlRequest::Interrogate,
            ServiceControl::Stop => ControlRequest::Stop,
            ServiceControl::Shutdown => ControlRequest::Shutdown,
            other => ControlRequest::Unknown(other.raw_service_control_type()),
        };
        match (request, request_tx.send(request)) {
            (_, Err(_)) => ServiceControlHandlerResult::NotImplemented,
            (ControlRequest::Unknown(_), Ok(())) => ServiceControlHandlerResult::NotImplemented,
            (_, Ok(())) => ServiceControlHandlerResult::NoError,
        }
    };
    let status_handle =
        service_control_handler::register(&launch.config.service.name, event_handler)?;

    let service = match NotifyControlLoop::from_config(&launch.config, launch.log.clone()) {
        Ok(service) => service,
        Err(e) => {
            report(
                status_handle,
                ServiceStatus::for_state(ServiceState::Stopped),
                STARTUP_FAILED_EXIT,
            );
            return Err(e.into());
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let exit = runtime.block_on(async move {
        let (status_tx, mut status_rx) = mpsc::unbounded_channel::<ServiceStatus>();
        let forward = tokio::spawn(async move {
            while let Some(status) = status_rx.recv().await {
                // The final Stopped report carries the exit code, sent below.
                if status.state == ServiceState::Stopped {
                    break;
                }
                report(status_handle, status, 0);
            }
        });

        let exit = service.run(request_rx, status_tx).await;
        let _ = forward.await;
        exit
    });

    let exit_code = match exit {
        LoopExit::Stopped { .. } => 0,
        LoopExit::StartupFailed(_) => STARTUP_FAILED_EXIT,
    };
    report(status_handle, ServiceStatus::for_state(ServiceState::Stopped), exit_code);
    exit_result(exit)
}

fn report(handle: ServiceStatusHandle, status: ServiceStatus, exit_code: u32) {
    if let Err(e) = handle.set_service_status(to_scm(status, exit_code)) {
        tracing::error!(
            error = %e,
            state = ?status.state,
            "Failed to report status to the service manager"
        );
    }
}

fn to_scm(status: ServiceStatus, exit_code: u32) -> ScmStatus {
    let mut controls_accepted = ServiceControlAccept::empty();
    if status.accepts.stop {
        controls_accepted |= ServiceControlAccept::STOP;
    }
    if status.accepts.shutdown {
        controls_accepted |= ServiceControlAccept::SHUTDOWN;
    }

    let (current_state, wait_hint) = match status.state {
        ServiceState::StartPending => (ScmState::StartPending, PENDING_WAIT_HINT),
        ServiceState::Running => (ScmState::Running, Duration::ZERO),
        ServiceState::StopPending => (ScmState::StopPending, PENDING_WAIT_HINT),
        ServiceState::Stopped => (ScmState::Stopped, Duration::ZERO),
    };

    ScmStatus {
        service_type: ServiceType::OWN_PROCESS,
        current_state,
        controls_accepted,
        exit_code: ServiceExitCode::Win32(exit_code),
        checkpoint: 0,
        wait_hint,
        process_id: None,
    }
}
