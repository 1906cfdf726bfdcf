//! Control loop behavior against fake watcher and font API.

use std::fs;
use std::time::{Duration, Instant};

use fontwatch::lifecycle::{AcceptedControls, ControlRequest, ServiceState, StartupError};
use fontwatch::observability::{EventCode, Severity};
use fontwatch::service::LoopExit;
use fontwatch::watcher::{ChangeEvent, PumpExit, WatchError};

mod common;

use common::{BackendMode, Options};

#[tokio::test]
async fn test_existing_fonts_registered_before_running() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.ttf"), b"a").unwrap();
    fs::write(dir.path().join("b.ttf"), b"b").unwrap();

    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;

    // Startup registrations are joined before Running is reported.
    let mut calls = h.api.calls();
    calls.sort();
    assert_eq!(calls, vec![dir.path().join("a.ttf"), dir.path().join("b.ttf")]);
    assert_eq!(h.sink.count(EventCode::FontAdded), 2);

    h.send(ControlRequest::Stop);
    assert_eq!(
        h.remaining_states().await,
        vec![ServiceState::StopPending, ServiceState::Stopped]
    );
    assert!(matches!(
        h.exit().await,
        LoopExit::Stopped {
            by: ControlRequest::Stop,
            watcher: Some(PumpExit::Shutdown),
        }
    ));
}

#[tokio::test]
async fn test_missing_directory_is_created() {
    let root = tempfile::tempdir().unwrap();
    let font_dir = root.path().join("fonts");

    let mut h = common::start(&font_dir, Options::default());
    h.wait_running().await;

    assert!(font_dir.is_dir());
    assert_eq!(h.sink.count(EventCode::DirectoryCreated), 1);
    assert!(h.api.calls().is_empty());

    h.send(ControlRequest::Shutdown);
    assert!(matches!(
        h.exit().await,
        LoopExit::Stopped {
            by: ControlRequest::Shutdown,
            watcher: Some(PumpExit::Shutdown),
        }
    ));
}

#[tokio::test]
async fn test_directory_failure_never_reaches_running() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let mut h = common::start(&blocker.join("fonts"), Options::default());

    assert_eq!(
        h.remaining_states().await,
        vec![
            ServiceState::StartPending,
            ServiceState::StopPending,
            ServiceState::Stopped
        ]
    );
    assert_eq!(h.sink.count_severity(Severity::Error), 1);
    assert!(matches!(
        h.exit().await,
        LoopExit::StartupFailed(StartupError::CreateDir { .. } | StartupError::ReadDir { .. })
    ));
}

#[tokio::test]
async fn test_watch_registration_failure_never_reaches_running() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        backend: BackendMode::WatchFails,
        ..Options::default()
    };

    let mut h = common::start(dir.path(), options);

    assert_eq!(
        h.remaining_states().await,
        vec![
            ServiceState::StartPending,
            ServiceState::StopPending,
            ServiceState::Stopped
        ]
    );
    assert_eq!(h.sink.count(EventCode::WatchRegistration), 1);
    assert!(h.raw_closed(), "watcher resources must be released");
    assert!(matches!(
        h.exit().await,
        LoopExit::StartupFailed(StartupError::WatchRegistration { .. })
    ));
}

#[tokio::test]
async fn test_unavailable_watcher_never_reaches_running() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        backend: BackendMode::Unavailable,
        ..Options::default()
    };

    let mut h = common::start(dir.path(), options);

    let states = h.remaining_states().await;
    assert!(!states.contains(&ServiceState::Running));
    assert_eq!(states.last(), Some(&ServiceState::Stopped));
    assert_eq!(h.sink.count(EventCode::WatcherUnavailable), 1);
    assert!(matches!(
        h.exit().await,
        LoopExit::StartupFailed(StartupError::WatcherUnavailable(_))
    ));
}

#[tokio::test]
async fn test_created_file_registered_once_after_grace() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        grace: Duration::from_millis(100),
        ..Options::default()
    };

    let mut h = common::start(dir.path(), options);
    h.wait_running().await;

    let created = dir.path().join("c.ttf");
    let sent_at = Instant::now();
    h.inject(Ok(ChangeEvent::created(&created)));

    let calls = h.wait_for_calls(1).await;
    assert!(sent_at.elapsed() >= Duration::from_millis(100));
    assert_eq!(calls, vec![created.clone()]);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.api.calls(), vec![created]);

    h.send(ControlRequest::Stop);
    h.exit().await;
}

#[tokio::test]
async fn test_non_creation_events_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;

    for name in ["x.ttf", "y.ttf", "x.ttf"] {
        h.inject(Ok(ChangeEvent::other(dir.path().join(name))));
    }
    // Events are delivered in order, so once this one is registered the
    // earlier ones have been seen.
    h.inject(Ok(ChangeEvent::created(dir.path().join("z.ttf"))));

    let calls = h.wait_for_calls(1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls, vec![dir.path().join("z.ttf")]);
    assert_eq!(h.api.calls().len(), 1);

    h.send(ControlRequest::Stop);
    h.exit().await;
}

#[tokio::test]
async fn test_interrogate_echoes_current_status() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;

    h.send(ControlRequest::Interrogate);
    let status = h.next_status().await;
    assert_eq!(status.state, ServiceState::Running);
    assert_eq!(status.accepts, AcceptedControls::STOP_AND_SHUTDOWN);

    h.send(ControlRequest::Interrogate);
    assert_eq!(h.next_state().await, ServiceState::Running);

    h.send(ControlRequest::Stop);
    h.exit().await;
}

#[tokio::test]
async fn test_unknown_control_logged_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;
    let before = h.sink.records().len();

    h.send(ControlRequest::Unknown(200));
    // Requests are handled in order; the echo proves the unknown one was seen.
    h.send(ControlRequest::Interrogate);
    assert_eq!(h.next_state().await, ServiceState::Running);

    let records = h.sink.records();
    assert_eq!(records.len(), before + 1);
    let record = records.last().unwrap();
    assert_eq!(record.code, EventCode::Service);
    assert_eq!(record.severity, Severity::Error);
    assert!(record.message.contains("200"));

    h.send(ControlRequest::Stop);
    h.exit().await;
}

#[tokio::test]
async fn test_stop_signals_watcher_and_releases_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;

    h.send(ControlRequest::Stop);
    assert_eq!(
        h.remaining_states().await,
        vec![ServiceState::StopPending, ServiceState::Stopped]
    );

    assert!(h.raw_closed(), "watcher pump must be gone after stop");
    assert_eq!(h.sink.count_severity(Severity::Error), 0);
    assert_eq!(h.sink.count(EventCode::WatcherFailure), 0);
    assert!(h.api.calls().is_empty());
    assert!(matches!(
        h.exit().await,
        LoopExit::Stopped {
            by: ControlRequest::Stop,
            watcher: Some(PumpExit::Shutdown),
        }
    ));
}

#[tokio::test]
async fn test_watcher_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;

    h.inject(Err(WatchError::Unavailable("event buffer overflow".into())));
    h.inject(Ok(ChangeEvent::created(dir.path().join("d.ttf"))));

    assert_eq!(h.wait_for_calls(1).await.len(), 1);
    assert_eq!(h.sink.count(EventCode::WatcherFailure), 1);

    h.send(ControlRequest::Interrogate);
    assert_eq!(h.next_state().await, ServiceState::Running);

    h.send(ControlRequest::Stop);
    h.exit().await;
}

#[tokio::test]
async fn test_shutdown_does_not_wait_for_registrations() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        grace: Duration::from_millis(400),
        ..Options::default()
    };

    let mut h = common::start(dir.path(), options);
    h.wait_running().await;

    h.inject(Ok(ChangeEvent::created(dir.path().join("e.ttf"))));
    h.inject(Ok(ChangeEvent::created(dir.path().join("f.ttf"))));
    // Let the loop pick both events up before the shutdown request competes.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.tracker.in_flight(), 2);

    let sent_at = Instant::now();
    h.send(ControlRequest::Shutdown);
    assert_eq!(h.next_state().await, ServiceState::StopPending);
    assert_eq!(h.next_state().await, ServiceState::Stopped);
    assert!(sent_at.elapsed() < Duration::from_millis(300));

    let tracker = h.tracker.clone();
    let api = h.api.clone();
    assert!(matches!(
        h.exit().await,
        LoopExit::Stopped {
            by: ControlRequest::Shutdown,
            watcher: Some(PumpExit::Shutdown),
        }
    ));
    assert!(api.calls().is_empty());

    // The detached tasks still finish on their own.
    let deadline = Instant::now() + common::WAIT;
    while tracker.in_flight() > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(tracker.in_flight(), 0);
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_closed_control_channel_acts_as_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = common::start(dir.path(), Options::default());
    h.wait_running().await;

    let (replacement, _) = tokio::sync::mpsc::unbounded_channel();
    drop(std::mem::replace(&mut h.requests, replacement));

    assert_eq!(
        h.remaining_states().await,
        vec![ServiceState::StopPending, ServiceState::Stopped]
    );
    assert!(matches!(
        h.exit().await,
        LoopExit::Stopped {
            by: ControlRequest::Shutdown,
            watcher: Some(PumpExit::Shutdown),
        }
    ));
}

#[tokio::test]
async fn test_zero_tick_still_runs() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        tick: Duration::ZERO,
        ..Options::default()
    };

    let mut h = common::start(dir.path(), options);
    h.wait_running().await;

    h.send(ControlRequest::Interrogate);
    assert_eq!(h.next_state().await, ServiceState::Running);

    h.send(ControlRequest::Stop);
    assert!(matches!(h.exit().await, LoopExit::Stopped { .. }));
}
