//! Shared fakes and harness for control loop integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use fontwatch::fonts::{FontApi, FontDirectory, FontRegistrar, RegistrationTracker, SettlePolicy};
use fontwatch::lifecycle::{ControlRequest, ServiceState, ServiceStatus};
use fontwatch::observability::{EventLog, MemorySink};
use fontwatch::service::{LoopExit, ServiceControlLoop};
use fontwatch::watcher::{RawNotice, RawSender, WatchBackend, WatchError};

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

/// Font API that records every call and returns a fixed code.
pub struct RecordingFontApi {
    code: i32,
    calls: Mutex<Vec<PathBuf>>,
}

impl RecordingFontApi {
    pub fn new(code: i32) -> Arc<Self> {
        Arc::new(Self {
            code,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl FontApi for RecordingFontApi {
    fn add_font_resource(&self, path: &Path) -> i32 {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.code
    }
}

/// In-memory watch backend; the raw sender is handed back to the test.
pub struct FakeBackend {
    _raw: RawSender,
    fail_watch: bool,
}

impl WatchBackend for FakeBackend {
    fn watch(&mut self, _dir: &Path) -> Result<(), WatchError> {
        if self.fail_watch {
            return Err(WatchError::Unavailable("directory not watchable".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum BackendMode {
    Working,
    WatchFails,
    Unavailable,
}

pub struct Options {
    pub tick: Duration,
    pub grace: Duration,
    pub backend: BackendMode,
    pub api_code: i32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            grace: Duration::from_millis(20),
            backend: BackendMode::Working,
            api_code: 1,
        }
    }
}

pub struct Harness {
    pub requests: mpsc::UnboundedSender<ControlRequest>,
    pub statuses: mpsc::UnboundedReceiver<ServiceStatus>,
    pub api: Arc<RecordingFontApi>,
    pub sink: Arc<MemorySink>,
    pub raw: Arc<Mutex<Option<RawSender>>>,
    pub tracker: RegistrationTracker,
    pub handle: JoinHandle<LoopExit>,
}

/// Spawn a control loop over `font_dir` with fakes for every collaborator.
pub fn start(font_dir: &Path, options: Options) -> Harness {
    let api = RecordingFontApi::new(options.api_code);
    let sink = Arc::new(MemorySink::new());
    let log = EventLog::new(sink.clone());
    let registrar = FontRegistrar::new(
        api.clone(),
        SettlePolicy::Fixed(options.grace),
        log.clone(),
    );

    let raw = Arc::new(Mutex::new(None));
    let slot = raw.clone();
    let mode = options.backend;
    let build = move |sender: RawSender| -> Result<FakeBackend, WatchError> {
        if let BackendMode::Unavailable = mode {
            return Err(WatchError::Unavailable("no change notifications".into()));
        }
        *slot.lock().unwrap() = Some(sender.clone());
        Ok(FakeBackend {
            _raw: sender,
            fail_watch: matches!(mode, BackendMode::WatchFails),
        })
    };

    let service = ServiceControlLoop::new(
        FontDirectory::new(font_dir),
        options.tick,
        registrar,
        log,
        build,
    );
    let tracker = service.tracker();

    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(service.run(request_rx, status_tx));

    Harness {
        requests: request_tx,
        statuses: status_rx,
        api,
        sink,
        raw,
        tracker,
        handle,
    }
}

impl Harness {
    /// Next reported status.
    pub async fn next_status(&mut self) -> ServiceStatus {
        tokio::time::timeout(WAIT, self.statuses.recv())
            .await
            .expect("timed out waiting for a status report")
            .expect("status channel closed")
    }

    pub async fn next_state(&mut self) -> ServiceState {
        self.next_status().await.state
    }

    /// Consume StartPending and Running.
    pub async fn wait_running(&mut self) {
        assert_eq!(self.next_state().await, ServiceState::StartPending);
        assert_eq!(self.next_state().await, ServiceState::Running);
    }

    /// All remaining status reports until the channel closes.
    pub async fn remaining_states(&mut self) -> Vec<ServiceState> {
        let mut states = Vec::new();
        while let Ok(Some(status)) = tokio::time::timeout(WAIT, self.statuses.recv()).await {
            states.push(status.state);
        }
        states
    }

    /// Push a notice as if the platform watcher produced it.
    pub fn inject(&self, notice: RawNotice) {
        let guard = self.raw.lock().unwrap();
        let sender = guard.as_ref().expect("backend was not built");
        sender.send(notice).expect("watcher pump is gone");
    }

    pub fn raw_closed(&self) -> bool {
        self.raw
            .lock()
            .unwrap()
            .as_ref()
            .map(|sender| sender.is_closed())
            .unwrap_or(true)
    }

    pub fn send(&self, request: ControlRequest) {
        self.requests.send(request).expect("control loop is gone");
    }

    /// Wait until the font API has been called at least `n` times.
    pub async fn wait_for_calls(&self, n: usize) -> Vec<PathBuf> {
        let deadline = tokio::time::Instant::now() + WAIT;
        loop {
            let calls = self.api.calls();
            if calls.len() >= n || tokio::time::Instant::now() >= deadline {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub async fn exit(self) -> LoopExit {
        tokio::time::timeout(WAIT, self.handle)
            .await
            .expect("control loop did not exit")
            .expect("control loop panicked")
    }
}
