//! Per-file font registration.
//!
//! # Responsibilities
//! - Skip directories (some platforms report new folders as plain creations)
//! - Give a freshly created file time to be written out
//! - Call the platform font API exactly once
//! - Log the outcome (no retry, no backoff)
//!
//! # Design Decisions
//! - `Fixed` settling is a heuristic: nothing checks the writer has closed the file
//! - `Stable` settling waits for the size to stop changing, bounded by `max_wait`
//! - The call is attempted once whichever way settling ends

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::{SettleConfig, SettleStrategy};
use crate::fonts::platform::FontApi;
use crate::observability::{metrics, EventCode, EventLog};

/// How long to wait before registering a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep for a fixed grace period.
    Fixed(Duration),
    /// Wait until the size is unchanged across one `poll`, at most `max_wait`.
    Stable { poll: Duration, max_wait: Duration },
}

impl SettlePolicy {
    pub fn from_config(config: &SettleConfig) -> Self {
        match config.strategy {
            SettleStrategy::Fixed => SettlePolicy::Fixed(Duration::from_millis(config.grace_ms)),
            SettleStrategy::Stable => SettlePolicy::Stable {
                poll: Duration::from_millis(config.stable_poll_ms),
                max_wait: Duration::from_millis(config.stable_max_wait_ms),
            },
        }
    }

    async fn wait(&self, path: &Path) {
        match *self {
            SettlePolicy::Fixed(grace) => sleep(grace).await,
            SettlePolicy::Stable { poll, max_wait } => {
                let deadline = Instant::now() + max_wait;
                let mut last = file_len(path).await;
                loop {
                    sleep(poll).await;
                    let current = file_len(path).await;
                    if current.is_some() && current == last {
                        return;
                    }
                    if Instant::now() >= deadline {
                        tracing::debug!(
                            path = %path.display(),
                            "File still changing, registering anyway"
                        );
                        return;
                    }
                    last = current;
                }
            }
        }
    }
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy::Fixed(Duration::from_millis(100))
    }
}

async fn file_len(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}

async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Result of one registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The API accepted the file; collections may add several fonts.
    Added { fonts: u32 },
    /// The API returned a non-positive code.
    Failed { code: i32 },
    /// The path is a directory; the API was not called.
    Skipped,
}

impl RegistrationOutcome {
    pub fn from_code(code: i32) -> Self {
        match u32::try_from(code) {
            Ok(fonts) if fonts > 0 => RegistrationOutcome::Added { fonts },
            _ => RegistrationOutcome::Failed { code },
        }
    }
}

/// Registers individual font files with the platform.
#[derive(Clone)]
pub struct FontRegistrar {
    api: Arc<dyn FontApi>,
    settle: SettlePolicy,
    log: EventLog,
}

impl FontRegistrar {
    pub fn new(api: Arc<dyn FontApi>, settle: SettlePolicy, log: EventLog) -> Self {
        Self { api, settle, log }
    }

    /// Settle, then make exactly one registration call for `path`.
    pub async fn register(&self, path: &Path) -> RegistrationOutcome {
        if is_directory(path).await {
            tracing::debug!(path = %path.display(), "Skipping directory");
            metrics::record_registration(&RegistrationOutcome::Skipped);
            return RegistrationOutcome::Skipped;
        }

        tracing::debug!(path = %path.display(), "Adding file to user font space");
        self.settle.wait(path).await;

        let code = self.api.add_font_resource(path);
        let outcome = RegistrationOutcome::from_code(code);
        metrics::record_registration(&outcome);

        match outcome {
            RegistrationOutcome::Added { fonts } => self.log.info(
                EventCode::FontAdded,
                format!("added {} to user font space ({} font(s))", path.display(), fonts),
            ),
            RegistrationOutcome::Failed { code } => self.log.warning(
                EventCode::FontRejected,
                format!("font registration returned {} for {}", code, path.display()),
            ),
            RegistrationOutcome::Skipped => {}
        }
        outcome
    }
}

impl fmt::Debug for FontRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistrar")
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}
