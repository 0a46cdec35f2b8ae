// file: src/network/remote.rs
// version: 1.0.0
// guid: d0e1f2a3-b4c5-6789-0123-456789defabc

//! Remote host abstraction
//!
//! The orchestrator drives a deployment through these traits rather than a
//! concrete SSH client, so the pipeline can be exercised in tests with a
//! recording double.

use crate::config::TargetHost;
use crate::Result;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress callback invoked with (bytes sent, total bytes)
pub type ProgressFn<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Cooperative cancellation flag shared between the Ctrl-C handler and the
/// blocking deployment pipeline.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` if cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(crate::error::DeployError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A local file, its remote destination, and an optional progress callback.
/// Immutable once constructed.
pub struct TransferUnit<'a> {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub progress: Option<ProgressFn<'a>>,
}

impl<'a> TransferUnit<'a> {
    /// Create a transfer unit without progress reporting
    pub fn new(local_path: impl Into<PathBuf>, remote_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            progress: None,
        }
    }

    /// Create a transfer unit with a progress callback
    pub fn with_progress(
        local_path: impl Into<PathBuf>,
        remote_path: impl Into<String>,
        progress: ProgressFn<'a>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            progress: Some(progress),
        }
    }
}

impl fmt::Debug for TransferUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferUnit")
            .field("local_path", &self.local_path)
            .field("remote_path", &self.remote_path)
            .field("progress", &self.progress.map(|_| "..."))
            .finish()
    }
}

/// Exit status and full captured output of one remote script invocation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub output: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// One authenticated session on the target host.
///
/// Exactly one script execution happens per session, and no operation may be
/// invoked after `close`. `close` must be idempotent.
pub trait RemoteHost {
    /// Copy a local file to the remote path, reporting progress if the unit
    /// carries a callback
    fn upload(&mut self, unit: &TransferUnit<'_>) -> Result<()>;

    /// `chmod +x` the remote path
    fn set_executable(&mut self, remote_path: &str) -> Result<()>;

    /// Run the install script with the rendered parameter payload on its
    /// stdin, invoking `on_line` for every line of combined output as it
    /// arrives
    fn run_script(
        &mut self,
        remote_path: &str,
        stdin_payload: &str,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ExecutionResult>;

    /// Tear the session down; safe to call more than once
    fn close(&mut self);
}

/// Session factory, the seam that lets tests verify `connect` was or was not
/// attempted.
pub trait Connect {
    type Host: RemoteHost;

    fn connect(&self, target: &TargetHost) -> Result<Self::Host>;
}
