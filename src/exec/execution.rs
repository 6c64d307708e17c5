// src/exec/execution.rs

//! Handle for one running tool subprocess.

use std::process::ExitStatus;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tempfile::TempPath;
use tokio::process::Child;
use tokio::time::timeout;
use tracing::debug;

use crate::errors::{AbortCause, PackgateError, Result};
use crate::exec::terminal::{Gate, TerminalTask};

/// Abort bookkeeping shared between the execution handle, its terminal task
/// and any [`AbortHandle`] clones.
///
/// The cause cell is write-once: the first abort wins and later causes are
/// discarded, though every abort still requests the kill.
#[derive(Debug, Clone)]
pub(crate) struct AbortState {
    cause: Arc<OnceLock<AbortCause>>,
    kill: Gate,
}

impl AbortState {
    pub(crate) fn new() -> Self {
        Self {
            cause: Arc::new(OnceLock::new()),
            kill: Gate::new(),
        }
    }

    pub(crate) fn abort(&self, cause: AbortCause) {
        let _ = self.cause.set(cause);
        self.kill.open();
    }

    pub(crate) fn cause(&self) -> Option<AbortCause> {
        self.cause.get().cloned()
    }

    pub(crate) async fn kill_requested(&self) {
        self.kill.wait().await;
    }
}

/// Cloneable handle for aborting an execution from another task or thread,
/// e.g. a Ctrl-C handler, while the owner is blocked in
/// [`Execution::success`].
#[derive(Debug, Clone)]
pub struct AbortHandle {
    state: AbortState,
}

impl AbortHandle {
    /// Record `cause` (first abort wins) and request the subprocess be
    /// killed. Never blocks.
    pub fn abort(&self, cause: AbortCause) {
        self.state.abort(cause);
    }
}

/// An already-running tool command.
///
/// Owns the subprocess, the terminal task draining its stdout and the file
/// capturing its stderr. The handle stays alive until the process has
/// exited *and* the terminal task has delivered all buffered output; the
/// wait operations never report an outcome before the last message reached
/// the terminal.
///
/// Dropping the handle without waiting kills the subprocess and discards
/// the stderr capture. Cancelling a `success` future leaves the subprocess
/// running; it is the caller's choice whether to abort in that case.
#[derive(Debug)]
pub struct Execution {
    child: Child,
    terminal_task: TerminalTask,
    abort: AbortState,
    error_file: TempPath,
}

impl Execution {
    pub(crate) fn new(
        child: Child,
        terminal_task: TerminalTask,
        abort: AbortState,
        error_file: TempPath,
    ) -> Self {
        Self {
            child,
            terminal_task,
            abort,
            error_file,
        }
    }

    /// Handle for aborting this execution from elsewhere.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            state: self.abort.clone(),
        }
    }

    /// Abort this execution, causing the wait operations to report `cause`
    /// instead of the process's natural exit.
    pub fn abort(&self, cause: AbortCause) {
        self.abort.abort(cause);
    }

    /// Wait for this execution to terminate successfully.
    ///
    /// Waits until the drain loop is running, then for process exit, then
    /// for the terminal task to finish delivering buffered output. A
    /// recorded abort cause takes priority over the exit code; a non-zero
    /// exit surfaces [`PackgateError::ExecutionFailed`] carrying the
    /// persisted stderr file.
    pub async fn success(mut self) -> Result<()> {
        self.terminal_task.running().await;
        let status = wait_exit(&mut self.child, &self.abort).await?;
        self.terminal_task.terminated().await;
        self.outcome(status)
    }

    /// Like [`success`](Self::success), but with a bounded process-exit wait.
    ///
    /// On timeout the subprocess is killed and the terminal task is still
    /// awaited, so the total wait is bounded by `limit` plus drain time. A
    /// cause recorded before the deadline elapsed is reported in preference
    /// to [`PackgateError::Timeout`].
    pub async fn success_timeout(mut self, limit: Duration) -> Result<()> {
        self.terminal_task.running().await;
        match timeout(limit, wait_exit(&mut self.child, &self.abort)).await {
            Ok(status) => {
                let status = status?;
                self.terminal_task.terminated().await;
                self.outcome(status)
            }
            Err(_elapsed) => {
                debug!("process-exit wait timed out; killing subprocess");
                let _ = self.child.start_kill();
                let _ = self.child.wait().await;
                self.terminal_task.terminated().await;
                match self.abort.cause() {
                    Some(cause) => Err(PackgateError::Aborted(cause)),
                    None => Err(PackgateError::Timeout),
                }
            }
        }
    }

    fn outcome(self, status: ExitStatus) -> Result<()> {
        if let Some(cause) = self.abort.cause() {
            return Err(PackgateError::Aborted(cause));
        }
        if !status.success() {
            // Persist the capture file so the caller can inspect it after
            // this handle is gone.
            let error_file = self.error_file.keep().map_err(|e| e.error)?;
            return Err(PackgateError::ExecutionFailed {
                status: status.code().unwrap_or(-1),
                error_file,
            });
        }
        Ok(())
    }
}

/// Wait for the child to exit, killing it as soon as an abort requests so.
async fn wait_exit(child: &mut Child, abort: &AbortState) -> std::io::Result<ExitStatus> {
    tokio::select! {
        status = child.wait() => status,
        _ = abort.kill_requested() => {
            // The kill may race with a natural exit; wait() reaps either way.
            let _ = child.start_kill();
            child.wait().await
        }
    }
}
