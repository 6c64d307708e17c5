// src/exec/terminal.rs

//! Terminal side of an execution: the receiver callback and the concurrent
//! drain loop that feeds it.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStdout;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::errors::TerminalError;
use crate::exec::execution::AbortState;
use crate::proto::{parse_line, Message};

/// Receiver for decoded protocol messages.
///
/// Implemented by the embedding application (log sinks, progress UIs).
/// Messages arrive synchronously, one at a time, in stream order, from the
/// drain task that owns the subprocess's stdout pipe.
pub trait Terminal: Send + Sync {
    /// Working directory for tool commands, or `None` to inherit the
    /// caller's.
    fn working_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Called once per decoded message.
    ///
    /// Returning [`TerminalError::Abort`] kills the running execution and
    /// surfaces the cause from its wait operations. Any other error is
    /// logged, the message is dropped and draining continues.
    fn receive(&self, message: Message) -> Result<(), TerminalError>;
}

/// One-shot gate: opened at most once, observed by any number of waiters,
/// and stays open for waiters that arrive later.
#[derive(Debug, Clone)]
pub(crate) struct Gate {
    tx: Arc<watch::Sender<bool>>,
}

impl Gate {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn open(&self) {
        self.tx.send_replace(true);
    }

    pub(crate) async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close under us.
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// Concurrent reader of the subprocess's stdout stream.
///
/// Spawned before the execution handle is returned to the caller, so the
/// pipe is drained from the start and the subprocess can never block on a
/// full stdout buffer.
#[derive(Debug)]
pub(crate) struct TerminalTask {
    running: Gate,
    terminated: Gate,
}

impl TerminalTask {
    pub(crate) fn spawn(
        terminal: Arc<dyn Terminal>,
        abort: AbortState,
        stdout: ChildStdout,
    ) -> Self {
        let running = Gate::new();
        let terminated = Gate::new();
        tokio::spawn(drain(
            terminal,
            abort,
            stdout,
            running.clone(),
            terminated.clone(),
        ));
        Self {
            running,
            terminated,
        }
    }

    /// Satisfied once the drain loop has begun consuming output.
    pub(crate) async fn running(&self) {
        self.running.wait().await;
    }

    /// Satisfied once the drain loop has exited; no receiver callback fires
    /// afterwards.
    pub(crate) async fn terminated(&self) {
        self.terminated.wait().await;
    }
}

async fn drain(
    terminal: Arc<dyn Terminal>,
    abort: AbortState,
    stdout: ChildStdout,
    running: Gate,
    terminated: Gate,
) {
    running.open();
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(message) = parse_line(&line) else {
                    debug!(line = %line, "skipping malformed protocol line");
                    continue;
                };
                match terminal.receive(message) {
                    Ok(()) => {}
                    Err(TerminalError::Abort(cause)) => {
                        debug!(cause = %cause, "terminal requested abort");
                        // Keep draining after the abort so the subprocess is
                        // not starved while it shuts down.
                        abort.abort(cause);
                    }
                    Err(TerminalError::Other(err)) => {
                        warn!(error = %err, "terminal receiver failed; message dropped");
                    }
                }
            }
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err, "stdout stream closed");
                break;
            }
        }
    }
    terminated.open();
}
