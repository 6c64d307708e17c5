// src/exec/executor.rs

//! Subprocess construction and wiring.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::Context;
use tokio::process::Command;
use tracing::info;

use crate::errors::Result;
use crate::exec::execution::{AbortState, Execution};
use crate::exec::terminal::{Terminal, TerminalTask};

/// Flag that switches the tool's output to the machine-readable protocol.
pub const MACHINE_READABLE_FLAG: &str = "-machine-readable";

/// Builds and starts tool subprocesses.
///
/// Each [`execute`](Executor::execute) call spawns
/// `<program> -machine-readable <command> <args...>` with stdin and stdout
/// as pipes and stderr redirected to a private temporary file, and starts
/// the terminal task against stdout before handing the execution back.
/// Concurrent executions are independent.
pub struct Executor {
    program: String,
    terminal: Arc<dyn Terminal>,
}

impl Executor {
    pub fn new(program: impl Into<String>, terminal: Arc<dyn Terminal>) -> Self {
        Self {
            program: program.into(),
            terminal,
        }
    }

    /// Start `command` with the given arguments and return its handle,
    /// already running.
    pub fn execute(&self, command: &str, args: &[String]) -> Result<Execution> {
        let error_file = tempfile::Builder::new()
            .prefix("packgate-")
            .suffix(".err")
            .tempfile()
            .context("creating stderr capture file")?;
        let stderr = error_file.reopen().context("reopening stderr capture file")?;

        let mut cmd = Command::new(&self.program);
        cmd.arg(MACHINE_READABLE_FLAG)
            .arg(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);
        if let Some(dir) = self.terminal.working_dir() {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning {} {}", self.program, command))?;
        info!(program = %self.program, command = %command, "tool process started");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout was not captured"))?;
        let abort = AbortState::new();
        let terminal_task = TerminalTask::spawn(Arc::clone(&self.terminal), abort.clone(), stdout);
        Ok(Execution::new(
            child,
            terminal_task,
            abort,
            error_file.into_temp_path(),
        ))
    }
}
