// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackgateError {
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("execution aborted: {0}")]
    Aborted(AbortCause),

    /// The tool exited with a non-zero status. `error_file` holds the
    /// captured stderr output and survives this error being dropped.
    #[error("execution failed with status {status}; error output at {}", error_file.display())]
    ExecutionFailed { status: i32, error_file: PathBuf },

    #[error("timed out waiting for the tool to exit")]
    Timeout,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PackgateError>;

/// Reason an execution was aborted.
///
/// Recorded write-once on the execution handle: the first abort wins, later
/// causes are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct AbortCause {
    reason: String,
}

impl AbortCause {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Default for AbortCause {
    fn default() -> Self {
        Self::new("execution aborted")
    }
}

/// Error returned by [`Terminal::receive`](crate::exec::Terminal::receive).
///
/// `Abort` is expected control flow and stops the execution with the given
/// cause. Anything else is treated as a fault of the receiver itself: the
/// message is dropped and draining continues.
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("abort requested: {0}")]
    Abort(AbortCause),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
