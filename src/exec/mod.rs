// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns the subprocess lifecycle: spawning the tool with its
//! streams wired up, draining its machine-readable output concurrently, and
//! waiting for completion with abort and timeout semantics.
//!
//! - [`executor`] builds the subprocess and starts the drain task.
//! - [`execution`] is the handle the caller waits on.
//! - [`terminal`] holds the [`Terminal`] receiver trait and the drain loop.
//!
//! Two logical threads of control exist per execution: the caller, blocked
//! in [`Execution::success`], and the terminal task draining stdout. They
//! share only the write-once abort cell and two one-shot gates; "process
//! has exited" is deliberately decoupled from "all output was delivered",
//! and the wait operations only report an outcome after both.

pub mod execution;
pub mod executor;
pub mod terminal;

pub use execution::{AbortHandle, Execution};
pub use executor::{Executor, MACHINE_READABLE_FLAG};
pub use terminal::Terminal;
