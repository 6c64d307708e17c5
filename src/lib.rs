// src/lib.rs

//! Drive HashiCorp Packer as a subprocess, stream its machine-readable
//! output to a receiver while it runs, and skip invocations entirely when
//! the input directory has not changed since the last run.
//!
//! The crate has two engines and a thin layer of glue:
//!
//! - [`exec`]: the subprocess engine — spawning, concurrent protocol
//!   draining ([`proto`]), abort and timeout semantics.
//! - [`fingerprint`]: the change-detection engine — content hashes of a
//!   directory tree, persisted to a marker file and compared across runs.
//! - [`gate`] combines the two into the skip-or-run decision, and
//!   [`packer`] assembles `build` command lines.
//!
//! The embedding application supplies a [`Terminal`]: it receives every
//! decoded [`Message`] in order and may abort the execution from inside the
//! callback. Waiting on an [`Execution`] never reports an outcome before
//! all buffered output has been delivered.

pub mod errors;
pub mod exec;
pub mod fingerprint;
pub mod gate;
pub mod packer;
pub mod proto;

pub use errors::{AbortCause, PackgateError, Result, TerminalError};
pub use exec::{AbortHandle, Execution, Executor, Terminal};
pub use fingerprint::{DigestAlgorithm, Fingerprint, FingerprintEntry};
pub use gate::ChangeGate;
pub use packer::{BuildOptions, Packer};
pub use proto::Message;
