// src/gate.rs

//! Change gate: skips tool invocations when the input directory is
//! unchanged since the last run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::{PackgateError, Result};
use crate::fingerprint::{DigestAlgorithm, Fingerprint};

/// Marker file kept inside the input directory, always excluded from the
/// fingerprint itself.
pub const MARKER_FILE_NAME: &str = ".fingerprint";

/// Decides whether an invocation is necessary by fingerprinting the tool's
/// input directory against the marker stored by the previous run, and
/// invalidates that marker when a run goes wrong.
#[derive(Debug, Clone)]
pub struct ChangeGate {
    input_dir: PathBuf,
    algorithm: DigestAlgorithm,
    changes_needed: bool,
    invalidate_on_failure: bool,
}

impl ChangeGate {
    /// Gate for `input_dir` with the default algorithm; changes are needed
    /// to run, and failures invalidate the marker.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            algorithm: DigestAlgorithm::default(),
            changes_needed: true,
            invalidate_on_failure: true,
        }
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// When false, [`should_run`](Self::should_run) returns true even for an
    /// unchanged input directory (the marker is still refreshed on change).
    pub fn changes_needed(mut self, value: bool) -> Self {
        self.changes_needed = value;
        self
    }

    /// When false, execution failures leave the marker in place so the next
    /// decision still counts the last run as done.
    pub fn invalidate_on_failure(mut self, value: bool) -> Self {
        self.invalidate_on_failure = value;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn marker_path(&self) -> PathBuf {
        self.input_dir.join(MARKER_FILE_NAME)
    }

    /// Decide whether the tool must actually run.
    ///
    /// Computes a fresh fingerprint of the input directory; on a mismatch
    /// with the stored marker the fingerprint is persisted and the run goes
    /// ahead. On a match the run is skippable, unless the gate was built
    /// with [`changes_needed(false)`](Self::changes_needed).
    pub fn should_run(&self) -> Result<bool> {
        let marker = self.marker_path();
        let fingerprint =
            Fingerprint::generate(self.algorithm, &self.input_dir, |path| {
                path == MARKER_FILE_NAME
            })?;
        if !fingerprint.matches(&marker)? {
            fingerprint.store(&marker)?;
            return Ok(true);
        }
        if self.changes_needed {
            info!(input_dir = ?self.input_dir, "input directory unchanged; skipping");
            return Ok(false);
        }
        Ok(true)
    }

    /// Forget the stored fingerprint so the next decision runs again.
    /// Best-effort; a missing marker is fine.
    pub fn invalidate(&self) {
        match fs::remove_file(self.marker_path()) {
            Ok(()) => debug!(input_dir = ?self.input_dir, "fingerprint marker removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "failed to remove fingerprint marker"),
        }
    }

    /// Apply an execution outcome to the marker: aborts always invalidate,
    /// failures only when the gate is configured to invalidate on failure.
    pub fn observe(&self, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {}
            Err(PackgateError::Aborted(_)) => self.invalidate(),
            Err(_) if self.invalidate_on_failure => self.invalidate(),
            Err(_) => {}
        }
    }
}
