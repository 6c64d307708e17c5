use std::error::Error;
use std::fs;
use std::path::PathBuf;

use packgate::errors::{AbortCause, PackgateError};
use packgate::fingerprint::DigestAlgorithm;
use packgate::gate::{ChangeGate, MARKER_FILE_NAME};
use packgate_test_utils::init_tracing;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

fn failed() -> packgate::Result<()> {
    Err(PackgateError::ExecutionFailed {
        status: 2,
        error_file: PathBuf::from("/tmp/err"),
    })
}

fn aborted() -> packgate::Result<()> {
    Err(PackgateError::Aborted(AbortCause::default()))
}

#[test]
fn first_decision_stores_the_marker_and_runs() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("template.json"), b"{}")?;
    let gate = ChangeGate::new(dir.path());

    assert!(gate.should_run()?);
    assert!(gate.marker_path().exists());
    // Unchanged input: the next decision skips.
    assert!(!gate.should_run()?);
    Ok(())
}

#[test]
fn content_change_reopens_the_gate() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("template.json"), b"{}")?;
    let gate = ChangeGate::new(dir.path());

    assert!(gate.should_run()?);
    fs::write(dir.path().join("template.json"), b"{\"changed\":true}")?;
    assert!(gate.should_run()?);
    assert!(!gate.should_run()?);
    Ok(())
}

#[test]
fn the_marker_itself_is_not_fingerprinted() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path());

    // The first run writes the marker into the input directory. If it were
    // fingerprinted, the second decision would always see a change.
    assert!(gate.should_run()?);
    assert!(dir.path().join(MARKER_FILE_NAME).exists());
    assert!(!gate.should_run()?);
    Ok(())
}

#[test]
fn changes_needed_false_runs_even_without_changes() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path()).changes_needed(false);

    assert!(gate.should_run()?);
    assert!(gate.should_run()?);
    Ok(())
}

#[test]
fn failure_invalidates_the_marker_by_default() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path());

    assert!(gate.should_run()?);
    gate.observe(&failed());
    assert!(!gate.marker_path().exists());
    assert!(gate.should_run()?);
    Ok(())
}

#[test]
fn failure_keeps_the_marker_when_configured() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path()).invalidate_on_failure(false);

    assert!(gate.should_run()?);
    gate.observe(&failed());
    assert!(gate.marker_path().exists());
    assert!(!gate.should_run()?);
    Ok(())
}

#[test]
fn abort_always_invalidates() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path()).invalidate_on_failure(false);

    assert!(gate.should_run()?);
    gate.observe(&aborted());
    assert!(!gate.marker_path().exists());
    assert!(gate.should_run()?);
    Ok(())
}

#[test]
fn success_keeps_the_marker() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path());

    assert!(gate.should_run()?);
    gate.observe(&Ok(()));
    assert!(gate.marker_path().exists());
    assert!(!gate.should_run()?);
    Ok(())
}

#[test]
fn invalidate_is_idempotent() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let gate = ChangeGate::new(dir.path());
    gate.invalidate();
    gate.invalidate();
    Ok(())
}

#[test]
fn gate_works_with_a_non_default_algorithm() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("input.txt"), b"data")?;
    let gate = ChangeGate::new(dir.path()).with_algorithm(DigestAlgorithm::Blake3);

    assert!(gate.should_run()?);
    assert!(!gate.should_run()?);
    fs::write(dir.path().join("input.txt"), b"changed")?;
    assert!(gate.should_run()?);
    Ok(())
}
