//! Subprocess supervision against real shell scripts.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};
use tempfile::TempDir;
use wavetuner_hardware::ScriptRunner;
use wavetuner_traits::{GenEvent, Waveform};

const EVENT_WAIT: Duration = Duration::from_secs(5);

fn write_script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("gen.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("stat").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path
}

fn wait_for<F>(rx: &Receiver<GenEvent>, mut matches: F) -> GenEvent
where
    F: FnMut(&GenEvent) -> bool,
{
    let deadline = Instant::now() + EVENT_WAIT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(event) if matches(&event) => return event,
            Ok(_) => {}
            Err(e) => panic!("expected event never arrived: {e}"),
        }
    }
}

#[test]
fn streams_stdout_and_stops_gracefully() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "echo 'Press Enter to quit'; sleep 30");
    let (tx, rx) = unbounded();
    let mut runner = ScriptRunner::new(script, tx);

    runner.start();
    wait_for(&rx, |e| matches!(e, GenEvent::Started));
    wait_for(&rx, |e| {
        matches!(e, GenEvent::StdoutChunk(s) if s.contains("Press Enter to quit"))
    });
    assert!(runner.is_running());

    let t0 = Instant::now();
    runner.stop();
    wait_for(&rx, |e| matches!(e, GenEvent::Stopped));
    assert!(!runner.is_running());
    // sh exits on SIGTERM, well inside the 500 ms grace window.
    assert!(t0.elapsed() < Duration::from_secs(2));
}

#[test]
fn natural_exit_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "echo done");
    let (tx, rx) = unbounded();
    let mut runner = ScriptRunner::new(script, tx);

    runner.start();
    let event = wait_for(&rx, |e| matches!(e, GenEvent::Exited { .. }));
    match event {
        GenEvent::Exited { code, .. } => assert_eq!(code, Some(0)),
        _ => unreachable!(),
    }
}

#[test]
fn marker_burst_trips_runaway_and_stops_the_child() {
    let dir = tempfile::tempdir().expect("tempdir");
    // 16 'U's in one write, far faster than the 500 ms window.
    let script = write_script(&dir, "printf 'UUUUUUUUUUUUUUUU'; sleep 30");
    let (tx, rx) = unbounded();
    let mut runner = ScriptRunner::new(script, tx);

    runner.start();
    let event = wait_for(&rx, |e| matches!(e, GenEvent::ThresholdExceeded { .. }));
    match event {
        GenEvent::ThresholdExceeded { marker, window_ms } => {
            assert_eq!(marker, 'U');
            assert!(window_ms < 500);
        }
        _ => unreachable!(),
    }
    wait_for(&rx, |e| matches!(e, GenEvent::Stopped));
    assert!(!runner.is_running());
}

#[test]
fn start_is_idempotent_while_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "sleep 30");
    let (tx, rx) = unbounded();
    let mut runner = ScriptRunner::new(script, tx);

    runner.start();
    wait_for(&rx, |e| matches!(e, GenEvent::Started));
    runner.start(); // no-op: a child is already alive
    runner.stop();
    wait_for(&rx, |e| matches!(e, GenEvent::Stopped));

    // Exactly one Started was ever emitted.
    let extra_started = rx
        .try_iter()
        .filter(|e| matches!(e, GenEvent::Started))
        .count();
    assert_eq!(extra_started, 0);
}

#[test]
fn stop_without_a_child_is_silent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "true");
    let (tx, rx) = unbounded();
    let mut runner = ScriptRunner::new(script, tx);

    runner.stop();
    assert!(rx.try_recv().is_err(), "no event expected");
}

#[test]
fn spawn_failure_is_a_warning_not_a_crash() {
    let (tx, rx) = unbounded();
    let mut runner = ScriptRunner::new("/nonexistent/gen.sh", tx);
    runner.start();
    assert!(rx.try_recv().is_err(), "no event expected on spawn failure");
    assert!(!runner.is_running());
}
