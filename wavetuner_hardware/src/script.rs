//! Generator subprocess supervision.
//!
//! The waveform-generator script is executed directly (it carries its own
//! interpreter directive) with stdout piped. A reader thread streams stdout
//! chunks onto the event channel and feeds the runaway detector
//! character-by-character; termination is graceful first, forced after
//! 500 ms.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::{debug, warn};
use wavetuner_traits::clock::{Clock, MonotonicClock};
use wavetuner_traits::{ExitReason, GenEvent, Waveform};

use crate::runaway::MarkerWindow;

/// Grace period between SIGTERM and a forced kill.
const STOP_GRACE_MS: u64 = 500;
const STOP_POLL_MS: u64 = 10;

/// Owns at most one generator child process at a time.
pub struct ScriptRunner {
    script: PathBuf,
    child: Arc<Mutex<Option<Child>>>,
    events: Sender<GenEvent>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl ScriptRunner {
    pub fn new(script: impl Into<PathBuf>, events: Sender<GenEvent>) -> Self {
        Self::with_clock(script, events, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(
        script: impl Into<PathBuf>,
        events: Sender<GenEvent>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            script: script.into(),
            child: Arc::new(Mutex::new(None)),
            events,
            clock,
        }
    }

    fn spawn_reader(&self, stdout: ChildStdout) {
        let events = self.events.clone();
        let child = Arc::clone(&self.child);
        let clock = Arc::clone(&self.clock);
        thread::spawn(move || read_stdout(stdout, events, child, clock));
    }
}

impl Waveform for ScriptRunner {
    fn start(&mut self) {
        let Ok(mut guard) = self.child.lock() else {
            return;
        };
        let alive = guard
            .as_mut()
            .is_some_and(|proc| matches!(proc.try_wait(), Ok(None)));
        if alive {
            return;
        }
        // An exited-but-unobserved child is replaced.
        *guard = None;
        match Command::new(&self.script)
            .stdout(Stdio::piped())
            .stdin(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(mut proc) => {
                let stdout = proc.stdout.take();
                *guard = Some(proc);
                drop(guard);
                debug!(script = %self.script.display(), "generator script started");
                // Started goes out before the reader can race it with output.
                let _ = self.events.send(GenEvent::Started);
                if let Some(out) = stdout {
                    self.spawn_reader(out);
                }
            }
            Err(e) => {
                warn!(script = %self.script.display(), error = %e, "failed to start generator script");
            }
        }
    }

    fn stop(&mut self) {
        stop_child(&self.child, &self.events, &*self.clock);
    }

    fn is_running(&self) -> bool {
        let Ok(mut guard) = self.child.lock() else {
            return false;
        };
        matches!(guard.as_mut().map(Child::try_wait), Some(Ok(None)))
    }
}

impl Drop for ScriptRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Terminate the child if one is alive: graceful signal, then a forced kill
/// after [`STOP_GRACE_MS`]. Emits `Stopped` after either outcome.
fn stop_child(child: &Mutex<Option<Child>>, events: &Sender<GenEvent>, clock: &dyn Clock) {
    let taken = match child.lock() {
        Ok(mut guard) => guard.take(),
        Err(_) => None,
    };
    let Some(mut proc) = taken else {
        return;
    };

    terminate(&proc);
    let epoch = clock.now();
    loop {
        match proc.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if clock.ms_since(epoch) >= STOP_GRACE_MS {
                    let _ = proc.kill();
                    let _ = proc.wait();
                    break;
                }
                clock.sleep(Duration::from_millis(STOP_POLL_MS));
            }
            Err(_) => break,
        }
    }
    debug!("generator script stopped");
    let _ = events.send(GenEvent::Stopped);
}

#[cfg(unix)]
fn terminate(proc: &Child) {
    // SAFETY: signalling our own child by pid; a stale pid is harmless here
    // because we only reach this with the child un-reaped.
    unsafe {
        libc::kill(proc.id() as libc::pid_t, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn terminate(_proc: &Child) {}

fn read_stdout(
    mut stdout: ChildStdout,
    events: Sender<GenEvent>,
    child: Arc<Mutex<Option<Child>>>,
    clock: Arc<dyn Clock + Send + Sync>,
) {
    let epoch = clock.now();
    let mut windows = [MarkerWindow::new('U'), MarkerWindow::new('N')];
    let mut buf = [0u8; 4096];

    loop {
        match stdout.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                let _ = events.send(GenEvent::StdoutChunk(chunk.clone()));
                let now = clock.ms_since(epoch);
                for c in chunk.chars() {
                    for window in &mut windows {
                        if let Some(span) = window.observe(c, now) {
                            warn!(
                                marker = %window.marker(),
                                window_ms = span,
                                "runaway marker burst; stopping generator"
                            );
                            let _ = events.send(GenEvent::ThresholdExceeded {
                                marker: window.marker(),
                                window_ms: span,
                            });
                            stop_child(&child, &events, &*clock);
                        }
                    }
                }
            }
        }
    }

    // stdout closed: reap a naturally exited child. If stop() already took
    // it, there is nothing left to do.
    let taken = match child.lock() {
        Ok(mut guard) => guard.take(),
        Err(_) => None,
    };
    if let Some(mut proc) = taken {
        if let Ok(status) = proc.wait() {
            let reason = if status.code().is_some() {
                ExitReason::Normal
            } else {
                ExitReason::Signaled
            };
            debug!(code = ?status.code(), "generator script exited");
            let _ = events.send(GenEvent::Exited {
                code: status.code(),
                reason,
            });
        }
    }
}
