//! Tuned-result logging, separate from the diagnostic stream.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);

    /// Trace the message on the diagnostic stream and append it to the sink.
    fn debug_and_log(&self, message: &str) {
        tracing::debug!("{message}");
        self.log(message);
    }
}

/// Logger that only traces; the builder default when no file sink is wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceLogger;

impl Logger for TraceLogger {
    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }
}

/// Append-only timestamped sink: `waveLog-MM-dd-yy-N.txt`, flushed per write.
pub struct WaveLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl WaveLogger {
    /// Open a fresh log file in `dir`, picking the smallest `N` that does
    /// not collide with an existing file.
    pub fn create_in(dir: &Path) -> std::io::Result<Self> {
        let date = Utc::now().format("%m-%d-%y");
        let mut counter = 1u32;
        loop {
            let path = dir.join(format!("waveLog-{date}-{counter}.txt"));
            match OpenOptions::new().append(true).create_new(true).open(&path) {
                Ok(file) => {
                    return Ok(Self {
                        file: Mutex::new(file),
                        path,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_message(message: &str) -> String {
        let stamp = Utc::now().format("%m-%d-%y %H:%M:%S");
        format!("<{stamp} Z> {message}")
    }
}

impl Logger for WaveLogger {
    fn log(&self, message: &str) {
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        let _ = writeln!(file, "{}", Self::format_message(message));
        let _ = file.flush();
    }
}
