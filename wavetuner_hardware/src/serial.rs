//! Real amplifier fleet over serial links.
//!
//! Discovery scans `/dev` for entries whose name (or resolved symlink
//! target) contains `amp` case-insensitively, opens each at 9600 8N1 with
//! no flow control, and runs one reader thread per link. Readers feed the
//! shared event channel through the newline framer.

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, warn};
use wavetuner_traits::{AmpBus, AmpEvent};

use crate::error::HwError;
use crate::framing::LineAccumulator;

const BAUD_RATE: u32 = 9600;
const READ_TIMEOUT: Duration = Duration::from_millis(100);

pub struct SerialFleet {
    events: Sender<AmpEvent>,
    dev_root: std::path::PathBuf,
    links: HashMap<String, Box<dyn SerialPort>>,
    /// Discovery order; link lookup is by identifier, order matters upstream.
    order: Vec<String>,
    shutdown: Arc<AtomicBool>,
    readers: Vec<JoinHandle<()>>,
}

impl SerialFleet {
    pub fn new(events: Sender<AmpEvent>) -> Self {
        Self::with_dev_root(events, "/dev")
    }

    /// Scan an alternate device directory (for tests with pty fixtures).
    pub fn with_dev_root(events: Sender<AmpEvent>, dev_root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            events,
            dev_root: dev_root.into(),
            links: HashMap::new(),
            order: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            readers: Vec::new(),
        }
    }

    fn is_amp_candidate(path: &Path) -> bool {
        let name_matches = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_lowercase().contains("amp"))
                .unwrap_or(false)
        };
        if name_matches(path) {
            return true;
        }
        // udev symlinks may carry the amp name on either end.
        std::fs::read_link(path)
            .map(|target| name_matches(&target))
            .unwrap_or(false)
    }

    fn open_link(&mut self, device: String) {
        let port = serialport::new(device.clone(), BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open();
        let port = match port {
            Ok(p) => p,
            Err(e) => {
                warn!(device, error = %e, "failed to open amplifier link");
                return;
            }
        };
        let reader = match port.try_clone() {
            Ok(r) => r,
            Err(e) => {
                warn!(device, error = %e, "failed to clone amplifier link for reading");
                return;
            }
        };
        debug!(device, "amplifier link open");
        let events = self.events.clone();
        let shutdown = Arc::clone(&self.shutdown);
        let dev = device.clone();
        self.readers
            .push(thread::spawn(move || read_link(reader, dev, events, shutdown)));
        self.order.push(device.clone());
        self.links.insert(device, port);
    }
}

impl AmpBus for SerialFleet {
    fn discover(&mut self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.disconnect_all();
        self.shutdown = Arc::new(AtomicBool::new(false));

        let entries =
            std::fs::read_dir(&self.dev_root).map_err(|e| HwError::Scan(e.to_string()))?;
        let mut candidates: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| Self::is_amp_candidate(p))
            .collect();
        candidates.sort();

        for path in candidates {
            self.open_link(path.to_string_lossy().into_owned());
        }
        Ok(self.order.clone())
    }

    fn send(&mut self, device: &str, command: &str) {
        let Some(port) = self.links.get_mut(device) else {
            warn!(device, command, "send to unknown amplifier device");
            return;
        };
        let framed = format!("{command}\n");
        if let Err(e) = port.write_all(framed.as_bytes()).and_then(|()| port.flush()) {
            warn!(device, command, error = %e, "amplifier write failed");
            return;
        }
        debug!(device, command, "sent");
    }

    fn disconnect_all(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.links.clear();
        self.order.clear();
        for handle in self.readers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for SerialFleet {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

fn read_link(
    mut port: Box<dyn SerialPort>,
    device: String,
    events: Sender<AmpEvent>,
    shutdown: Arc<AtomicBool>,
) {
    let mut acc = LineAccumulator::new();
    let mut buf = [0u8; 256];
    while !shutdown.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]);
                for event in acc.feed(&device, &chunk) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                debug!(device, error = %e, "amplifier read ended");
                break;
            }
        }
    }
}
