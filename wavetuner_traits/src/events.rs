//! Event records emitted by the hardware backends.
//!
//! Links do not hold a back reference to their owner; they emit
//! `(device, line)` records onto a shared channel instead.

/// One framed line from an amplifier link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmpEvent {
    /// A trimmed, non-empty response line.
    Line { device: String, line: String },
    /// A line containing `ERROR:`, routed to the fault stream.
    Fault { device: String, line: String },
}

/// Why the generator child exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Exited on its own with a status code.
    Normal,
    /// Terminated by a signal.
    Signaled,
}

/// Lifecycle and output events from the generator subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenEvent {
    Started,
    Stopped,
    /// A raw stdout chunk, decoded as UTF-8, emitted verbatim.
    StdoutChunk(String),
    /// A runaway marker (`U` or `N`) repeated 16 times inside 500 ms.
    ThresholdExceeded { marker: char, window_ms: u64 },
    Exited { code: Option<i32>, reason: ExitReason },
}
