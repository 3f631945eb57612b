//! Newline framing for amplifier links.
//!
//! Bytes accumulate per link; once a `\n` is seen the whole accumulator is
//! split, every non-empty trimmed piece becomes one line record, and the
//! accumulator is cleared.

use wavetuner_traits::AmpEvent;

/// Per-link byte accumulator.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    pending: String,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns the line events it completes, tagged with
    /// `device`. Lines containing `ERROR:` are routed to the fault stream.
    pub fn feed(&mut self, device: &str, chunk: &str) -> Vec<AmpEvent> {
        self.pending.push_str(chunk);
        if !self.pending.contains('\n') {
            return Vec::new();
        }
        let events = self
            .pending
            .split('\n')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(|piece| {
                if piece.contains("ERROR:") {
                    AmpEvent::Fault {
                        device: device.to_string(),
                        line: piece.to_string(),
                    }
                } else {
                    AmpEvent::Line {
                        device: device.to_string(),
                        line: piece.to_string(),
                    }
                }
            })
            .collect();
        self.pending.clear();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(events: &[AmpEvent]) -> Vec<&str> {
        events
            .iter()
            .map(|e| match e {
                AmpEvent::Line { line, .. } | AmpEvent::Fault { line, .. } => line.as_str(),
            })
            .collect()
    }

    #[test]
    fn buffers_until_newline() {
        let mut acc = LineAccumulator::new();
        assert!(acc.feed("amp", "29.9").is_empty());
        let events = acc.feed("amp", "5 dBm\r\n");
        assert_eq!(lines(&events), vec!["29.95 dBm"]);
    }

    #[test]
    fn splits_multiple_lines_in_one_chunk() {
        let mut acc = LineAccumulator::new();
        let events = acc.feed("amp", "OK\n29.95 dBm\nSTANDBY, VVA\n");
        assert_eq!(lines(&events), vec!["OK", "29.95 dBm", "STANDBY, VVA"]);
    }

    #[test]
    fn error_lines_route_to_the_fault_stream() {
        let mut acc = LineAccumulator::new();
        let events = acc.feed("amp", "ERROR: PA FAULT\nOK\n");
        assert!(matches!(events[0], AmpEvent::Fault { .. }));
        assert!(matches!(events[1], AmpEvent::Line { .. }));
    }

    #[test]
    fn empty_pieces_are_dropped() {
        let mut acc = LineAccumulator::new();
        let events = acc.feed("amp", "\n\n  \nOK\n\n");
        assert_eq!(lines(&events), vec!["OK"]);
    }
}
