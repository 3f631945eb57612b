//! Per-device rolling power readings and the stability predicate.

use std::collections::VecDeque;
use std::sync::OnceLock;

use regex::Regex;

/// Readings retained per device; oldest evicted beyond this.
pub const READING_CAPACITY: usize = 10;

/// Stability tolerance while measuring the open-loop (VVA) peak, dBm.
pub const VVA_TOLERANCE: f64 = 0.01;
/// Stability tolerance while the ALC loop settles, dBm.
pub const ALC_TOLERANCE: f64 = 0.2;

/// Bounded rolling buffer of forward-power readings for one device.
#[derive(Debug, Default, Clone)]
pub struct ReadingBuffer {
    values: VecDeque<f64>,
}

impl ReadingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > READING_CAPACITY {
            self.values.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn last_three(&self) -> Option<[f64; 3]> {
        let n = self.values.len();
        if n < 3 {
            return None;
        }
        Some([self.values[n - 3], self.values[n - 2], self.values[n - 1]])
    }

    /// Successive differences of the last three readings both below `tolerance`.
    pub fn is_stable(&self, tolerance: f64) -> bool {
        match self.last_three() {
            Some([a, b, c]) => (a - b).abs() < tolerance && (b - c).abs() < tolerance,
            None => false,
        }
    }

    /// Mean of the last three readings.
    pub fn settled_mean(&self) -> Option<f64> {
        self.last_three().map(|[a, b, c]| (a + b + c) / 3.0)
    }
}

/// First signed decimal number in an amplifier response line.
pub fn parse_reading(line: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+").expect("reading pattern compiles")
    });
    re.find(line)?.as_str().parse().ok()
}
