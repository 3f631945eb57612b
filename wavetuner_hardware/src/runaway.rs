//! Runaway detection over the generator's stdout.
//!
//! A stream stuck emitting `U` (underflow) or `N` (no-data) markers in a
//! tight burst means the generator has lost its radio and must be stopped.
//! Each marker gets an independent bounded window of arrival timestamps;
//! the windows are fed every character of every chunk, in order.

use std::collections::VecDeque;

/// Timestamps tracked per marker.
pub const WINDOW_CAPACITY: usize = 16;
/// A full window spanning less than this many milliseconds trips detection.
pub const WINDOW_SPAN_MS: u64 = 500;

/// Bounded arrival-time window for one runaway marker.
#[derive(Debug)]
pub struct MarkerWindow {
    marker: char,
    stamps: VecDeque<u64>,
}

impl MarkerWindow {
    pub fn new(marker: char) -> Self {
        Self {
            marker,
            stamps: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Feed one character stamped at `now_ms`.
    ///
    /// Returns `Some(span_ms)` when the window fills inside
    /// [`WINDOW_SPAN_MS`]; the window is cleared on trip. Any character
    /// other than this window's marker clears the window.
    pub fn observe(&mut self, c: char, now_ms: u64) -> Option<u64> {
        if c != self.marker {
            self.stamps.clear();
            return None;
        }
        self.stamps.push_back(now_ms);
        if self.stamps.len() > WINDOW_CAPACITY {
            self.stamps.pop_front();
        }
        if self.stamps.len() == WINDOW_CAPACITY {
            let first = *self.stamps.front()?;
            let last = *self.stamps.back()?;
            let span = last.saturating_sub(first);
            if span < WINDOW_SPAN_MS {
                self.stamps.clear();
                return Some(span);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_once_on_sixteen_fast_markers() {
        let mut w = MarkerWindow::new('U');
        let mut trips = 0;
        for i in 0..WINDOW_CAPACITY as u64 {
            if w.observe('U', i * 10).is_some() {
                trips += 1;
            }
        }
        assert_eq!(trips, 1);
        // Window cleared on trip: the next marker starts a fresh sequence.
        assert!(w.observe('U', 200).is_none());
    }

    #[test]
    fn slow_markers_do_not_trip() {
        let mut w = MarkerWindow::new('N');
        for i in 0..(WINDOW_CAPACITY as u64 * 3) {
            assert!(w.observe('N', i * 100).is_none(), "tripped at {i}");
        }
    }

    #[test]
    fn foreign_character_resets_the_window() {
        let mut w = MarkerWindow::new('U');
        for i in 0..(WINDOW_CAPACITY as u64 - 1) {
            assert!(w.observe('U', i).is_none());
        }
        assert!(w.observe('x', 20).is_none());
        // Sequence restarted; fifteen more markers are still below capacity.
        for i in 0..(WINDOW_CAPACITY as u64 - 1) {
            assert!(w.observe('U', 30 + i).is_none());
        }
    }

    #[test]
    fn eviction_keeps_the_window_bounded_and_sliding() {
        let mut w = MarkerWindow::new('U');
        // A slow ramp that never trips, far past capacity.
        for i in 0..100u64 {
            assert!(w.observe('U', i * 40).is_none());
        }
        // Then a fast burst: the window slides until first..last < 500 ms.
        let base = 100 * 40;
        let mut tripped = false;
        for i in 0..WINDOW_CAPACITY as u64 {
            if w.observe('U', base + i).is_some() {
                tripped = true;
                break;
            }
        }
        assert!(tripped);
    }
}
