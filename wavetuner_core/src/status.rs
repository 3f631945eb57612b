//! Status returned from each controller event handler.

use crate::error::TunerError;

#[derive(Debug)]
pub enum TuningStatus {
    /// Keep feeding events; the run is still in flight.
    Running,
    /// Both ends tuned and logged.
    Finished,
    /// Terminal failure; the reason is one log line away.
    Failed(TunerError),
}

impl TuningStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TuningStatus::Running)
    }
}
