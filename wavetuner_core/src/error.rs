use thiserror::Error;

use crate::gain_edit::GainEditError;

/// Terminal reasons a tuning run can fail.
#[derive(Debug, Error)]
pub enum TunerError {
    #[error("no amplifier devices found")]
    NoDevices,
    #[error("device discovery failed: {0}")]
    Discovery(String),
    #[error("gain edit rejected: {0}")]
    GainEdit(#[from] GainEditError),
    #[error("gain cannot be lowered further for LOW critical tuning")]
    GainFloor,
    #[error("timed out waiting for the generator readiness prompt")]
    PromptTimeout,
    #[error("amplifier fault limit reached after {0} retries")]
    FaultLimit(u32),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
