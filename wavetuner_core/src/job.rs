//! One tuning job: a generator script plus its power targets.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::gain_edit::GainFileEditor;

/// USRP model driving the waveform; selects the starting software gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmpModel {
    X300,
    N321,
}

impl AmpModel {
    pub fn initial_gain(self) -> i32 {
        match self {
            AmpModel::X300 => 0,
            AmpModel::N321 => 12,
        }
    }
}

impl FromStr for AmpModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x300" => Ok(AmpModel::X300),
            "n321" => Ok(AmpModel::N321),
            other => Err(format!("unknown amp model '{other}' (expected x300 or N321)")),
        }
    }
}

/// Which end of the power window is regulated tightly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Critical {
    High,
    Low,
}

impl FromStr for Critical {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Critical::High),
            "LOW" => Ok(Critical::Low),
            other => Err(format!("invalid critical end '{other}' (expected HIGH or LOW)")),
        }
    }
}

/// Everything the controller needs to tune one waveform.
#[derive(Debug, Clone)]
pub struct WaveformJob {
    pub script_path: PathBuf,
    pub amp_model: AmpModel,
    /// ALC setpoint, dBm.
    pub target_min: f64,
    /// Desired open-loop peak, dBm.
    pub target_max: f64,
    pub critical: Critical,
    /// Starting channel, derived from the script basename.
    pub channel: u8,
    /// True for `L1_L2_*` scripts, which are tuned on both channels.
    pub is_dual: bool,
}

impl WaveformJob {
    pub fn new(
        script_path: impl Into<PathBuf>,
        amp_model: AmpModel,
        target_min: f64,
        target_max: f64,
        critical: Critical,
    ) -> Self {
        let script_path = script_path.into();
        let (channel, is_dual) = derive_channel(&script_path);
        Self {
            script_path,
            amp_model,
            target_min,
            target_max,
            critical,
            channel,
            is_dual,
        }
    }

    pub fn file_name(&self) -> String {
        self.script_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.script_path.to_string_lossy().into_owned())
    }
}

/// Channel labels as they appear in log lines.
pub fn channel_label(channel: u8) -> &'static str {
    if channel == 1 { "L2" } else { "L1" }
}

fn derive_channel(path: &Path) -> (u8, bool) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.starts_with("L1_L2_") {
        (0, true)
    } else if name.starts_with("L2_") {
        (1, false)
    } else if name.starts_with("L1_") {
        (0, false)
    } else {
        (GainFileEditor::extract_channel(path), false)
    }
}
