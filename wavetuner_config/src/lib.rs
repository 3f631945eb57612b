//! Typed TOML configuration for the waveform tuner.
//!
//! Every section has sensible defaults, so a missing config file is not an
//! error; the controller works without any of these knobs being set.

use serde::Deserialize;
use thiserror::Error;

/// Allowed range for the gain argument written into generator scripts.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GainCfg {
    pub min: i32,
    pub max: i32,
}

impl Default for GainCfg {
    fn default() -> Self {
        Self { min: -10, max: 60 }
    }
}

/// Batch-driver behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverCfg {
    /// Waveform files whose name contains any of these substrings are skipped.
    pub exclusions: Vec<String>,
}

/// Fault-handling knobs for the tuning controller.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FaultsCfg {
    /// Consecutive amplifier-fault retries before the run is abandoned.
    pub retry_limit: u32,
    /// Advisory `ALC Range` line count; crossing it logs a warning.
    /// Earlier revisions tripped a minimum adjustment at 12.
    pub alc_range_limit: u32,
}

impl Default for FaultsCfg {
    fn default() -> Self {
        Self {
            retry_limit: 5,
            alc_range_limit: 12,
        }
    }
}

/// Generator-subprocess supervision.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GeneratorCfg {
    /// How long to wait for the readiness prompt before failing the run.
    pub prompt_timeout_ms: u64,
}

impl Default for GeneratorCfg {
    fn default() -> Self {
        Self {
            prompt_timeout_ms: 30_000,
        }
    }
}

/// Diagnostic-stream settings consumed by the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Optional path for a diagnostic log file (separate from the wave log).
    pub file: Option<String>,
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gain: GainCfg,
    pub driver: DriverCfg,
    pub faults: FaultsCfg,
    pub generator: GeneratorCfg,
    pub logging: Logging,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("gain.min ({min}) must not exceed gain.max ({max})")]
    GainOrder { min: i32, max: i32 },
    #[error("faults.retry_limit must be > 0")]
    ZeroRetryLimit,
    #[error("generator.prompt_timeout_ms must be > 0")]
    ZeroPromptTimeout,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gain.min > self.gain.max {
            return Err(ConfigError::GainOrder {
                min: self.gain.min,
                max: self.gain.max,
            });
        }
        if self.faults.retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }
        if self.generator.prompt_timeout_ms == 0 {
            return Err(ConfigError::ZeroPromptTimeout);
        }
        Ok(())
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}
