//! Controller-side tuning knobs, mapped from `wavetuner_config` by callers.

#[derive(Debug, Clone, Copy)]
pub struct TuningCfg {
    /// Allowed range for the script gain argument.
    pub gain_min: i32,
    pub gain_max: i32,
    /// Consecutive amplifier-fault retries before the run fails.
    pub fault_retry_limit: u32,
    /// Advisory `ALC Range` line count; crossing it logs a warning.
    pub alc_range_limit: u32,
    /// Bounded wait for the generator readiness prompt.
    pub prompt_timeout_ms: u64,
}

impl Default for TuningCfg {
    fn default() -> Self {
        Self {
            gain_min: -10,
            gain_max: 60,
            fault_retry_limit: 5,
            alc_range_limit: 12,
            prompt_timeout_ms: 30_000,
        }
    }
}
