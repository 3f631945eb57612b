//! The tuning state machine (`TuningController`).
//!
//! One controller tunes one waveform job: it walks the amplifiers into a
//! known mode, starts the generator, measures the open-loop peak under VVA,
//! adjusts the script gain until the peak sits at the target maximum,
//! verifies the regulated minimum under ALC, re-checks the peak, and logs
//! the result. All transitions are driven by amplifier lines, generator
//! output, or the single pending timer; no two transitions run at once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};
use wavetuner_traits::{AmpBus, Waveform};

use crate::config::TuningCfg;
use crate::error::TunerError;
use crate::gain_edit::GainFileEditor;
use crate::job::{channel_label, Critical, WaveformJob};
use crate::logger::Logger;
use crate::readings::{parse_reading, ReadingBuffer, ALC_TOLERANCE, VVA_TOLERANCE};
use crate::state::{Pending, TuningState};
use crate::status::TuningStatus;

/// Readiness token the generator prints once the waveform is on the air.
const READY_PROMPT: &str = "Press Enter to quit";

/// Slack allowed on the regulated minimum before LOW-critical tuning
/// lowers the gain.
const MIN_SLACK_DB: f64 = 0.2;

pub struct TuningController<B: AmpBus, W: Waveform> {
    bus: B,
    waveform: W,
    editor: GainFileEditor,
    logger: Arc<dyn Logger>,
    cfg: TuningCfg,
    job: WaveformJob,

    state: TuningState,
    pending: Option<(Duration, Pending)>,
    generation: u64,
    done: bool,

    devices: Vec<String>,
    /// Devices that reached VVA stability; later phases address only these.
    testing: Vec<String>,
    readings: HashMap<String, ReadingBuffer>,

    channel: u8,
    current_gain: i32,
    gain_step: i32,
    /// Sign of the most recent gain move: +1, -1, or 0 before any move.
    last_gain_adjustment: i8,
    /// Consecutive downward moves since the last upward one.
    adjust_down_count: u32,
    /// How often the adjustment direction has flipped (telemetry).
    gain_swap_count: u32,
    fault_retries: u32,
    alc_range_count: u32,
    /// Average recorded when the peak first overshot; the three-down cap
    /// falls back to it.
    last_avg: f64,
    final_min: f64,
    final_max: f64,
}

impl<B: AmpBus, W: Waveform> TuningController<B, W> {
    pub fn new(
        bus: B,
        waveform: W,
        logger: Arc<dyn Logger>,
        cfg: TuningCfg,
        job: WaveformJob,
    ) -> Self {
        let editor = GainFileEditor::with_bounds(cfg.gain_min, cfg.gain_max);
        let channel = job.channel;
        let current_gain = job.amp_model.initial_gain();
        Self {
            bus,
            waveform,
            editor,
            logger,
            cfg,
            job,
            state: TuningState::Idle,
            pending: None,
            generation: 0,
            done: false,
            devices: Vec::new(),
            testing: Vec::new(),
            readings: HashMap::new(),
            channel,
            current_gain,
            gain_step: 1,
            last_gain_adjustment: 0,
            adjust_down_count: 0,
            gain_swap_count: 0,
            fault_retries: 0,
            alc_range_count: 0,
            last_avg: 0.0,
            final_min: 0.0,
            final_max: 0.0,
        }
    }

    // ── Public contract ──────────────────────────────────────────────────

    /// Begin the run: discover the fleet and schedule the mode check.
    pub fn start(&mut self) -> TuningStatus {
        info!(
            file = %self.job.file_name(),
            model = ?self.job.amp_model,
            target_min = self.job.target_min,
            target_max = self.job.target_max,
            critical = ?self.job.critical,
            "starting tuning"
        );
        let discovered = match self.bus.discover() {
            Ok(devices) => devices,
            Err(e) => return self.fail(TunerError::Discovery(e.to_string())),
        };
        self.devices = discovered;
        reorder_pair(&mut self.devices);
        if self.devices.is_empty() {
            warn!("no amplifier devices found");
            return self.fail(TunerError::NoDevices);
        }
        debug!(devices = ?self.devices, "connected amp devices");
        self.readings = self
            .devices
            .iter()
            .map(|d| (d.clone(), ReadingBuffer::new()))
            .collect();
        self.testing.clear();
        self.schedule(1000, Pending::Enter(TuningState::CheckAmpMode));
        TuningStatus::Running
    }

    /// One framed response line from an amplifier.
    pub fn on_amp_line(&mut self, device: &str, line: &str) -> TuningStatus {
        if self.done {
            return TuningStatus::Running;
        }
        trace!(device, line, "amp output");

        if self.state == TuningState::CheckAmpMode {
            if line.contains("STANDBY, VVA") {
                debug!(device, "amp is in STANDBY, VVA mode; moving on");
                return self.enter(TuningState::InitialModeVva);
            }
            if line.contains("STANDBY, ALC") {
                self.bus.send(device, "MODE VVA");
                self.schedule(500, Pending::Enter(TuningState::CheckAmpMode));
                return TuningStatus::Running;
            }
            if line.contains("ONLINE, VVA") || line.contains("ONLINE, ALC") {
                self.bus.send(device, "STANDBY");
                self.schedule(500, Pending::Enter(TuningState::CheckAmpMode));
                return TuningStatus::Running;
            }
        }

        if matches!(
            self.state,
            TuningState::QueryFwdPwrAlc | TuningState::WaitForAlcStable
        ) {
            if line.contains("ALC Range") {
                self.alc_range_count += 1;
                if self.alc_range_count == self.cfg.alc_range_limit {
                    warn!(
                        count = self.alc_range_count,
                        "repeated 'ALC Range' responses; target minimum may sit below the amplifier's ALC window"
                    );
                }
            } else {
                self.alc_range_count = 0;
            }
        }

        if let Some(value) = parse_reading(line) {
            self.readings
                .entry(device.to_string())
                .or_default()
                .push(value);
        } else {
            trace!(device, line, "no numeric value in amp output");
        }
        TuningStatus::Running
    }

    /// An `ERROR:`-tagged line from an amplifier.
    pub fn on_amp_fault(&mut self, device: &str, line: &str) -> TuningStatus {
        if self.done {
            return TuningStatus::Running;
        }
        warn!(device, line, "amplifier fault");
        self.schedule(1000, Pending::Enter(TuningState::RetryAfterFault));
        TuningStatus::Running
    }

    /// A raw stdout chunk from the generator.
    pub fn on_generator_chunk(&mut self, chunk: &str) -> TuningStatus {
        if self.done {
            return TuningStatus::Running;
        }
        if chunk.contains(READY_PROMPT) {
            match self.state {
                TuningState::WaitForPrompt => {
                    self.schedule(500, Pending::Enter(TuningState::SetModeVvaAll));
                }
                TuningState::WaitForPromptAlc => {
                    self.schedule(1000, Pending::Enter(TuningState::QueryFwdPwrAlc));
                }
                _ => {}
            }
        }
        TuningStatus::Running
    }

    /// The single-shot delay elapsed.
    pub fn fire_timer(&mut self) -> TuningStatus {
        if self.done {
            return TuningStatus::Running;
        }
        let Some((_, pending)) = self.pending.take() else {
            return TuningStatus::Running;
        };
        match pending {
            Pending::Enter(state) => self.enter(state),
            Pending::FinalizeVvaLevel => {
                for dev in self.testing.clone() {
                    self.bus.set_vva_lvl(100.0, &dev);
                    self.clear_buffer(&dev);
                }
                self.schedule(2000, Pending::Enter(TuningState::RecheckMax));
                TuningStatus::Running
            }
            Pending::PromptTimeout => {
                warn!(
                    timeout_ms = self.cfg.prompt_timeout_ms,
                    "generator never printed its readiness prompt"
                );
                self.fail(TunerError::PromptTimeout)
            }
        }
    }

    /// Delay of the armed timer, if any.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(d, _)| *d)
    }

    /// Bumped every time the timer is (re)armed; lets the event loop know
    /// when to rebuild its timeout channel.
    pub fn schedule_generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> TuningState {
        self.state
    }

    pub fn current_gain(&self) -> i32 {
        self.current_gain
    }

    pub fn testing_devices(&self) -> &[String] {
        &self.testing
    }

    pub fn gain_swap_count(&self) -> u32 {
        self.gain_swap_count
    }

    pub fn final_min(&self) -> f64 {
        self.final_min
    }

    pub fn final_max(&self) -> f64 {
        self.final_max
    }

    // ── Transitions ──────────────────────────────────────────────────────

    fn enter(&mut self, state: TuningState) -> TuningStatus {
        self.state = state;
        match state {
            TuningState::Idle => TuningStatus::Running,

            TuningState::CheckAmpMode => {
                debug!("Checking amplifier status...");
                let targets = self.target_devices();
                self.bus.broadcast(&targets, "MODE?");
                TuningStatus::Running
            }

            TuningState::InitialModeVva => {
                for dev in self.devices.clone() {
                    self.bus.set_mode("VVA", &dev);
                }
                self.schedule(1200, Pending::Enter(TuningState::InitialVvaLevel));
                TuningStatus::Running
            }

            TuningState::InitialVvaLevel => {
                for dev in self.devices.clone() {
                    self.bus.set_vva_lvl(100.0, &dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::InitialModeAlc));
                TuningStatus::Running
            }

            TuningState::InitialModeAlc => {
                for dev in self.devices.clone() {
                    self.bus.set_mode("ALC", &dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::InitialAlcLevel));
                TuningStatus::Running
            }

            TuningState::InitialAlcLevel => {
                let level = self.job.target_min;
                for dev in self.devices.clone() {
                    self.bus.set_alc_lvl(level, &dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::SetOnline));
                TuningStatus::Running
            }

            TuningState::SetOnline => {
                for dev in self.devices.clone() {
                    self.bus.set_online(&dev);
                }
                self.schedule(500, Pending::Enter(TuningState::SetInitialGain));
                TuningStatus::Running
            }

            TuningState::SetInitialGain => {
                debug!("Step 1: Setting initial gain to {} dBm.", self.current_gain);
                let result = if self.job.is_dual && self.channel == 0 {
                    // Dual-band scripts carry one call per channel; seed both.
                    self.edit_gain(0).and_then(|()| self.edit_gain(1))
                } else {
                    self.edit_gain(self.channel)
                };
                if let Err(status) = result {
                    return status;
                }
                self.schedule(500, Pending::Enter(TuningState::StartWaveform));
                TuningStatus::Running
            }

            TuningState::StartWaveform => {
                debug!("Step 2: Starting waveform.");
                self.waveform.start();
                self.enter(TuningState::WaitForPrompt)
            }

            TuningState::WaitForPrompt | TuningState::WaitForPromptAlc => {
                debug!("Waiting for waveform to start...");
                self.schedule(self.cfg.prompt_timeout_ms, Pending::PromptTimeout);
                TuningStatus::Running
            }

            TuningState::SetModeVvaAll => {
                debug!("Step 3: Setting mode VVA (Gain) on all amps.");
                for dev in self.devices.clone() {
                    self.bus.set_mode("VVA", &dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::SetVvaLevelAll));
                TuningStatus::Running
            }

            TuningState::SetVvaLevelAll => {
                debug!("Setting gain level to 100 on all amps.");
                for dev in self.devices.clone() {
                    self.bus.set_vva_lvl(100.0, &dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::QueryFwdPwr));
                TuningStatus::Running
            }

            TuningState::QueryFwdPwr => {
                debug!("Step 4: Querying forward power in VVA (gain) mode.");
                self.clear_all_buffers();
                for dev in self.target_devices() {
                    self.bus.get_fwd_pwr(&dev);
                }
                self.schedule(500, Pending::Enter(TuningState::WaitForStable));
                TuningStatus::Running
            }

            TuningState::WaitForStable => {
                debug!("Checking for stable forward power...");
                let targets = self.target_devices();
                let mut stable_found = false;
                for dev in &targets {
                    let stable = self
                        .readings
                        .get(dev)
                        .is_some_and(|buf| buf.is_stable(VVA_TOLERANCE));
                    if stable {
                        if !self.testing.contains(dev) {
                            self.testing.push(dev.clone());
                        }
                        stable_found = true;
                    }
                }
                if stable_found {
                    self.schedule(500, Pending::Enter(TuningState::StopWaveform));
                } else {
                    for dev in &targets {
                        self.bus.get_fwd_pwr(dev);
                    }
                    self.schedule(500, Pending::Enter(TuningState::WaitForStable));
                }
                TuningStatus::Running
            }

            TuningState::StopWaveform => {
                debug!("Step 5: Stopping waveform (VVA phase).");
                self.waveform.stop();
                self.schedule(500, Pending::Enter(TuningState::ComparePower));
                TuningStatus::Running
            }

            TuningState::ComparePower => {
                debug!("Step 6: Comparing results to target {} dBm.", self.job.target_max);
                let avg = self.mean_over_testing().unwrap_or(0.0);
                let diff = self.job.target_max - avg;
                debug!(avg, diff, "measured average");
                if diff > 0.1 {
                    self.gain_step = match diff {
                        d if d > 2.2 => 5,
                        d if d > 1.8 => 4,
                        d if d > 1.2 => 3,
                        d if d > 0.6 => 2,
                        _ => 1,
                    };
                    self.schedule(1000, Pending::Enter(TuningState::AdjustGainUp));
                } else if diff < -0.3 {
                    self.last_avg = avg;
                    self.gain_step = 1;
                    self.schedule(1000, Pending::Enter(TuningState::AdjustGainDown));
                } else {
                    self.final_max = avg;
                    self.schedule(1000, Pending::Enter(TuningState::SetModeAlc));
                }
                TuningStatus::Running
            }

            TuningState::AdjustGainUp => {
                debug!(
                    "Step 7: Increasing gain. New gain: {}",
                    self.current_gain + self.gain_step
                );
                if self.last_gain_adjustment != 1 {
                    self.gain_swap_count += 1;
                }
                self.last_gain_adjustment = 1;
                self.adjust_down_count = 0;
                self.current_gain += self.gain_step;
                self.clear_all_buffers();
                if let Err(status) = self.edit_gain(self.channel) {
                    return status;
                }
                self.schedule(1000, Pending::Enter(TuningState::StartWaveform));
                TuningStatus::Running
            }

            TuningState::AdjustGainDown => {
                self.adjust_down_count += 1;
                if self.adjust_down_count >= 3 {
                    debug!(
                        "Three consecutive downward moves; accepting {} dBm as the peak.",
                        self.last_avg
                    );
                    self.final_max = self.last_avg;
                    self.adjust_down_count = 0;
                    self.schedule(1000, Pending::Enter(TuningState::SetModeAlc));
                    return TuningStatus::Running;
                }
                debug!(
                    "Step 7: Lowering gain. New gain: {}",
                    self.current_gain - self.gain_step
                );
                if self.last_gain_adjustment != -1 {
                    self.gain_swap_count += 1;
                }
                self.last_gain_adjustment = -1;
                self.current_gain -= self.gain_step;
                self.clear_all_buffers();
                if let Err(status) = self.edit_gain(self.channel) {
                    return status;
                }
                self.schedule(1000, Pending::Enter(TuningState::StartWaveform));
                TuningStatus::Running
            }

            TuningState::SetModeAlc => {
                debug!("Step 8: Setting up ALC test for minimum power.");
                for dev in self.testing.clone() {
                    self.clear_buffer(&dev);
                    self.bus.set_mode("ALC", &dev);
                }
                self.schedule(1500, Pending::Enter(TuningState::PreSetAlc));
                TuningStatus::Running
            }

            TuningState::PreSetAlc => {
                debug!("Setting ALC level to {} dBm.", self.job.target_min);
                let level = self.job.target_min;
                for dev in self.testing.clone() {
                    self.bus.set_alc_lvl(level, &dev);
                }
                self.schedule(1500, Pending::Enter(TuningState::StartWaveformAlc));
                TuningStatus::Running
            }

            TuningState::StartWaveformAlc => {
                debug!("Step 9: Starting waveform in ALC mode.");
                self.waveform.start();
                self.enter(TuningState::WaitForPromptAlc)
            }

            TuningState::QueryFwdPwrAlc => {
                debug!("Step 10: Querying forward power in ALC mode.");
                for dev in self.testing.clone() {
                    self.bus.get_fwd_pwr(&dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::WaitForAlcStable));
                TuningStatus::Running
            }

            TuningState::WaitForAlcStable => {
                let Some(avg_alc) = self.settled_average(ALC_TOLERANCE) else {
                    self.schedule(1000, Pending::Enter(TuningState::QueryFwdPwrAlc));
                    return TuningStatus::Running;
                };
                if self.job.critical == Critical::Low
                    && (avg_alc - self.job.target_min) > MIN_SLACK_DB
                {
                    self.schedule(1000, Pending::Enter(TuningState::AdjustMinDown));
                } else {
                    self.final_min = avg_alc;
                    self.schedule(1000, Pending::Enter(TuningState::FinalizeTuning));
                }
                TuningStatus::Running
            }

            TuningState::AdjustMinDown => {
                debug!(
                    "Adjusting minimum: lowering gain. New gain: {}",
                    self.current_gain - 1
                );
                if self.current_gain <= 0 {
                    debug!("Gain is already 0. Cannot lower further.");
                    self.logger.debug_and_log(
                        "Tuning failed: gain cannot be lowered further for LOW critical tuning.",
                    );
                    return self.fail(TunerError::GainFloor);
                }
                self.current_gain -= 1;
                if let Err(status) = self.edit_gain(self.channel) {
                    return status;
                }
                for dev in self.testing.clone() {
                    self.clear_buffer(&dev);
                }
                self.waveform.stop();
                self.schedule(1000, Pending::Enter(TuningState::StartWaveformAlc));
                TuningStatus::Running
            }

            TuningState::FinalizeTuning => {
                debug!("Step 11: Finalizing tuning.");
                for dev in self.testing.clone() {
                    self.bus.set_mode("VVA", &dev);
                }
                // The level write and buffer clear follow on the same timer.
                self.schedule(500, Pending::FinalizeVvaLevel);
                TuningStatus::Running
            }

            TuningState::RecheckMax => {
                for dev in self.testing.clone() {
                    self.clear_buffer(&dev);
                    self.bus.get_fwd_pwr(&dev);
                }
                self.schedule(1000, Pending::Enter(TuningState::WaitForMaxStable));
                TuningStatus::Running
            }

            TuningState::WaitForMaxStable => {
                let Some(avg_max) = self.settled_average(VVA_TOLERANCE) else {
                    debug!("Final maximum readings not yet stable, scheduling another query.");
                    for dev in self.testing.clone() {
                        self.bus.get_fwd_pwr(&dev);
                    }
                    self.schedule(1000, Pending::Enter(TuningState::WaitForMaxStable));
                    return TuningStatus::Running;
                };
                self.final_max = avg_max;
                self.schedule(1000, Pending::Enter(TuningState::LogResults));
                TuningStatus::Running
            }

            TuningState::LogResults => {
                let message = format!(
                    "Waveform {} for channel {} is tuned to a minimum power of {:.1} dBm and a maximum power of {:.1} dBm",
                    self.job.file_name(),
                    channel_label(self.channel),
                    self.final_min,
                    self.final_max
                );
                self.logger.debug_and_log(&message);
                self.fault_retries = 0;
                if self.job.is_dual && self.channel == 0 {
                    debug!("Dual-band script: restarting for channel L2.");
                    self.channel = 1;
                    self.current_gain = self.job.amp_model.initial_gain();
                    self.testing.clear();
                    self.clear_all_buffers();
                    self.last_gain_adjustment = 0;
                    self.adjust_down_count = 0;
                    self.alc_range_count = 0;
                    self.waveform.stop();
                    self.schedule(1000, Pending::Enter(TuningState::SetInitialGain));
                    return TuningStatus::Running;
                }
                self.waveform.stop();
                self.done = true;
                TuningStatus::Finished
            }

            TuningState::RetryAfterFault => {
                self.fault_retries += 1;
                if self.fault_retries > self.cfg.fault_retry_limit {
                    warn!(retries = self.fault_retries - 1, "amplifier fault limit reached");
                    return self.fail(TunerError::FaultLimit(self.fault_retries - 1));
                }
                debug!("Fault encountered. Retrying after fault...");
                self.waveform.stop();
                self.current_gain -= 1;
                if let Err(status) = self.edit_gain(self.channel) {
                    return status;
                }
                self.waveform.start();
                self.schedule(1000, Pending::Enter(TuningState::SetModeAlc));
                TuningStatus::Running
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn schedule(&mut self, delay_ms: u64, pending: Pending) {
        self.pending = Some((Duration::from_millis(delay_ms), pending));
        self.generation += 1;
    }

    fn fail(&mut self, err: TunerError) -> TuningStatus {
        self.done = true;
        self.pending = None;
        self.generation += 1;
        error!(error = %err, "tuning failed");
        TuningStatus::Failed(err)
    }

    fn edit_gain(&mut self, channel: u8) -> Result<(), TuningStatus> {
        self.editor
            .edit_gain(&self.job.script_path, self.current_gain, channel)
            .map_err(|e| self.fail(e.into()))
    }

    fn clear_buffer(&mut self, device: &str) {
        if let Some(buf) = self.readings.get_mut(device) {
            buf.clear();
        }
    }

    fn clear_all_buffers(&mut self) {
        for buf in self.readings.values_mut() {
            buf.clear();
        }
    }

    /// Mean over the testing subset of each device's settled mean.
    fn mean_over_testing(&self) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for dev in &self.testing {
            if let Some(mean) = self.readings.get(dev).and_then(ReadingBuffer::settled_mean) {
                total += mean;
                count += 1;
            }
        }
        (count > 0).then(|| total / count as f64)
    }

    /// Average over the testing subset, but only when every member has
    /// three readings inside `tolerance`.
    fn settled_average(&self, tolerance: f64) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for dev in &self.testing {
            let buf = self.readings.get(dev)?;
            if !buf.is_stable(tolerance) {
                return None;
            }
            total += buf.settled_mean()?;
            count += 1;
        }
        (count > 0).then(|| total / count as f64)
    }

    /// Main-loop command target: the channel's amplifier.
    fn target_devices(&self) -> Vec<String> {
        if self.devices.len() <= 1 {
            return self.devices.clone();
        }
        let named = if self.channel == 0 {
            self.devices.iter().find(|d| is_l1_name(d))
        } else {
            self.devices.iter().find(|d| is_l2_name(d))
        };
        match named {
            Some(dev) => vec![dev.clone()],
            None => {
                let idx = usize::from(self.channel).min(self.devices.len() - 1);
                debug!(
                    channel = self.channel,
                    device = %self.devices[idx],
                    "no channel-named amplifier; using positional fallback"
                );
                vec![self.devices[idx].clone()]
            }
        }
    }
}

impl<B: AmpBus, W: Waveform> Drop for TuningController<B, W> {
    fn drop(&mut self) {
        self.waveform.stop();
        self.bus.disconnect_all();
    }
}

fn is_l1_name(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper.contains("L1") && !upper.contains("L1L2") && !upper.contains("L2")
}

fn is_l2_name(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper.contains("L2") && !upper.contains("L1L2")
}

/// A two-device fleet with unambiguous L1/L2 names is ordered (L1, L2).
fn reorder_pair(devices: &mut [String]) {
    if devices.len() == 2 && is_l2_name(&devices[0]) && is_l1_name(&devices[1]) {
        devices.swap(0, 1);
    }
}

#[cfg(test)]
mod name_tests {
    use super::*;

    #[test]
    fn l1_l2_names_are_disjoint() {
        assert!(is_l1_name("/dev/ttyUSB_AMPL1"));
        assert!(!is_l1_name("/dev/ttyUSB_AMPL2"));
        assert!(!is_l1_name("/dev/ttyUSB_AMPL1L2"));
        assert!(is_l2_name("/dev/ttyUSB_AMPL2"));
        assert!(!is_l2_name("/dev/ttyUSB_AMPL1L2"));
        assert!(!is_l2_name("/dev/ttyUSB_AMPL1"));
    }

    #[test]
    fn swapped_pair_is_reordered() {
        let mut devices = vec!["/dev/ttyUSB_AMPL2".to_string(), "/dev/ttyUSB_AMPL1".to_string()];
        reorder_pair(&mut devices);
        assert_eq!(devices[0], "/dev/ttyUSB_AMPL1");
        let mut unnamed = vec!["/dev/ttyUSB_AMP1".to_string(), "/dev/ttyUSB_AMP2".to_string()];
        reorder_pair(&mut unnamed);
        assert_eq!(unnamed[0], "/dev/ttyUSB_AMP1");
    }
}
