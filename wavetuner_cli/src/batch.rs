//! Batch iteration: classify scripts, tune each in turn.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::unbounded;
use tracing::{info, warn};
use wavetuner_config::Config;
use wavetuner_core::{AmpModel, Critical, Logger, Tuner, TuningCfg, WaveformJob};
use wavetuner_hardware::ScriptRunner;

/// Pause between files so the amplifiers settle back to idle.
const INTER_FILE_PAUSE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    L1Only,
    L2Only,
    Dual,
    All,
}

impl Category {
    pub fn from_choice(choice: u8) -> Option<Self> {
        match choice {
            1 => Some(Category::L1Only),
            2 => Some(Category::L2Only),
            3 => Some(Category::Dual),
            4 => Some(Category::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    L1,
    L2,
    Dual,
}

/// Classify a script by basename prefix; `L1_L2_` is checked first because
/// it also starts with `L1_`.
fn classify(name: &str) -> Option<Kind> {
    if name.starts_with("L1_L2_") {
        Some(Kind::Dual)
    } else if name.starts_with("L1_") {
        Some(Kind::L1)
    } else if name.starts_with("L2_") {
        Some(Kind::L2)
    } else {
        None
    }
}

fn matches_category(kind: Kind, category: Category) -> bool {
    match category {
        Category::L1Only => kind == Kind::L1,
        Category::L2Only => kind == Kind::L2,
        Category::Dual => kind == Kind::Dual,
        Category::All => true,
    }
}

/// Collect the scripts to tune, sorted by name. Files whose name contains a
/// configured exclusion substring are skipped.
pub fn collect_scripts(
    dir: &Path,
    category: Category,
    exclusions: &[String],
) -> eyre::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| eyre::eyre!("cannot read directory {}: {e}", dir.display()))?;
    let mut scripts: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if exclusions.iter().any(|ex| !ex.is_empty() && name.contains(ex)) {
                info!(file = %name, "skipping excluded waveform");
                return false;
            }
            classify(&name).is_some_and(|kind| matches_category(kind, category))
        })
        .collect();
    scripts.sort();
    Ok(scripts)
}

#[derive(Debug, Clone, Copy)]
pub struct BatchParams {
    pub model: AmpModel,
    pub target_min: f64,
    pub target_max: f64,
    pub critical: Critical,
}

fn tuning_cfg(cfg: &Config) -> TuningCfg {
    TuningCfg {
        gain_min: cfg.gain.min,
        gain_max: cfg.gain.max,
        fault_retry_limit: cfg.faults.retry_limit,
        alc_range_limit: cfg.faults.alc_range_limit,
        prompt_timeout_ms: cfg.generator.prompt_timeout_ms,
    }
}

/// Tune each script in turn. Per-file failures are logged and the batch
/// moves on; only the count of failures is reported back.
pub fn run_batch(
    scripts: &[PathBuf],
    params: BatchParams,
    cfg: &Config,
    logger: Arc<dyn Logger>,
) -> usize {
    let mut failures = 0usize;
    for (idx, script) in scripts.iter().enumerate() {
        let job = WaveformJob::new(
            script.clone(),
            params.model,
            params.target_min,
            params.target_max,
            params.critical,
        );
        info!(file = %job.file_name(), "tuning waveform");
        match tune_one(job, cfg, Arc::clone(&logger)) {
            Ok(report) => {
                info!(
                    final_min = report.final_min,
                    final_max = report.final_max,
                    "waveform tuned"
                );
            }
            Err(e) => {
                failures += 1;
                warn!(file = %script.display(), error = %e, "tuning failed; continuing with next file");
            }
        }
        if idx + 1 < scripts.len() {
            std::thread::sleep(INTER_FILE_PAUSE);
        }
    }
    failures
}

fn tune_one(
    job: WaveformJob,
    cfg: &Config,
    logger: Arc<dyn Logger>,
) -> eyre::Result<wavetuner_core::TuneReport> {
    let (amp_tx, amp_rx) = unbounded();
    let (gen_tx, gen_rx) = unbounded();

    let generator = ScriptRunner::new(job.script_path.clone(), gen_tx);
    let tuner = Tuner::builder()
        .with_bus(make_fleet(amp_tx))
        .with_waveform(generator)
        .with_job(job)
        .with_logger(logger)
        .with_cfg(tuning_cfg(cfg))
        .build();
    tuner.run(amp_rx, gen_rx)
}

#[cfg(feature = "hardware")]
fn make_fleet(
    events: crossbeam_channel::Sender<wavetuner_traits::AmpEvent>,
) -> wavetuner_hardware::SerialFleet {
    wavetuner_hardware::SerialFleet::new(events)
}

#[cfg(not(feature = "hardware"))]
fn make_fleet(
    events: crossbeam_channel::Sender<wavetuner_traits::AmpEvent>,
) -> wavetuner_hardware::SimFleet {
    wavetuner_hardware::SimFleet::new(events)
}
