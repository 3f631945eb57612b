//! wavetuner: interactive driver for batch waveform tuning.

mod batch;
mod cli;
mod error_fmt;
mod prompts;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use eyre::WrapErr;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wavetuner_config::Config;
use wavetuner_core::{AmpModel, Critical, GainFileEditor, WaveLogger};

use crate::batch::{BatchParams, Category};
use crate::cli::{Cli, Commands, FILE_GUARD};

fn main() -> eyre::Result<()> {
    if let Err(e) = real_main() {
        eprintln!("{}", error_fmt::humanize(&e));
        std::process::exit(2);
    }
    Ok(())
}

fn real_main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let cfg = load_config(&cli.config)?;
    init_tracing(
        cli.json,
        cfg.logging.level.as_deref().unwrap_or(&cli.log_level),
        cfg.logging.file.as_deref(),
    );

    match cli.cmd {
        Commands::Tune {
            dir,
            category,
            model,
            min,
            max,
            critical,
        } => {
            let dir = prompts::resolve(
                dir,
                "Enter the directory containing waveform scripts: ",
                |s| {
                    let p = std::path::PathBuf::from(s);
                    if s.is_empty() {
                        Err("directory cannot be empty".to_string())
                    } else if !p.is_dir() {
                        Err(format!("'{s}' is not a directory"))
                    } else {
                        Ok(p)
                    }
                },
            )?;
            let choice = prompts::resolve(
                category,
                "Choose category (1=L1-only, 2=L2-only, 3=L1_L2, 4=all): ",
                prompts::parse_category,
            )?;
            let category = Category::from_choice(choice)
                .ok_or_else(|| eyre::eyre!("invalid category choice {choice}"))?;
            let model = prompts::resolve(
                model.map(|s| AmpModel::from_str(&s)).transpose().map_err(|e| eyre::eyre!(e))?,
                "Enter the amp model (x300 or N321): ",
                |s| AmpModel::from_str(s),
            )?;
            let target_min = prompts::resolve(
                min,
                "Enter the target minimum power (dBm): ",
                prompts::parse_power,
            )?;
            let target_max = prompts::resolve(
                max,
                "Enter the target maximum power (dBm): ",
                prompts::parse_power,
            )?;
            let critical = prompts::resolve(
                critical.map(|s| Critical::from_str(&s)).transpose().map_err(|e| eyre::eyre!(e))?,
                "Enter the critical end (HIGH or LOW): ",
                |s| Critical::from_str(s),
            )?;

            let scripts = batch::collect_scripts(&dir, category, &cfg.driver.exclusions)?;
            if scripts.is_empty() {
                info!(dir = %dir.display(), "no waveform scripts matched the selection");
                println!("No waveform scripts matched the selection.");
                return Ok(());
            }
            info!(count = scripts.len(), "waveform scripts selected");

            let logger = Arc::new(
                WaveLogger::create_in(Path::new(".")).wrap_err("open wave log")?,
            );
            info!(path = %logger.path().display(), "wave log open");

            let params = BatchParams {
                model,
                target_min,
                target_max,
                critical,
            };
            let failures = batch::run_batch(&scripts, params, &cfg, logger);
            println!(
                "Processed {} waveform(s), {} failure(s).",
                scripts.len(),
                failures
            );
            Ok(())
        }

        Commands::EditGain {
            file,
            channel,
            gain,
        } => {
            let file = prompts::resolve(
                file,
                "Enter the full path to the waveform script you wish to edit: ",
                |s| {
                    if s.is_empty() {
                        Err("filename cannot be empty".to_string())
                    } else {
                        Ok(std::path::PathBuf::from(s))
                    }
                },
            )?;
            let channel = prompts::resolve(
                channel.map(|s| prompts::parse_channel(&s)).transpose().map_err(|e| eyre::eyre!(e))?,
                "Enter the channel to edit (L1 or L2): ",
                prompts::parse_channel,
            )?;
            let gain = prompts::resolve(
                gain,
                &format!(
                    "Enter the gain value (integer between {} and {}): ",
                    cfg.gain.min, cfg.gain.max
                ),
                |s| {
                    s.parse::<i32>()
                        .map_err(|_| format!("invalid gain value '{s}'"))
                },
            )?;

            let editor = GainFileEditor::with_bounds(cfg.gain.min, cfg.gain.max);
            editor
                .edit_gain(&file, gain, channel)
                .map_err(eyre::Report::new)?;
            println!("Successfully updated gain value in file: {}", file.display());
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> eyre::Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found; using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = wavetuner_config::load_toml(&text)
        .wrap_err_with(|| format!("parse config {}", path.display()))?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

/// Initialize tracing once for the whole app.
fn init_tracing(json: bool, level: &str, file: Option<&str>) {
    // Prefer RUST_LOG if set; otherwise use the configured level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    fn make_file_writer(path: &str) -> tracing_appender::non_blocking::NonBlocking {
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let appender = tracing_appender::rolling::never(".", path);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        writer
    }

    if json {
        let console = fmt::layer().json().with_target(false);
        match file {
            Some(path) => {
                let file_l = fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(make_file_writer(path));
                registry.with(console).with(file_l).init()
            }
            None => registry.with(console).init(),
        }
    } else {
        let console = fmt::layer().pretty().with_target(false);
        match file {
            Some(path) => {
                let file_l = fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(make_file_writer(path));
                registry.with(console).with(file_l).init()
            }
            None => registry.with(console).init(),
        }
    }
}
