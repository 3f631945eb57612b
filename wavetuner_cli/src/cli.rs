//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Keeps the non-blocking file writer alive for the process lifetime.
pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "wavetuner", version, about = "Automated RF waveform power tuning")]
pub struct Cli {
    /// Path to config TOML; a missing file falls back to built-in defaults
    #[arg(long, value_name = "FILE", default_value = "etc/wavetuner.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tune every matching waveform script in a directory.
    ///
    /// Anything not given as a flag is prompted for interactively.
    Tune {
        /// Directory containing generator scripts
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// 1=L1-only, 2=L2-only, 3=L1_L2, 4=all
        #[arg(long)]
        category: Option<u8>,

        /// Amp model: x300 or N321
        #[arg(long)]
        model: Option<String>,

        /// Target minimum power, dBm
        #[arg(long)]
        min: Option<f64>,

        /// Target maximum power, dBm
        #[arg(long)]
        max: Option<f64>,

        /// Which end is regulated tightly: HIGH or LOW
        #[arg(long)]
        critical: Option<String>,
    },

    /// Rewrite the gain argument of one generator script and exit.
    EditGain {
        /// The script to edit
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Channel to edit: L1 or L2
        #[arg(long)]
        channel: Option<String>,

        /// Integer gain within the configured bounds
        #[arg(long, allow_hyphen_values = true)]
        gain: Option<i32>,
    },
}
