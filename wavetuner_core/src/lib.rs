#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Core tuning logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent tuning engine. All hardware
//! interactions go through the `wavetuner_traits::AmpBus` and
//! `wavetuner_traits::Waveform` traits.
//!
//! ## Architecture
//!
//! - **Controller**: the multi-phase tuning state machine (`controller`)
//! - **Readings**: bounded per-device power buffers + stability predicates
//!   (`readings`)
//! - **Gain editing**: in-place rewrite of the script's gain argument
//!   (`gain_edit`)
//! - **Runner**: the cooperative event loop (`runner`)
//! - **Logging**: the timestamped tuned-result sink (`logger`)
//!
//! Measurements stay in dBm end to end; stability is always a property of
//! the last three readings of a device's buffer.

pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod gain_edit;
pub mod job;
pub mod logger;
pub mod readings;
pub mod runner;
pub mod state;
pub mod status;

pub use builder::{Tuner, TunerBuilder};
pub use config::TuningCfg;
pub use controller::TuningController;
pub use error::TunerError;
pub use gain_edit::{GainEditError, GainFileEditor};
pub use job::{channel_label, AmpModel, Critical, WaveformJob};
pub use logger::{Logger, TraceLogger, WaveLogger};
pub use readings::{parse_reading, ReadingBuffer, ALC_TOLERANCE, VVA_TOLERANCE};
pub use runner::TuneReport;
pub use state::TuningState;
pub use status::TuningStatus;
