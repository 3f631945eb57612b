//! wavetuner_hardware: amplifier-fleet and generator backends behind
//! `wavetuner_traits`.
//!
//! Features:
//! - `hardware`: enable the real serial-port fleet (`SerialFleet`).
//! - (default) no `hardware` feature: a deterministic amplifier simulator
//!   (`SimFleet`) satisfies the same trait, so everything above this crate
//!   builds and tests on machines without amplifiers attached.
//!
//! The generator subprocess supervisor (`ScriptRunner`) is always available.

pub mod error;
pub mod framing;
pub mod runaway;
pub mod script;

#[cfg(not(feature = "hardware"))]
pub mod sim;

#[cfg(feature = "hardware")]
pub mod serial;

pub use script::ScriptRunner;

#[cfg(not(feature = "hardware"))]
pub use sim::SimFleet;

#[cfg(feature = "hardware")]
pub use serial::SerialFleet;
