//! Single-threaded cooperative event loop around a [`TuningController`].
//!
//! One `select!` over the amplifier stream, the generator stream, and the
//! controller's single pending timer. Events from one link arrive in order;
//! no transition re-enters another.

use crossbeam_channel::{after, never, select, Receiver};
use wavetuner_traits::{AmpBus, AmpEvent, GenEvent, Waveform};

use crate::controller::TuningController;
use crate::error::{Report, Result};
use crate::status::TuningStatus;

/// Final measurements of a finished run.
#[derive(Debug, Clone, Copy)]
pub struct TuneReport {
    pub final_min: f64,
    pub final_max: f64,
}

/// Drive `controller` until it finishes or fails.
///
/// Returns the tuned endpoints on success; a failed run surfaces its
/// [`crate::error::TunerError`] as the report's root cause.
pub fn run<B: AmpBus, W: Waveform>(
    mut controller: TuningController<B, W>,
    amp_events: Receiver<AmpEvent>,
    gen_events: Receiver<GenEvent>,
) -> Result<TuneReport> {
    let mut status = controller.start();
    let mut timer = never();
    let mut armed_generation = controller.schedule_generation();
    let mut timer_stale = true;

    loop {
        match status {
            TuningStatus::Running => {}
            TuningStatus::Finished => {
                return Ok(TuneReport {
                    final_min: controller.final_min(),
                    final_max: controller.final_max(),
                });
            }
            TuningStatus::Failed(e) => return Err(Report::new(e)),
        }

        if timer_stale || controller.schedule_generation() != armed_generation {
            armed_generation = controller.schedule_generation();
            timer = match controller.pending_delay() {
                Some(delay) => after(delay),
                None => never(),
            };
            timer_stale = false;
        }

        select! {
            recv(amp_events) -> event => {
                status = match event {
                    Ok(AmpEvent::Line { device, line }) => controller.on_amp_line(&device, &line),
                    Ok(AmpEvent::Fault { device, line }) => controller.on_amp_fault(&device, &line),
                    Err(_) => return Err(eyre::eyre!("amplifier event channel closed")),
                };
            }
            recv(gen_events) -> event => {
                status = match event {
                    Ok(GenEvent::StdoutChunk(chunk)) => controller.on_generator_chunk(&chunk),
                    Ok(other) => {
                        tracing::trace!(event = ?other, "generator event");
                        TuningStatus::Running
                    }
                    Err(_) => return Err(eyre::eyre!("generator event channel closed")),
                };
            }
            recv(timer) -> _ => {
                timer_stale = true;
                status = controller.fire_timer();
            }
        }
    }
}
