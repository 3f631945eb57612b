//! Type-state builder for a boxed [`Tuner`].
//!
//! The builder enforces at compile time that the amplifier bus, the
//! generator, and the job are provided before `build()` is available.

use std::marker::PhantomData;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use wavetuner_traits::{AmpBus, AmpEvent, GenEvent, Waveform};

use crate::config::TuningCfg;
use crate::controller::TuningController;
use crate::error::Result;
use crate::job::WaveformJob;
use crate::logger::{Logger, TraceLogger};
use crate::runner::{self, TuneReport};
use crate::status::TuningStatus;

/// Dynamic (boxed) tuner preserving the event-handler API via composition.
pub struct Tuner {
    inner: TuningController<Box<dyn AmpBus>, Box<dyn Waveform>>,
}

impl Tuner {
    pub fn builder() -> TunerBuilder<Missing, Missing, Missing> {
        TunerBuilder::default()
    }

    pub fn start(&mut self) -> TuningStatus {
        self.inner.start()
    }

    pub fn on_amp_line(&mut self, device: &str, line: &str) -> TuningStatus {
        self.inner.on_amp_line(device, line)
    }

    pub fn on_amp_fault(&mut self, device: &str, line: &str) -> TuningStatus {
        self.inner.on_amp_fault(device, line)
    }

    pub fn on_generator_chunk(&mut self, chunk: &str) -> TuningStatus {
        self.inner.on_generator_chunk(chunk)
    }

    pub fn fire_timer(&mut self) -> TuningStatus {
        self.inner.fire_timer()
    }

    /// Drive the run to completion on the calling thread.
    pub fn run(
        self,
        amp_events: Receiver<AmpEvent>,
        gen_events: Receiver<GenEvent>,
    ) -> Result<TuneReport> {
        runner::run(self.inner, amp_events, gen_events)
    }
}

// ── Type-state markers ───────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

pub struct TunerBuilder<B, W, J> {
    bus: Option<Box<dyn AmpBus>>,
    waveform: Option<Box<dyn Waveform>>,
    job: Option<WaveformJob>,
    logger: Option<Arc<dyn Logger>>,
    cfg: Option<TuningCfg>,
    _b: PhantomData<B>,
    _w: PhantomData<W>,
    _j: PhantomData<J>,
}

impl Default for TunerBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            bus: None,
            waveform: None,
            job: None,
            logger: None,
            cfg: None,
            _b: PhantomData,
            _w: PhantomData,
            _j: PhantomData,
        }
    }
}

impl<B, W, J> TunerBuilder<B, W, J> {
    fn retag<B2, W2, J2>(self) -> TunerBuilder<B2, W2, J2> {
        TunerBuilder {
            bus: self.bus,
            waveform: self.waveform,
            job: self.job,
            logger: self.logger,
            cfg: self.cfg,
            _b: PhantomData,
            _w: PhantomData,
            _j: PhantomData,
        }
    }

    pub fn with_bus(mut self, bus: impl AmpBus + 'static) -> TunerBuilder<Set, W, J> {
        self.bus = Some(Box::new(bus));
        self.retag()
    }

    pub fn with_waveform(mut self, waveform: impl Waveform + 'static) -> TunerBuilder<B, Set, J> {
        self.waveform = Some(Box::new(waveform));
        self.retag()
    }

    pub fn with_job(mut self, job: WaveformJob) -> TunerBuilder<B, W, Set> {
        self.job = Some(job);
        self.retag()
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_cfg(mut self, cfg: TuningCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }
}

impl TunerBuilder<Set, Set, Set> {
    /// All required parts are present; assembly cannot fail.
    pub fn build(self) -> Tuner {
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(TraceLogger) as Arc<dyn Logger>);
        let cfg = self.cfg.unwrap_or_default();
        // The Set markers guarantee these are present.
        let (Some(bus), Some(waveform), Some(job)) = (self.bus, self.waveform, self.job) else {
            unreachable!("type-state builder enforces bus, waveform, and job");
        };
        Tuner {
            inner: TuningController::new(bus, waveform, logger, cfg, job),
        }
    }
}
