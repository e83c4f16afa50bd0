//! Host-facing harness: configuration, control clock and the voice pool.
//!
//! The engine owns no audio. A host advances it by audio frames and reads
//! spectral snapshots back; rendering them into samples is the host's job.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    io::SpectralSnapshot,
    patch::Patch,
    synth::{MessageReceiver, PolySynth, SynthMessage, VoiceFactory},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Audio sample rate in Hz.
    pub sample_rate: f32,
    /// Audio frames per control tick.
    pub control_period: usize,
    pub max_voices: usize,
    /// Tick voices on the rayon pool.
    pub parallel: bool,
    /// Seeds the per-note voice RNG seeds.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            control_period: 96,
            max_voices: 16,
            parallel: true,
            seed: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_control_period(mut self, frames: usize) -> Self {
        self.control_period = frames;
        self
    }

    pub fn with_max_voices(mut self, voices: usize) -> Self {
        self.max_voices = voices;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Control ticks per second.
    pub fn control_rate(&self) -> f32 {
        self.sample_rate / self.control_period.max(1) as f32
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.control_period == 0 {
            return Err(Error::InvalidConfig(
                "control period must be at least one frame".into(),
            ));
        }
        if self.max_voices == 0 {
            return Err(Error::InvalidConfig(
                "at least one voice is required".into(),
            ));
        }
        Ok(())
    }
}

/// Converts audio frames into control ticks at a fixed period.
///
/// Frames left over from one call carry into the next, so the tick count
/// never drifts regardless of how the host sizes its blocks.
#[derive(Debug, Clone)]
pub struct ControlClock {
    period: usize,
    pending: usize,
    ticks: u64,
}

impl ControlClock {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            pending: 0,
            ticks: 0,
        }
    }

    /// Account for `frames` audio frames; returns how many ticks fall due.
    pub fn advance(&mut self, frames: usize) -> usize {
        let total = self.pending + frames;
        let due = total / self.period;
        self.pending = total % self.period;
        self.ticks += due as u64;
        due
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Ticks elapsed since creation or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames until the next tick falls due.
    pub fn frames_until_tick(&self) -> usize {
        self.period - self.pending
    }

    pub fn reset(&mut self) {
        self.pending = 0;
        self.ticks = 0;
    }
}

pub struct Engine {
    config: EngineConfig,
    clock: ControlClock,
    synth: PolySynth,
}

impl Engine {
    pub fn new(patch: &Patch, config: EngineConfig) -> Result<Self> {
        Self::with_factory(patch, config)
    }

    pub fn with_factory(factory: &impl VoiceFactory, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let synth = PolySynth::new(
            factory,
            config.control_rate(),
            config.max_voices,
            config.seed,
            config.parallel,
        );
        info!(
            voices = config.max_voices,
            control_rate = config.control_rate(),
            parallel = config.parallel,
            "engine ready"
        );

        Ok(Self {
            clock: ControlClock::new(config.control_period),
            config,
            synth,
        })
    }

    pub fn handle(&mut self, msg: SynthMessage) -> Result<()> {
        self.synth.handle(msg)
    }

    /// Drain every pending message. Notes that find no voice are dropped.
    pub fn poll(&mut self, rx: &mut impl MessageReceiver) -> usize {
        let mut handled = 0;
        while let Some(msg) = rx.pop() {
            if let Err(err) = self.synth.handle(msg) {
                warn!(%err, ?msg, "note dropped");
            }
            handled += 1;
        }
        handled
    }

    /// Run one control tick for every sounding voice.
    pub fn tick(&mut self) {
        self.synth.tick();
    }

    /// Advance by `frames` audio frames, running the ticks that fall due.
    pub fn advance(&mut self, frames: usize) -> usize {
        let due = self.clock.advance(frames);
        for _ in 0..due {
            self.synth.tick();
        }
        due
    }

    pub fn snapshots(&self) -> Vec<SpectralSnapshot> {
        self.synth.snapshots()
    }

    pub fn active_voices(&self) -> usize {
        self.synth.active_voices()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &ControlClock {
        &self.clock
    }

    pub fn synth(&self) -> &PolySynth {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut PolySynth {
        &mut self.synth
    }
}
