//! Low Frequency Oscillator (LFO) concepts, at control rate.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running far below audio rate. Here it runs at the
control rate too: one phase step per tick, one output value per tick.

Vocabulary
----------

  control-rate    Frequencies well below human hearing: ~0.05 Hz to ~20 Hz.
                  These oscillators move parameters over time.

  phase           Position within one cycle, always in [0, 1).

  wrap            The tick on which phase passes 1.0 and starts over. The LFO
                  node turns every wrap into a trigger, so an LFO doubles as a
                  clock for Sample & Hold or Random.

  unipolar        Output is only positive: 0.0 to 1.0. Modulation signals are
                  unipolar by construction.


Rate Mapping
------------

A 0..1 control maps to Hz exponentially, because equal steps in rate are heard
as equal ratios, not equal differences:

    hz = min × (max / min)^control

    control   0.0    0.25   0.5    0.75   1.0
    hz        0.05   0.22   1.0    4.47   20.0


Aliasing at Control Rate
------------------------

A control rate of 500 ticks/s represents LFOs up to 250 Hz before phase steps
exceed half a cycle. The 20 Hz ceiling keeps at least 25 ticks per cycle, so
even the square shape still reads as a square.


Sync and Phase
--------------

FREE-RUNNING: phase carries over from note to note.
SYNCED:       gate resets phase to zero, so every note hears the same shape.
*/

use crate::dsp::modulation::exponential_map;

/// Slowest LFO rate in Hz (control 0.0).
pub const LFO_MIN_HZ: f32 = 0.05;
/// Fastest LFO rate in Hz (control 1.0).
pub const LFO_MAX_HZ: f32 = 20.0;

/// Map a 0..1 rate control to Hz.
#[inline]
pub fn rate_to_hz(control: f32) -> f32 {
    exponential_map(control, LFO_MIN_HZ, LFO_MAX_HZ)
}

/// Phase accumulator advanced once per control tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phasor {
    phase: f32,
}

impl Phasor {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Advance by `hz × dt` cycles. Returns true if the phase wrapped.
    #[inline]
    pub fn advance(&mut self, hz: f32, dt: f32) -> bool {
        let step = hz * dt;
        if !step.is_finite() || step <= 0.0 {
            return false;
        }
        self.phase += step;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
