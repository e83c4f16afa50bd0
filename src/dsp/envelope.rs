use crate::MIN_TIME;

/*
Control-Rate ADSR Envelope
==========================

A linear ADSR evaluated once per control tick rather than once per sample.
Its output is a modulation value, not an audio gain: it drives Amplify gains,
Smooth amounts, anything wired to it.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The note on/off signal. Gate high (note_on) triggers Attack.
              Gate low (note_off) triggers Release from wherever we are.

  dt          Seconds per control tick (1 / control rate). Replaces the
              sample rate as the unit of time.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Ticks
        Attack Decay  Sustain  Release


Time to Increment
-----------------

    increment = target_change × dt / time_seconds

Example: Attack of 0.1 seconds at 500 ticks/s
  - dt = 0.002 s, 50 ticks
  - increment = 1.0 × 0.002 / 0.1 = 0.02 per tick


Live Parameters
---------------

Stage times arrive every tick from modulation inputs, so they can move while
the envelope runs. Increments are recomputed per tick from the current values.
Release ramps from the level it started at, at a slope fixed by that level and
the current release time, and always lands exactly on 0.0.

The state machine is the usual one: note_off jumps to Release from ANY stage,
and Release always starts from the CURRENT level.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

/// Stage times in seconds and sustain level, read fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeState,
    level: f32,
    decay_start_level: f32,
    release_start_level: f32,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            stage: EnvelopeState::Idle,
            level: 0.0,
            decay_start_level: 1.0,
            release_start_level: 0.0,
        }
    }

    /// Gate high: start the attack phase from zero.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
    }

    /// Gate low: start the release phase from current level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle) {
            return;
        }
        self.release_start_level = self.level;
        self.stage = EnvelopeState::Release;
    }

    /// Back to idle at zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance by one tick of `dt` seconds. Returns true on the tick the
    /// release reaches zero.
    pub fn next_tick(&mut self, params: &AdsrParams, dt: f32) -> bool {
        let sustain = sanitize_level(params.sustain);

        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += dt / params.attack.max(MIN_TIME);

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.decay_start_level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let total_drop = self.decay_start_level - sustain;
                self.level -= total_drop * dt / params.decay.max(MIN_TIME);

                if self.level <= sustain {
                    self.level = sustain;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = sustain;
            }

            EnvelopeState::Release => {
                self.level -= self.release_start_level * dt / params.release.max(MIN_TIME);

                if self.level <= 0.0 || self.release_start_level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                    return true;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        false
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeState {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn sanitize_level(level: f32) -> f32 {
    if level.is_finite() {
        level.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
