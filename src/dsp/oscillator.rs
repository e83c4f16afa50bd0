//! Waveform shapes, both as harmonic amplitude laws and as control-rate cycles.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
One Waveform, Two Views
=======================

An additive engine never renders a sawtooth sample by sample. It describes the
sawtooth by its harmonic recipe instead:

  Sine      fundamental only
  Saw       every harmonic n at 1/n
  Square    odd harmonics at 1/n
  Triangle  odd harmonics at 1/n², alternating sign (sign is irrelevant here,
            the renderer owns phase)

LFOs still need the time-domain view, evaluated once per control tick and
mapped to a unipolar [0, 1] output. Both views live on the same enum so a
patch option selects one shape for either purpose.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorWaveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
}

impl OscillatorWaveform {
    /// Decode a patch option value. Out-of-range values fall back to sine.
    pub fn from_option(value: i32) -> Self {
        match value {
            1 => Self::Saw,
            2 => Self::Square,
            3 => Self::Triangle,
            _ => Self::Sine,
        }
    }

    /// Amplitude of harmonic `n` (1-based) relative to the fundamental.
    #[inline]
    pub fn harmonic_amplitude(self, n: usize) -> f32 {
        if n == 0 {
            return 0.0;
        }
        let n_f = n as f32;
        match self {
            Self::Sine => {
                if n == 1 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Saw => 1.0 / n_f,
            Self::Square => {
                if n % 2 == 1 {
                    1.0 / n_f
                } else {
                    0.0
                }
            }
            Self::Triangle => {
                if n % 2 == 1 {
                    1.0 / (n_f * n_f)
                } else {
                    0.0
                }
            }
        }
    }

    /// Unipolar cycle value at `phase` in [0, 1).
    #[inline]
    pub fn cycle(self, phase: f32) -> f32 {
        let phase = phase.rem_euclid(1.0);
        match self {
            Self::Sine => 0.5 - 0.5 * (std::f32::consts::TAU * phase).cos(),
            Self::Saw => phase,
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Triangle => 1.0 - (2.0 * phase - 1.0).abs(),
        }
    }
}
