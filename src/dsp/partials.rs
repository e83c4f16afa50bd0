//! Fixed-size partial buffers and their invariants.

use crate::PARTIALS;

/*
Partial Buffers
===============

A partial buffer is one instantaneous additive spectrum: exactly PARTIALS
(frequency, amplitude, order) triples, stored as three parallel arrays.

Vocabulary
----------

  partial     One sine component of the spectrum. Frequency is expressed in
              cycles per fundamental (1.0 = the played pitch, 2.0 = octave),
              never in Hz. The renderer multiplies by the voice pitch.

  position    Where a partial currently sits in the arrays. Positions are kept
              ascending by frequency so renderers and effects can scan bands.

  order tag   A logical identity. Tags form a permutation of 0..PARTIALS and
              travel with their partial whenever the buffer is re-sorted.


Why Order Tags?
---------------

Effects like Smooth interpolate each partial toward its new value over several
ticks. If two partials cross in frequency, their positions swap:

    tick 0:   pos 0 = (1.00, tag 0)   pos 1 = (1.10, tag 1)
    tick 1:   pos 0 = (1.05, tag 1)   pos 1 = (1.20, tag 0)

Interpolating by position would blend tag 0's history into tag 1 and produce a
glitch. Interpolating by tag (state[order[i]]) keeps each partial's history
attached to the partial itself.


Constrain
---------

After any transform a unit node calls constrain(), which:

  1. zeroes degenerate frequencies (NaN, infinite, negative)
  2. zeroes degenerate amplitudes (NaN, infinite, negative)
  3. reports whether the ascending-frequency invariant was broken

The caller then picks simple_sort (few elements moved) or big_sort (large
moves), see dsp/sort.rs.
*/

#[derive(Clone, Debug, PartialEq)]
pub struct PartialBuffer {
    /// Frequencies in cycles per fundamental, ascending after constrain + sort.
    pub freq: [f32; PARTIALS],
    /// Linear amplitudes, never negative after constrain.
    pub amp: [f32; PARTIALS],
    /// Logical identity of each partial; a permutation of 0..PARTIALS.
    pub order: [usize; PARTIALS],
}

impl PartialBuffer {
    /// All partials at frequency 0 with zero amplitude. This is what an
    /// unwired unit input reads.
    pub fn silent() -> Self {
        Self {
            freq: [0.0; PARTIALS],
            amp: [0.0; PARTIALS],
            order: std::array::from_fn(|i| i),
        }
    }

    /// Harmonic series (1, 2, 3, ...) with zero amplitude.
    pub fn harmonic() -> Self {
        Self {
            freq: std::array::from_fn(|i| (i + 1) as f32),
            amp: [0.0; PARTIALS],
            order: std::array::from_fn(|i| i),
        }
    }

    pub const fn len(&self) -> usize {
        PARTIALS
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Clamp degenerate values and report whether a resort is needed.
    ///
    /// Calling it again without mutating the buffer in between changes nothing
    /// and returns the same answer.
    pub fn constrain(&mut self) -> bool {
        for f in self.freq.iter_mut() {
            if !f.is_finite() || *f < 0.0 {
                *f = 0.0;
            }
        }
        for a in self.amp.iter_mut() {
            if !a.is_finite() || *a < 0.0 {
                *a = 0.0;
            }
        }
        !self.is_sorted()
    }

    /// Upper bound pass for nodes whose math can overshoot full scale.
    pub fn bound_amplitudes(&mut self) {
        for a in self.amp.iter_mut() {
            if *a > 1.0 {
                *a = 1.0;
            }
        }
    }

    /// True if frequencies are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.freq.windows(2).all(|w| w[0] <= w[1])
    }

    /// True if the order tags form a permutation of 0..PARTIALS.
    pub fn has_valid_order(&self) -> bool {
        let mut seen = [false; PARTIALS];
        for &tag in &self.order {
            if tag >= PARTIALS || seen[tag] {
                return false;
            }
            seen[tag] = true;
        }
        true
    }

    /// Position currently holding logical partial `tag`.
    pub fn position_of(&self, tag: usize) -> Option<usize> {
        self.order.iter().position(|&o| o == tag)
    }

    /// Fill `positions[tag] = position` for every partial in one pass.
    pub fn positions_by_order(&self, positions: &mut [usize; PARTIALS]) {
        for (pos, &tag) in self.order.iter().enumerate() {
            positions[tag] = pos;
        }
    }

    pub fn peak_amplitude(&self) -> f32 {
        self.amp.iter().fold(0.0f32, |acc, &a| acc.max(a))
    }

    /// True if no partial is louder than `threshold`.
    pub fn is_silent(&self, threshold: f32) -> bool {
        self.amp.iter().all(|&a| a <= threshold)
    }

    /// Bit-for-bit equality, including the sign of zero and NaN payloads.
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self
                .freq
                .iter()
                .zip(other.freq.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
            && self
                .amp
                .iter()
                .zip(other.amp.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Default for PartialBuffer {
    fn default() -> Self {
        Self::silent()
    }
}
