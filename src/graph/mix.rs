use std::sync::Arc;

use crate::{
    dsp::sort::{settle, SortStrategy, TagPool},
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor},
    },
    PARTIALS,
};

/*
Spectral Mixing
===============

Two spectra, three ways to combine them.

SUM and MAX work position by position. The output keeps A's frequencies and
A's order tags; only amplitudes combine:

    sum:   amp[i] = gain_a × A.amp[i] + gain_b × B.amp[i]
    max:   amp[i] = max(gain_a × A.amp[i], gain_b × B.amp[i])

Both are exact when A and B share a frequency grid (two harmonic sources, a
source and a processed copy of itself). With unrelated grids B's amplitudes
are re-homed onto A's frequencies, which is the point of a spectral crossfade.

    gains 0.5 / 0.5, sum   →   arithmetic mean of the two spectra

MERGE keeps both sets of frequencies. There are only PARTIALS slots, so each
side contributes its lower half: A's first P/2 partials, then B's first P/2.
The result interleaves in frequency, so it settles with big_sort.

    merge tags:   A's half → A's own tags
                  B's half → tags displaced from A's upper half, by rank of
                             B's tag (see TagPool)

A crossing inside either source leaves every partial with its tag.
*/

pub const A: usize = 0;
pub const B: usize = 1;
pub const GAIN_A: usize = 0;
pub const GAIN_B: usize = 1;
pub const MODE: usize = 0;

pub static PORTS: Ports = Ports {
    unit_inputs: &["A", "B"],
    mod_inputs: &[
        ModPort {
            name: "GainA",
            default: 1.0,
        },
        ModPort {
            name: "GainB",
            default: 1.0,
        },
    ],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[OptionSpec {
        name: "Mode",
        min: 0,
        max: 2,
        default: 0,
    }],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixMode {
    Sum,
    Max,
    Merge,
}

impl MixMode {
    pub fn from_option(value: i32) -> Self {
        match value {
            1 => Self::Max,
            2 => Self::Merge,
            _ => Self::Sum,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MixNode {
    options: Options,
    tags: TagPool,
}

impl MixNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            tags: TagPool::new(),
        }
    }
}

impl Default for MixNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for MixNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Mix
    }

    fn instantiate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let gain_a = io.mod_in(GAIN_A);
        let gain_b = io.mod_in(GAIN_B);
        let mode = MixMode::from_option(self.options.value(MODE));

        // A alone at unity: nothing to combine.
        if mode != MixMode::Merge && gain_a == 1.0 && gain_b == 0.0 {
            io.push_input(0, A);
            return;
        }

        let b = Arc::clone(io.unit_source(B));
        let out = io.copy_input(0, A);

        match mode {
            MixMode::Sum => {
                for (amp, &other) in out.amp.iter_mut().zip(b.amp.iter()) {
                    *amp = gain_a * *amp + gain_b * other;
                }
                out.bound_amplitudes();
            }
            MixMode::Max => {
                for (amp, &other) in out.amp.iter_mut().zip(b.amp.iter()) {
                    *amp = (gain_a * *amp).max(gain_b * other);
                }
            }
            MixMode::Merge => {
                const HALF: usize = PARTIALS / 2;
                self.tags.displace(&out.order, HALF);
                self.tags.rank_sources(&b.order[..HALF]);
                for k in 0..HALF {
                    out.amp[k] *= gain_a;
                    out.freq[HALF + k] = b.freq[k];
                    out.amp[HALF + k] = gain_b * b.amp[k];
                    out.order[HALF + k] = self.tags.tag(HALF, 0, HALF, k);
                }
                settle(out, SortStrategy::Big);
            }
        }
    }
}
