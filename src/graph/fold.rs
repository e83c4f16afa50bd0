use crate::{
    dsp::{
        modulation::exponential_map,
        sort::{settle, SortStrategy},
    },
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor},
    },
};

/*
Frequency Folding
=================

The spectral cousin of wavefolding: any partial above a cutoff is reflected
back below it instead of being removed.

The cutoff arrives as a 0..1 control and maps exponentially onto
FOLD_MIN_HZ ..= FOLD_MAX_HZ, then into the buffer's unit (cycles per
fundamental) through the voice pitch:

    limit = cutoff_hz / pitch_hz

FOLD_MIN_HZ doubles as a hard floor, so the limit can never reach zero and
the fold period never collapses.

Two transfer functions, both with period 2 × limit (fold) or limit (alias):

  FOLD (triangle)               ALIAS (sawtooth)

    out                           out
     L ┤   ╱╲    ╱╲                L ┤   ╱│  ╱│  ╱
       │  ╱  ╲  ╱  ╲                 │  ╱ │ ╱ │ ╱
       │ ╱    ╲╱    ╲                │ ╱  │╱  │╱
     0 └──────────────→ in         0 └──────────────→ in
          L   2L   3L                   L   2L   3L

Folded partials land anywhere below the cutoff, so the buffer is re-sorted
with big_sort. When nothing exceeds the limit the node pushes its input.
*/

pub const IN: usize = 0;
pub const CUTOFF: usize = 0;
pub const MODE: usize = 0;

/// Lowest cutoff in Hz; also the floor for degenerate controls.
pub const FOLD_MIN_HZ: f32 = 20.0;
/// Highest cutoff in Hz.
pub const FOLD_MAX_HZ: f32 = 20_000.0;

pub static PORTS: Ports = Ports {
    unit_inputs: &["In"],
    mod_inputs: &[ModPort {
        name: "Cutoff",
        default: 1.0,
    }],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[OptionSpec {
        name: "Mode",
        min: 0,
        max: 1,
        default: 0,
    }],
};

/// Map a 0..1 cutoff control to Hz.
#[inline]
pub fn cutoff_to_hz(control: f32) -> f32 {
    exponential_map(control, FOLD_MIN_HZ, FOLD_MAX_HZ)
}

/// Triangle fold of `freq` into `[0, limit]`.
#[inline]
pub fn fold(freq: f32, limit: f32) -> f32 {
    let m = freq.rem_euclid(2.0 * limit);
    if m <= limit {
        m
    } else {
        2.0 * limit - m
    }
}

/// Sawtooth wrap of `freq` into `[0, limit)`.
#[inline]
pub fn alias(freq: f32, limit: f32) -> f32 {
    freq.rem_euclid(limit)
}

#[derive(Debug, Clone)]
pub struct FoldNode {
    options: Options,
}

impl FoldNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
        }
    }
}

impl Default for FoldNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for FoldNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Fold
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
        let pitch = io.voice().pitch;
        // No pitch, no Hz scale to fold against.
        if pitch <= 0.0 || !pitch.is_finite() {
            io.push_input(0, IN);
            return;
        }

        let limit = cutoff_to_hz(io.mod_in(CUTOFF)) / pitch;
        if io.unit_in(IN).freq.iter().all(|&f| f <= limit) {
            io.push_input(0, IN);
            return;
        }

        let aliasing = self.options.value(MODE) == 1;
        let out = io.copy_input(0, IN);
        for f in out.freq.iter_mut() {
            if *f > limit {
                *f = if aliasing {
                    alias(*f, limit)
                } else {
                    fold(*f, limit)
                };
            }
        }
        settle(out, SortStrategy::Big);
    }
}
