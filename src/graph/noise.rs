use rand::Rng;

use crate::{
    dsp::{
        random::SeededRng,
        sort::{settle, SortStrategy},
    },
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, Options, Ports, Processor, VoiceCtx},
    },
    PARTIALS,
};

/*
Spectral Noise
==============

Random amplitudes on a harmonic grid, optionally smeared in frequency.

Every partial gets a uniform draw in [0, 1) scaled by 1/(k + 1) so the result
rolls off like a sawtooth on average, plus a jitter offset in [−1, 1) that
Jitter scales. A new set is drawn on the first tick after reset, on gate and
on every trigger; between draws the spectrum holds still.

With Jitter above 0.5 neighbouring partials can cross, so every tick ends with
an insertion sort. Tags are the harmonic index, so a partial keeps its tag
wherever jitter moves it.
*/

pub const LEVEL: usize = 0;
pub const JITTER: usize = 1;
pub const SEED: usize = 2;
pub const TRIGGER: usize = 3;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "Level",
            default: 1.0,
        },
        ModPort {
            name: "Jitter",
            default: 0.0,
        },
        ModPort {
            name: "Seed",
            default: 0.0,
        },
        ModPort {
            name: "Trigger",
            default: 0.0,
        },
    ],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[],
};

#[derive(Debug, Clone)]
pub struct NoiseNode {
    options: Options,
    rng: SeededRng,
    pending: bool,
    draws: [f32; PARTIALS],
    offsets: [f32; PARTIALS],
}

impl NoiseNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            rng: SeededRng::new(),
            pending: true,
            draws: [0.0; PARTIALS],
            offsets: [0.0; PARTIALS],
        }
    }
}

impl Default for NoiseNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for NoiseNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Noise
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

    fn reset(&mut self, _ctx: &VoiceCtx) {
        self.rng.reset();
        self.pending = true;
        self.draws = [0.0; PARTIALS];
        self.offsets = [0.0; PARTIALS];
    }

    fn gate(&mut self, _ctx: &VoiceCtx) {
        self.pending = true;
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let triggered = io.is_triggered(TRIGGER);
        if self.pending || triggered {
            self.pending = false;
            let seed = io.mod_in(SEED);
            let rng = self.rng.select(seed, io.shared_rng());
            for k in 0..PARTIALS {
                self.draws[k] = rng.gen::<f32>();
                self.offsets[k] = rng.gen_range(-1.0f32..1.0);
            }
        }

        let level = io.mod_in(LEVEL);
        let jitter = io.mod_in(JITTER);
        let out = io.output_mut(0);
        for k in 0..PARTIALS {
            out.freq[k] = (k + 1) as f32 + jitter * self.offsets[k];
            out.amp[k] = level * self.draws[k] / (k + 1) as f32;
            out.order[k] = k;
        }
        settle(out, SortStrategy::Simple);
    }
}
