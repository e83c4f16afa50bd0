use rand::Rng;

use crate::{
    dsp::random::SeededRng,
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, Options, Ports, Processor, VoiceCtx},
    },
};

pub const TRIGGER: usize = 0;
pub const SEED: usize = 1;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "Trigger",
            default: 0.0,
        },
        ModPort {
            name: "Seed",
            default: 0.0,
        },
    ],
    unit_outputs: &[],
    mod_outputs: &["Out"],
    options: &[],
};

/// Draws a uniform value on gate and on every trigger, forwarding the edge.
///
/// With Seed at 0 the draws come from the voice's shared generator; any other
/// Seed gives a private, reproducible sequence (see `dsp/random.rs`).
#[derive(Debug, Clone)]
pub struct RandomNode {
    options: Options,
    rng: SeededRng,
    pending: bool,
    value: f32,
}

impl RandomNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            rng: SeededRng::new(),
            pending: false,
            value: 0.0,
        }
    }
}

impl Default for RandomNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for RandomNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Random
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
        self.pending = false;
        self.value = 0.0;
    }

    fn gate(&mut self, _ctx: &VoiceCtx) {
        self.pending = true;
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let triggered = io.is_triggered(TRIGGER);
        if self.pending || triggered {
            self.pending = false;
            let seed = io.mod_in(SEED);
            self.value = self.rng.select(seed, io.shared_rng()).gen::<f32>();
            io.trigger(0);
        }
        io.set_mod(0, self.value);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::graph::testing::Rig;

    fn sequence(rig: &mut Rig, draws: usize) -> Vec<f32> {
        (0..draws)
            .map(|_| {
                rig.fire(TRIGGER);
                rig.tick();
                rig.mod_out(0).value
            })
            .collect()
    }

    #[test]
    fn draws_on_gate_and_trigger_only() {
        let mut rig = Rig::new(NodeKind::Random);
        rig.tick();
        assert_eq!(rig.mod_out(0).value, 0.0);

        rig.gate();
        rig.tick();
        let first = rig.mod_out(0).value;
        assert!(rig.mod_out(0).triggered);

        rig.tick();
        assert_eq!(rig.mod_out(0).value, first, "held without a trigger");

        rig.fire(TRIGGER);
        rig.tick();
        assert_ne!(rig.mod_out(0).value, first);
    }

    #[test]
    fn private_seed_ignores_shared_rng() {
        let mut a = Rig::new(NodeKind::Random);
        let mut b = Rig::new(NodeKind::Random);
        a.rng = StdRng::seed_from_u64(10);
        b.rng = StdRng::seed_from_u64(20);
        a.set_mod(SEED, 0.125);
        b.set_mod(SEED, 0.125);

        assert_eq!(sequence(&mut a, 16), sequence(&mut b, 16));
    }

    #[test]
    fn zero_seed_tracks_shared_rng() {
        let mut rig = Rig::new(NodeKind::Random);
        rig.rng = StdRng::seed_from_u64(5);
        let mut reference = StdRng::seed_from_u64(5);

        let drawn = sequence(&mut rig, 8);
        let expected: Vec<f32> = (0..8).map(|_| reference.gen::<f32>()).collect();

        assert_eq!(drawn, expected);
    }
}
