//! Single-node harness for unit tests.

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    dsp::{modulation::ModSignal, partials::PartialBuffer, tables::SharedTables},
    graph::{
        kind::NodeKind,
        node::{NodeIo, NodeState, Processor, VoiceCtx},
        wiring::{ModSource, NodeWiring, UnitSource},
    },
};

pub(crate) const CONTROL_RATE: f32 = 500.0;

/// One node with a feeder per input port. Unit input `p` reads feeder `p`,
/// modulation input `m` reads feeder `units + m`.
pub(crate) struct Rig {
    pub node: Box<dyn Processor>,
    wiring: NodeWiring,
    feeders: Vec<NodeState>,
    pub state: NodeState,
    silence: Arc<PartialBuffer>,
    pub ctx: VoiceCtx,
    pub rng: StdRng,
}

impl Rig {
    pub fn new(kind: NodeKind) -> Self {
        Self::with_node(kind.create(&Arc::new(SharedTables::new())))
    }

    pub fn with_node(node: Box<dyn Processor>) -> Self {
        let ports = node.ports();
        let silence = Arc::new(PartialBuffer::silent());
        let units = ports.unit_inputs.len();

        let mut feeders = Vec::new();
        for _ in 0..units {
            feeders.push(feeder(&silence, 0.0));
        }
        for port in ports.mod_inputs {
            feeders.push(feeder(&silence, port.default));
        }

        let wiring = NodeWiring {
            units: (0..units)
                .map(|node| UnitSource::Node { node, channel: 0 })
                .collect(),
            mods: (0..ports.mod_inputs.len())
                .map(|m| ModSource::Node {
                    node: units + m,
                    channel: 0,
                })
                .collect(),
        };

        let state = NodeState::new(ports, &silence);
        let mut rig = Self {
            node,
            wiring,
            feeders,
            state,
            silence,
            ctx: VoiceCtx::from_freq(CONTROL_RATE, 110.0, 1.0),
            rng: StdRng::seed_from_u64(1),
        };
        rig.reset();
        rig
    }

    pub fn set_option(&mut self, index: usize, value: i32) -> &mut Self {
        if let Err(err) = self.node.set_option(index, value) {
            panic!("option {index} = {value} rejected: {err}");
        }
        self
    }

    pub fn set_unit(&mut self, port: usize, buffer: PartialBuffer) -> &mut Self {
        self.feeders[port].units[0] = Arc::new(buffer);
        self
    }

    pub fn input(&self, port: usize) -> &Arc<PartialBuffer> {
        &self.feeders[port].units[0]
    }

    pub fn set_mod(&mut self, port: usize, value: f32) -> &mut Self {
        let units = self.wiring.units.len();
        self.feeders[units + port].mods[0].set(value);
        self
    }

    /// Arm a trigger on a modulation input for the next tick.
    pub fn fire(&mut self, port: usize) -> &mut Self {
        let units = self.wiring.units.len();
        self.feeders[units + port].mods[0].triggered = true;
        self
    }

    pub fn reset(&mut self) {
        self.ctx.tick = 0;
        self.state.reset(&self.silence);
        self.node.reset(&self.ctx);
    }

    pub fn gate(&mut self) {
        self.ctx.gated = true;
        self.ctx.note_counter += 1;
        self.node.gate(&self.ctx);
    }

    pub fn release(&mut self) {
        self.ctx.gated = false;
        self.node.release(&self.ctx);
    }

    pub fn tick(&mut self) {
        self.ctx.tick += 1;
        self.state.begin_tick();
        let mut io = NodeIo::new(
            &self.wiring,
            &self.feeders,
            &mut self.state,
            &self.silence,
            &self.ctx,
            &mut self.rng,
        );
        self.node.go(&mut io);
        for feeder in self.feeders.iter_mut() {
            feeder.begin_tick();
        }
    }

    pub fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }

    pub fn out(&self, channel: usize) -> &Arc<PartialBuffer> {
        self.state.unit(channel)
    }

    pub fn mod_out(&self, channel: usize) -> ModSignal {
        self.state.modulation(channel)
    }
}

fn feeder(silence: &Arc<PartialBuffer>, value: f32) -> NodeState {
    NodeState {
        units: vec![Arc::clone(silence)],
        mods: vec![ModSignal::new(value)],
        reads: Vec::new(),
    }
}

/// Harmonic series with amplitudes 1/k.
pub(crate) fn sawtooth() -> PartialBuffer {
    let mut buf = PartialBuffer::harmonic();
    for (k, amp) in buf.amp.iter_mut().enumerate() {
        *amp = 1.0 / (k + 1) as f32;
    }
    buf
}
