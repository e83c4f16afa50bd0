use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    dsp::{modulation::ModSignal, partials::PartialBuffer},
    graph::node::{midi_note_to_freq, NodeIo, NodeState, Processor, VoiceCtx},
    io::SpectralSnapshot,
    patch::{Patch, Topology},
};

/// Peak amplitude under which a released voice counts as silent (−120 dB).
pub const SILENCE_THRESHOLD: f32 = 1.0e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Gated
    Releasing, // Key released, waiting for silence or envelope end
}

/// What the allocator hands a voice at note start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteParams {
    /// Fundamental in Hz.
    pub pitch: f32,
    /// 0.0 - 1.0
    pub velocity: f32,
    pub channel: u8,
    /// Seeds the voice's shared RNG when the voice starts fresh.
    pub seed: u64,
}

impl NoteParams {
    pub fn from_midi(note: u8, velocity: u8, channel: u8, seed: u64) -> Self {
        Self {
            pitch: midi_note_to_freq(note),
            velocity: velocity as f32 / 127.0,
            channel,
            seed,
        }
    }
}

/// One polyphonic instance of a patch.
///
/// Owns a private copy of every node, their output buffers and the voice RNG.
/// The topology (evaluation order and wiring) is shared with every other
/// voice of the same patch.
pub struct Voice {
    topology: Arc<Topology>,
    nodes: Vec<Box<dyn Processor>>,
    states: Vec<NodeState>,
    ctx: VoiceCtx,
    rng: StdRng,
    state: VoiceState,
}

impl Voice {
    pub fn new(patch: &Patch, control_rate: f32) -> Self {
        let topology = Arc::clone(patch.topology());
        let nodes = patch.instantiate();
        let states = nodes
            .iter()
            .map(|node| NodeState::new(node.ports(), topology.silence()))
            .collect();

        Self {
            topology,
            nodes,
            states,
            ctx: VoiceCtx::new(control_rate),
            rng: StdRng::seed_from_u64(0),
            state: VoiceState::Free,
        }
    }

    /// Return every node and buffer to its initial state.
    pub fn reset(&mut self) {
        self.ctx.tick = 0;
        self.ctx.gated = false;
        for state in self.states.iter_mut() {
            state.reset(self.topology.silence());
        }
        for node in self.nodes.iter_mut() {
            node.reset(&self.ctx);
        }
    }

    /// Start a note. A `fresh` start reseeds the RNG and resets the graph
    /// first; otherwise the note is re-gated over the running state (legato).
    pub fn note_on(&mut self, params: NoteParams, fresh: bool) {
        if fresh || self.state == VoiceState::Free {
            self.rng = StdRng::seed_from_u64(params.seed);
            self.reset();
        }

        self.ctx.pitch = params.pitch;
        self.ctx.velocity = params.velocity;
        self.ctx.channel = params.channel;
        self.ctx.release_velocity = 0.0;
        self.ctx.aftertouch = 0.0;
        self.ctx.note_counter += 1;
        self.ctx.gated = true;
        self.state = VoiceState::Active;

        for node in self.nodes.iter_mut() {
            node.gate(&self.ctx);
        }
    }

    pub fn note_off(&mut self, release_velocity: f32) {
        if self.state != VoiceState::Active {
            return;
        }
        self.state = VoiceState::Releasing;
        self.ctx.release_velocity = release_velocity.clamp(0.0, 1.0);
        self.ctx.gated = false;

        for node in self.nodes.iter_mut() {
            node.release(&self.ctx);
        }
    }

    pub fn set_aftertouch(&mut self, pressure: f32) {
        self.ctx.aftertouch = pressure.clamp(0.0, 1.0);
    }

    /// Evaluate every node once, in topological order.
    pub fn tick(&mut self) {
        if self.state == VoiceState::Free {
            return;
        }
        self.ctx.tick += 1;

        let topology = &self.topology;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            let (done, rest) = self.states.split_at_mut(i);
            let own = &mut rest[0];
            own.begin_tick();
            let mut io = NodeIo::new(
                &topology.wiring()[i],
                done,
                own,
                topology.silence(),
                &self.ctx,
                &mut self.rng,
            );
            node.go(&mut io);
        }

        // If voice is releasing and has gone quiet, mark as free
        if self.is_finished() {
            self.free();
        }
    }

    /// The output node's buffer for the last tick.
    pub fn output(&self) -> &Arc<PartialBuffer> {
        self.states[self.topology.output()].unit(0)
    }

    /// Current value of an exported modulation channel.
    pub fn exported(&self, name: &str) -> Option<ModSignal> {
        self.topology
            .exports()
            .iter()
            .find(|export| export.name == name)
            .map(|export| self.states[export.node].modulation(export.channel))
    }

    pub fn snapshot(&self) -> SpectralSnapshot {
        SpectralSnapshot {
            pitch: self.ctx.pitch,
            channel: self.ctx.channel,
            partials: Arc::clone(self.output()),
            exports: self
                .topology
                .exports()
                .iter()
                .map(|export| {
                    (
                        export.name.clone(),
                        self.states[export.node].modulation(export.channel),
                    )
                })
                .collect(),
        }
    }

    /// Released and done sounding.
    ///
    /// Nodes that report activity (envelopes) decide on their own: the voice
    /// ends when every one of them has ended, even through a silent stretch
    /// such as a tremolo trough. A patch without any falls back to silence.
    pub fn is_finished(&self) -> bool {
        if self.state != VoiceState::Releasing {
            return false;
        }
        match self.envelopes_finished() {
            Some(finished) => finished,
            None => self.output().is_silent(SILENCE_THRESHOLD),
        }
    }

    /// `None` when no node reports an activity state.
    fn envelopes_finished(&self) -> Option<bool> {
        let mut tracked = None;
        for active in self.nodes.iter().filter_map(|node| node.is_active()) {
            if active {
                return Some(false);
            }
            tracked = Some(true);
        }
        tracked
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.ctx.gated = false;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn ctx(&self) -> &VoiceCtx {
        &self.ctx
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// Output state of a node by id.
    pub fn node_state(&self, id: &str) -> Option<&NodeState> {
        self.topology.position(id).map(|i| &self.states[i])
    }
}
