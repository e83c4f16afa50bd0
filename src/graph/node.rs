use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{
    dsp::{modulation::ModSignal, partials::PartialBuffer},
    error::{Error, Result},
    graph::{
        kind::NodeKind,
        wiring::{ModSource, NodeWiring, UnitSource},
    },
};

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Context passed to graph nodes on every lifecycle call
///
/// Contains the voice's musical state:
/// - pitch: fundamental in Hz (partial frequencies are multiples of this)
/// - velocity / release_velocity / aftertouch: normalized 0.0-1.0
/// - note_counter: incremented for every new note on this voice
/// - gated: true between gate() and release()
/// - control_rate: ticks per second
/// - tick: number of ticks evaluated since the last reset
#[derive(Debug, Clone)]
pub struct VoiceCtx {
    pub pitch: f32,
    pub velocity: f32,
    pub release_velocity: f32,
    pub aftertouch: f32,
    pub channel: u8,
    pub note_counter: u64,
    pub gated: bool,
    pub control_rate: f32,
    pub tick: u64,
}

impl VoiceCtx {
    pub fn new(control_rate: f32) -> Self {
        Self {
            pitch: 0.0,
            velocity: 0.0,
            release_velocity: 0.0,
            aftertouch: 0.0,
            channel: 0,
            note_counter: 0,
            gated: false,
            control_rate,
            tick: 0,
        }
    }

    /// Create context from direct frequency
    pub fn from_freq(control_rate: f32, pitch: f32, velocity: f32) -> Self {
        Self {
            pitch,
            velocity,
            ..Self::new(control_rate)
        }
    }

    /// Seconds per control tick, guarded against a zero rate.
    #[inline]
    pub fn tick_seconds(&self) -> f32 {
        if self.control_rate > 0.0 {
            1.0 / self.control_rate
        } else {
            0.0
        }
    }
}

/// A modulation input port and the constant it reads when left unwired.
#[derive(Debug, Clone, Copy)]
pub struct ModPort {
    pub name: &'static str,
    pub default: f32,
}

/// An integer patch-time option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

/// Everything a node kind exposes to wiring.
#[derive(Debug)]
pub struct Ports {
    pub unit_inputs: &'static [&'static str],
    pub mod_inputs: &'static [ModPort],
    pub unit_outputs: &'static [&'static str],
    pub mod_outputs: &'static [&'static str],
    pub options: &'static [OptionSpec],
}

impl Ports {
    pub fn unit_input(&self, name: &str) -> Option<usize> {
        self.unit_inputs.iter().position(|p| *p == name)
    }

    pub fn mod_input(&self, name: &str) -> Option<usize> {
        self.mod_inputs.iter().position(|p| p.name == name)
    }

    pub fn unit_output(&self, name: &str) -> Option<usize> {
        self.unit_outputs.iter().position(|p| *p == name)
    }

    pub fn mod_output(&self, name: &str) -> Option<usize> {
        self.mod_outputs.iter().position(|p| *p == name)
    }
}

/// Current option values of one node instance.
#[derive(Debug, Clone)]
pub struct Options {
    specs: &'static [OptionSpec],
    values: Vec<i32>,
}

impl Options {
    pub fn defaults(ports: &Ports) -> Self {
        Self {
            specs: ports.options,
            values: ports.options.iter().map(|o| o.default).collect(),
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    /// Value at `index`, or 0 for an index the kind does not declare.
    #[inline]
    pub fn value(&self, index: usize) -> i32 {
        self.get(index).unwrap_or(0)
    }

    /// Validate against the declared range and store.
    pub fn set(&mut self, node: &str, index: usize, value: i32) -> Result<()> {
        let spec = self.specs.get(index).ok_or_else(|| Error::UnknownOption {
            node: node.to_string(),
            index,
        })?;
        if value < spec.min || value > spec.max {
            return Err(Error::OptionOutOfRange {
                node: node.to_string(),
                option: spec.name,
                value,
                min: spec.min,
                max: spec.max,
            });
        }
        self.values[index] = value;
        Ok(())
    }
}

/// Core trait for spectral graph nodes
///
/// One implementation per `NodeKind`. Nodes respond to the voice lifecycle
/// (reset, gate, release) and compute their outputs once per control tick in
/// `go()`.
pub trait Processor: Send {
    fn kind(&self) -> NodeKind;

    fn ports(&self) -> &'static Ports {
        self.kind().ports()
    }

    /// Fresh per-voice copy of this prototype. Shared tables stay shared.
    fn instantiate(&self) -> Box<dyn Processor>;

    fn options(&self) -> &Options;

    fn options_mut(&mut self) -> &mut Options;

    fn option(&self, index: usize) -> Option<i32> {
        self.options().get(index)
    }

    fn set_option(&mut self, index: usize, value: i32) -> Result<()> {
        let name = self.kind().name();
        self.options_mut().set(name, index, value)
    }

    /// Voice (re)start: return every piece of history to its initial state.
    ///
    /// Default implementation does nothing (stateless nodes).
    fn reset(&mut self, _ctx: &VoiceCtx) {
        // Default: do nothing
    }

    /// Note on.
    ///
    /// Default implementation does nothing.
    fn gate(&mut self, _ctx: &VoiceCtx) {
        // Default: do nothing
    }

    /// Note off.
    ///
    /// Default implementation does nothing.
    fn release(&mut self, _ctx: &VoiceCtx) {
        // Default: do nothing
    }

    /// Compute this tick's outputs from already evaluated inputs.
    fn go(&mut self, io: &mut NodeIo<'_>);

    /// Check if this node is still running an envelope
    ///
    /// Used by voice management to know when a released voice can be freed.
    /// `None` means the node has no lifetime of its own.
    fn is_active(&self) -> Option<bool> {
        None
    }
}

/// Per-voice output state of one node.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub(crate) units: Vec<Arc<PartialBuffer>>,
    pub(crate) mods: Vec<ModSignal>,
    /// Tick on which each modulation input last consumed a trigger.
    pub(crate) reads: Vec<Option<u64>>,
}

impl NodeState {
    pub(crate) fn new(ports: &Ports, silence: &Arc<PartialBuffer>) -> Self {
        Self {
            units: vec![Arc::clone(silence); ports.unit_outputs.len()],
            mods: vec![ModSignal::default(); ports.mod_outputs.len()],
            reads: vec![None; ports.mod_inputs.len()],
        }
    }

    pub(crate) fn reset(&mut self, silence: &Arc<PartialBuffer>) {
        for unit in self.units.iter_mut() {
            *unit = Arc::clone(silence);
        }
        self.mods.fill(ModSignal::default());
        self.reads.fill(None);
    }

    /// Edges last exactly one tick: clear them before the owner runs again.
    #[inline]
    pub(crate) fn begin_tick(&mut self) {
        for m in self.mods.iter_mut() {
            m.triggered = false;
        }
    }

    pub fn unit(&self, channel: usize) -> &Arc<PartialBuffer> {
        &self.units[channel]
    }

    pub fn modulation(&self, channel: usize) -> ModSignal {
        self.mods[channel]
    }
}

/// Everything a node may touch during `go()`.
///
/// Inputs are read-only views of upstream outputs computed earlier this tick.
/// Outputs follow the push/copy rule:
///
/// - `push_input` aliases an upstream buffer. Nothing is copied, and since the
///   buffer is behind an `Arc` the node has no way to mutate it.
/// - `copy_input` / `output_mut` hand out `&mut` only to a buffer this node
///   owns exclusively; if anyone else still holds it (a downstream alias, a
///   renderer snapshot) it is copied first.
pub struct NodeIo<'a> {
    wiring: &'a NodeWiring,
    upstream: &'a [NodeState],
    own: &'a mut NodeState,
    silence: &'a Arc<PartialBuffer>,
    ctx: &'a VoiceCtx,
    rng: &'a mut StdRng,
}

impl<'a> NodeIo<'a> {
    pub(crate) fn new(
        wiring: &'a NodeWiring,
        upstream: &'a [NodeState],
        own: &'a mut NodeState,
        silence: &'a Arc<PartialBuffer>,
        ctx: &'a VoiceCtx,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            wiring,
            upstream,
            own,
            silence,
            ctx,
            rng,
        }
    }

    #[inline]
    pub fn voice(&self) -> &VoiceCtx {
        self.ctx
    }

    /// The voice's shared generator.
    #[inline]
    pub fn shared_rng(&mut self) -> &mut StdRng {
        self.rng
    }

    // --- unit inputs ---

    pub fn unit_source(&self, port: usize) -> &Arc<PartialBuffer> {
        match self.wiring.units[port] {
            UnitSource::Nil => self.silence,
            UnitSource::Node { node, channel } => &self.upstream[node].units[channel],
        }
    }

    #[inline]
    pub fn unit_in(&self, port: usize) -> &PartialBuffer {
        self.unit_source(port)
    }

    pub fn is_unit_connected(&self, port: usize) -> bool {
        !matches!(self.wiring.units[port], UnitSource::Nil)
    }

    // --- modulation inputs ---

    /// Current value of a modulation input (its constant when unwired).
    pub fn mod_in(&self, port: usize) -> f32 {
        match self.wiring.mods[port] {
            ModSource::Constant(value) => value,
            ModSource::Node { node, channel } => self.upstream[node].mods[channel].value,
        }
    }

    /// True once per tick if the wired source fired; a second call on the
    /// same port in the same tick returns false.
    pub fn is_triggered(&mut self, port: usize) -> bool {
        let fired = match self.wiring.mods[port] {
            ModSource::Constant(_) => false,
            ModSource::Node { node, channel } => self.upstream[node].mods[channel].triggered,
        };
        if !fired {
            return false;
        }
        let tick = self.ctx.tick;
        let read = &mut self.own.reads[port];
        if *read == Some(tick) {
            return false;
        }
        *read = Some(tick);
        true
    }

    // --- unit outputs ---

    /// Alias an input buffer as this tick's output.
    pub fn push_input(&mut self, channel: usize, port: usize) {
        let source = Arc::clone(self.unit_source(port));
        self.own.units[channel] = source;
    }

    /// Alias an arbitrary shared buffer as this tick's output.
    pub fn push(&mut self, channel: usize, buffer: Arc<PartialBuffer>) {
        self.own.units[channel] = buffer;
    }

    /// Owned, mutable copy of an input in the output slot.
    pub fn copy_input(&mut self, channel: usize, port: usize) -> &mut PartialBuffer {
        let source = Arc::clone(self.unit_source(port));
        let slot = &mut self.own.units[channel];
        match Arc::get_mut(slot) {
            Some(buffer) => buffer.clone_from(&source),
            None => *slot = Arc::new(PartialBuffer::clone(&source)),
        }
        Arc::make_mut(slot)
    }

    /// Owned, mutable access to the previous content of an output slot.
    pub fn output_mut(&mut self, channel: usize) -> &mut PartialBuffer {
        Arc::make_mut(&mut self.own.units[channel])
    }

    /// What this node published last (or this tick, if already written).
    pub fn output(&self, channel: usize) -> &Arc<PartialBuffer> {
        &self.own.units[channel]
    }

    // --- modulation outputs ---

    #[inline]
    pub fn set_mod(&mut self, channel: usize, value: f32) {
        self.own.mods[channel].set(value);
    }

    /// Arm a one-tick trigger on an output.
    #[inline]
    pub fn trigger(&mut self, channel: usize) {
        self.own.mods[channel].triggered = true;
    }
}
