use crate::{
    dsp::{
        lfo::{rate_to_hz, Phasor},
        oscillator::OscillatorWaveform,
    },
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor, VoiceCtx},
    },
};

/*
LFO (Low Frequency Oscillator)
==============================

A control-rate oscillator with a unipolar output and a trigger on every cycle
wrap. See `dsp/lfo.rs` for the rate mapping and phase handling.

When to Use LfoNode
-------------------

  Spectral vibrato:   LFO → Smooth Amount, or LFO → Chord Gain
  Tremolo:            LFO → Amplify Gain
  Moving timbre:      LFO → Wavetable Position, LFO → Harmonics Tilt
  Clock:              LFO trigger → Sample & Hold / Random / Noise Trigger

Inputs and Options
------------------

  Rate       0..1, exponential 0.05 Hz .. 20 Hz (default 0.3 ≈ 0.3 Hz)
  Depth      scales the output; 0 parks it at zero
  Waveform   0 sine, 1 saw, 2 square, 3 triangle
  Sync       1 resets the phase on every gate
*/

pub const RATE: usize = 0;
pub const DEPTH: usize = 1;

pub const WAVEFORM: usize = 0;
pub const SYNC: usize = 1;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "Rate",
            default: 0.3,
        },
        ModPort {
            name: "Depth",
            default: 1.0,
        },
    ],
    unit_outputs: &[],
    mod_outputs: &["Out"],
    options: &[
        OptionSpec {
            name: "Waveform",
            min: 0,
            max: 3,
            default: 0,
        },
        OptionSpec {
            name: "Sync",
            min: 0,
            max: 1,
            default: 1,
        },
    ],
};

#[derive(Debug, Clone)]
pub struct LfoNode {
    options: Options,
    phasor: Phasor,
}

impl LfoNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            phasor: Phasor::new(),
        }
    }
}

impl Default for LfoNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for LfoNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Lfo
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
        self.phasor.reset();
    }

    fn gate(&mut self, _ctx: &VoiceCtx) {
        if self.options.value(SYNC) == 1 {
            self.phasor.reset();
        }
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let hz = rate_to_hz(io.mod_in(RATE));
        let depth = io.mod_in(DEPTH);
        let dt = io.voice().tick_seconds();

        let wrapped = self.phasor.advance(hz, dt);
        let shape = OscillatorWaveform::from_option(self.options.value(WAVEFORM));
        io.set_mod(0, depth * shape.cycle(self.phasor.phase()));
        if wrapped {
            io.trigger(0);
        }
    }
}
