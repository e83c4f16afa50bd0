use crate::{
    dsp::envelope::{AdsrParams, Envelope},
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, Options, Ports, Processor, VoiceCtx},
    },
};

/*
Envelope Node
=============

Wraps the control-rate ADSR in dsp/envelope.rs. Stage times are modulation
inputs, mapped from 0..1 onto seconds with a square law so the short end of
the range gets most of the resolution:

    seconds = ENVELOPE_MAX_SECONDS × control²

    control   0.05    0.2    0.3    0.5    1.0
    seconds   0.025   0.4    0.9    2.5    10.0

Sustain is a level, used directly.

Outputs:

  Out   the envelope level; triggers on the first tick of each attack
  End   held at 0; triggers once when the release reaches zero

End is the natural clock for "note finished" events: wire it into a Random or
Sample & Hold trigger to pick a new value for the next note.
*/

pub const ATTACK: usize = 0;
pub const DECAY: usize = 1;
pub const SUSTAIN: usize = 2;
pub const RELEASE: usize = 3;

pub const OUT: usize = 0;
pub const END: usize = 1;

/// Stage time at control 1.0.
pub const ENVELOPE_MAX_SECONDS: f32 = 10.0;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "Attack",
            default: 0.05,
        },
        ModPort {
            name: "Decay",
            default: 0.2,
        },
        ModPort {
            name: "Sustain",
            default: 0.7,
        },
        ModPort {
            name: "Release",
            default: 0.3,
        },
    ],
    unit_outputs: &[],
    mod_outputs: &["Out", "End"],
    options: &[],
};

/// Map a 0..1 time control to seconds.
#[inline]
pub fn control_to_seconds(control: f32) -> f32 {
    ENVELOPE_MAX_SECONDS * control * control
}

#[derive(Debug, Clone)]
pub struct EnvelopeNode {
    options: Options,
    env: Envelope,
    started: bool,
}

impl EnvelopeNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            env: Envelope::new(),
            started: false,
        }
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }
}

impl Default for EnvelopeNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for EnvelopeNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Envelope
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
        self.env.reset();
        self.started = false;
    }

    fn gate(&mut self, _ctx: &VoiceCtx) {
        self.env.note_on();
        self.started = true;
    }

    fn release(&mut self, _ctx: &VoiceCtx) {
        self.env.note_off();
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let params = AdsrParams {
            attack: control_to_seconds(io.mod_in(ATTACK)),
            decay: control_to_seconds(io.mod_in(DECAY)),
            sustain: io.mod_in(SUSTAIN),
            release: control_to_seconds(io.mod_in(RELEASE)),
        };
        let dt = io.voice().tick_seconds();

        let ended = self.env.next_tick(&params, dt);
        io.set_mod(OUT, self.env.level());

        if self.started {
            self.started = false;
            io.trigger(OUT);
        }
        if ended {
            io.trigger(END);
        }
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.env.is_active())
    }
}
