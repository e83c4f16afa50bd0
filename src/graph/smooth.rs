use crate::{
    dsp::{
        smooth::{amount_to_alpha, blend},
        sort::{settle, SortStrategy},
    },
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, Options, Ports, Processor, VoiceCtx},
    },
    PARTIALS,
};

/*
Spectral Smoothing
==================

Glides every partial toward its new frequency and amplitude over several
ticks. This is where order tags earn their keep.

The shadow state is indexed by TAG, not by position:

    for each position i:
        tag = in.order[i]
        freq_state[tag] = blend(freq_state[tag], in.freq[i], alpha)
        amp_state[tag]  = blend(amp_state[tag],  in.amp[i],  alpha)

When two partials cross in frequency upstream, their positions swap but their
tags do not, so each keeps gliding from its own history. Smoothed partials can
overtake each other in the output as well, so every tick ends with settle();
moves are small, so an insertion sort is enough.

The first tick after reset adopts the input as-is instead of gliding up from
silence at frequency zero.
*/

pub const IN: usize = 0;
pub const AMOUNT: usize = 0;

pub static PORTS: Ports = Ports {
    unit_inputs: &["In"],
    mod_inputs: &[ModPort {
        name: "Amount",
        default: 0.5,
    }],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[],
};

#[derive(Debug, Clone)]
pub struct SmoothNode {
    options: Options,
    primed: bool,
    freq_state: [f32; PARTIALS],
    amp_state: [f32; PARTIALS],
}

impl SmoothNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            primed: false,
            freq_state: [0.0; PARTIALS],
            amp_state: [0.0; PARTIALS],
        }
    }
}

impl Default for SmoothNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for SmoothNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Smooth
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
        self.primed = false;
        self.freq_state = [0.0; PARTIALS];
        self.amp_state = [0.0; PARTIALS];
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let alpha = if self.primed {
            amount_to_alpha(io.mod_in(AMOUNT))
        } else {
            1.0
        };
        self.primed = true;

        let out = io.copy_input(0, IN);
        for i in 0..PARTIALS {
            let tag = out.order[i];
            self.freq_state[tag] = blend(self.freq_state[tag], out.freq[i], alpha);
            self.amp_state[tag] = blend(self.amp_state[tag], out.amp[i], alpha);
            out.freq[i] = self.freq_state[tag];
            out.amp[i] = self.amp_state[tag];
        }

        settle(out, SortStrategy::Simple);
    }
}
