use crate::{
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor},
    },
    PARTIALS,
};

/*
Spectral Morphology
===================

Two grayscale-morphology style operators over the amplitude array, walking
positions (ascending frequency) with a geometric decay per step.

DILATE spreads every peak into its neighbours: a running envelope that jumps
up to any louder partial and otherwise decays by `decay` per position.

    in      ▁ █ ▁ ▁ ▁ ▁
    right   ▁ █ ▆ ▄ ▃ ▂        carry = max(amp, carry × decay)

SKELETONIZE does the opposite: it cuts every partial that hides under the
decaying shadow of an earlier peak, leaving the peaks that stand out.

    in      ▁ █ ▆ ▁ ▇ ▁
    right   ▁ █ ▁ ▁ ▇ ▁        keep amp only if amp ≥ shadow × decay

Direction picks the pass: left walks high → low, right walks low → high,
both runs each pass and combines them, by max for Dilate (spread both ways)
and by min for Skeletonize (survive both ways).

Decay 0 turns both into the identity. Frequencies never move, so the output
needs no resort.
*/

pub const IN: usize = 0;
pub const DECAY: usize = 0;
pub const DIRECTION: usize = 0;

pub static PORTS: Ports = Ports {
    unit_inputs: &["In"],
    mod_inputs: &[ModPort {
        name: "Decay",
        default: 0.5,
    }],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[OptionSpec {
        name: "Direction",
        min: 0,
        max: 2,
        default: 2,
    }],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Both,
}

impl Direction {
    pub fn from_option(value: i32) -> Self {
        match value {
            0 => Self::Left,
            1 => Self::Right,
            _ => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Dilate,
    Skeletonize,
}

impl MorphOp {
    /// One pass over `amp`, low to high, or high to low when `reverse`.
    fn pass(self, amp: &[f32; PARTIALS], decay: f32, out: &mut [f32; PARTIALS], reverse: bool) {
        let mut carry = 0.0f32;
        let mut step = |i: usize| {
            let shadow = carry * decay;
            match self {
                MorphOp::Dilate => {
                    carry = amp[i].max(shadow);
                    out[i] = carry;
                }
                MorphOp::Skeletonize => {
                    out[i] = if amp[i] >= shadow { amp[i] } else { 0.0 };
                    carry = amp[i].max(shadow);
                }
            }
        };
        if reverse {
            (0..PARTIALS).rev().for_each(&mut step);
        } else {
            (0..PARTIALS).for_each(&mut step);
        }
    }

    fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            MorphOp::Dilate => a.max(b),
            MorphOp::Skeletonize => a.min(b),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MorphNode {
    op: MorphOp,
    options: Options,
    left: [f32; PARTIALS],
    right: [f32; PARTIALS],
}

impl MorphNode {
    pub fn new(op: MorphOp) -> Self {
        Self {
            op,
            options: Options::defaults(&PORTS),
            left: [0.0; PARTIALS],
            right: [0.0; PARTIALS],
        }
    }

    pub fn dilate() -> Self {
        Self::new(MorphOp::Dilate)
    }

    pub fn skeletonize() -> Self {
        Self::new(MorphOp::Skeletonize)
    }
}

impl Processor for MorphNode {
    fn kind(&self) -> NodeKind {
        match self.op {
            MorphOp::Dilate => NodeKind::Dilate,
            MorphOp::Skeletonize => NodeKind::Skeletonize,
        }
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
        let decay = io.mod_in(DECAY);
        if decay == 0.0 {
            io.push_input(0, IN);
            return;
        }

        let direction = Direction::from_option(self.options.value(DIRECTION));
        let input = &io.unit_in(IN).amp;
        match direction {
            Direction::Left => self.op.pass(input, decay, &mut self.left, true),
            Direction::Right => self.op.pass(input, decay, &mut self.right, false),
            Direction::Both => {
                self.op.pass(input, decay, &mut self.left, true);
                self.op.pass(input, decay, &mut self.right, false);
            }
        }

        let op = self.op;
        let out = io.copy_input(0, IN);
        for i in 0..PARTIALS {
            out.amp[i] = match direction {
                Direction::Left => self.left[i],
                Direction::Right => self.right[i],
                Direction::Both => op.combine(self.left[i], self.right[i]),
            };
        }
    }
}
