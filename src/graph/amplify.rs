use crate::graph::{
    kind::NodeKind,
    node::{ModPort, NodeIo, Options, Ports, Processor},
};

/*
Spectral Amplify
================

Scales every partial's amplitude by the Gain modulation. Frequencies and order
tags pass through untouched, so the output never needs a resort.

At unity gain there is nothing to compute, and the input is pushed: the
output channel aliases the upstream buffer for the tick. This is the common
case for a patch whose envelope sits in sustain at full level, and it costs a
reference count instead of a 4 KiB copy.
*/

pub const IN: usize = 0;
pub const GAIN: usize = 0;

pub static PORTS: Ports = Ports {
    unit_inputs: &["In"],
    mod_inputs: &[ModPort {
        name: "Gain",
        default: 1.0,
    }],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[],
};

#[derive(Debug, Clone)]
pub struct AmplifyNode {
    options: Options,
}

impl AmplifyNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
        }
    }
}

impl Default for AmplifyNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for AmplifyNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Amplify
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
        let gain = io.mod_in(GAIN);
        if gain == 1.0 {
            io.push_input(0, IN);
            return;
        }

        let out = io.copy_input(0, IN);
        for amp in out.amp.iter_mut() {
            *amp *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::testing::{sawtooth, Rig};

    #[test]
    fn unity_gain_pushes() {
        let mut rig = Rig::new(NodeKind::Amplify);
        rig.set_unit(IN, sawtooth());
        rig.tick();

        assert!(Arc::ptr_eq(rig.out(0), rig.input(IN)));
    }

    #[test]
    fn gain_scales_a_private_copy() {
        let mut rig = Rig::new(NodeKind::Amplify);
        rig.set_unit(IN, sawtooth());
        rig.set_mod(GAIN, 0.5);
        rig.tick();

        let out = rig.out(0);
        assert!(!Arc::ptr_eq(out, rig.input(IN)));
        assert_eq!(out.amp[0], 0.5);
        assert_eq!(out.freq, rig.input(IN).freq);
        assert!(rig.input(IN).bits_eq(&sawtooth()), "input untouched");
    }

    #[test]
    fn push_then_copy_does_not_mutate_pushed_buffer() {
        let mut rig = Rig::new(NodeKind::Amplify);
        rig.set_unit(IN, sawtooth());
        rig.tick();
        let pushed = Arc::clone(rig.out(0));

        rig.set_mod(GAIN, 0.25);
        rig.tick();

        assert!(pushed.bits_eq(&sawtooth()));
        assert_eq!(rig.out(0).amp[0], 0.25);
    }
}
