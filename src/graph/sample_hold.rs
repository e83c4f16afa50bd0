use crate::graph::{
    kind::NodeKind,
    node::{ModPort, NodeIo, Options, Ports, Processor, VoiceCtx},
};

pub const IN: usize = 0;
pub const TRIGGER: usize = 1;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "In",
            default: 0.0,
        },
        ModPort {
            name: "Trigger",
            default: 0.0,
        },
    ],
    unit_outputs: &[],
    mod_outputs: &["Out"],
    options: &[],
};

/// Samples `In` whenever `Trigger` fires and holds it until the next trigger.
///
/// The trigger is forwarded on `Out`, so holds can be chained behind one
/// clock.
#[derive(Debug, Clone)]
pub struct SampleHoldNode {
    options: Options,
    held: f32,
}

impl SampleHoldNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            held: 0.0,
        }
    }
}

impl Default for SampleHoldNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for SampleHoldNode {
    fn kind(&self) -> NodeKind {
        NodeKind::SampleHold
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
        self.held = 0.0;
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        if io.is_triggered(TRIGGER) {
            self.held = io.mod_in(IN);
            io.trigger(0);
        }
        io.set_mod(0, self.held);
    }
}
