use crate::{
    dsp::oscillator::OscillatorWaveform,
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor, VoiceCtx},
    },
};

/*
Harmonic Source
===============

The additive counterpart of an oscillator: instead of rendering a waveform,
it publishes the waveform's recipe. Partial k sits at frequency k + 1 (in
cycles per fundamental) with the amplitude the selected shape prescribes.

Tilt bends the recipe toward darker sounds by an extra power-law rolloff:

    amp(k) = level × shape(k + 1) × (k + 1)^(−TILT_SLOPE × tilt)

    tilt 0.0   the plain shape
    tilt 0.5   −9 dB per octave on top of the shape
    tilt 1.0   −18 dB per octave on top of the shape

The buffer only changes when level, tilt or waveform change. On every other
tick the previous output stays in place untouched, which is what makes
downstream pushes of a static source free.
*/

pub const LEVEL: usize = 0;
pub const TILT: usize = 1;
pub const WAVEFORM: usize = 0;

/// Extra rolloff exponent at full tilt.
const TILT_SLOPE: f32 = 3.0;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "Level",
            default: 1.0,
        },
        ModPort {
            name: "Tilt",
            default: 0.0,
        },
    ],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[OptionSpec {
        name: "Waveform",
        min: 0,
        max: 3,
        default: 1,
    }],
};

#[derive(Debug, Clone)]
pub struct HarmonicsNode {
    options: Options,
    last: Option<(f32, f32, i32)>,
}

impl HarmonicsNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            last: None,
        }
    }
}

impl Default for HarmonicsNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for HarmonicsNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Harmonics
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
        self.last = None;
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let level = io.mod_in(LEVEL);
        let tilt = io.mod_in(TILT);
        let shape = self.options.value(WAVEFORM);

        let params = (level, tilt, shape);
        if self.last == Some(params) {
            return;
        }
        self.last = Some(params);

        let waveform = OscillatorWaveform::from_option(shape);
        let exponent = -TILT_SLOPE * tilt;
        let out = io.output_mut(0);
        for k in 0..out.len() {
            let n = k + 1;
            out.freq[k] = n as f32;
            out.amp[k] = level * waveform.harmonic_amplitude(n) * (n as f32).powf(exponent);
            out.order[k] = k;
        }
        out.bound_amplitudes();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::testing::Rig;

    #[test]
    fn saw_recipe_by_default() {
        let mut rig = Rig::new(NodeKind::Harmonics);
        rig.tick();

        let out = rig.out(0);
        assert_eq!(out.freq[0], 1.0);
        assert_eq!(out.freq[9], 10.0);
        assert!((out.amp[1] - 0.5).abs() < 1e-6);
        assert!(out.is_sorted());
        assert!(out.has_valid_order());
    }

    #[test]
    fn unchanged_parameters_keep_previous_buffer() {
        let mut rig = Rig::new(NodeKind::Harmonics);
        rig.tick();
        let first = Arc::clone(rig.out(0));
        rig.tick();

        assert!(Arc::ptr_eq(&first, rig.out(0)), "static source must not rewrite");
    }

    #[test]
    fn tilt_darkens_upper_partials() {
        let mut rig = Rig::new(NodeKind::Harmonics);
        rig.tick();
        let plain = rig.out(0).amp[7];

        rig.set_mod(TILT, 0.5);
        rig.tick();
        let tilted = rig.out(0).amp[7];

        assert!(tilted < plain * 0.1);
        assert_eq!(rig.out(0).amp[0], 1.0, "fundamental is the tilt pivot");
    }

    #[test]
    fn sine_option_leaves_only_fundamental() {
        let mut rig = Rig::new(NodeKind::Harmonics);
        rig.set_option(WAVEFORM, 0);
        rig.set_mod(LEVEL, 0.5);
        rig.tick();

        let out = rig.out(0);
        assert_eq!(out.amp[0], 0.5);
        assert!(out.amp[1..].iter().all(|&a| a == 0.0));
    }

    #[test]
    fn reset_forces_regeneration() {
        let mut rig = Rig::new(NodeKind::Harmonics);
        rig.tick();
        rig.reset();
        assert_eq!(rig.out(0).peak_amplitude(), 0.0);

        rig.tick();
        assert_eq!(rig.out(0).amp[0], 1.0);
    }
}
