//! Scans the rows of a shared harmonic table, crossfading between neighbours.
//!
//! Position 0.0 is the first row, 1.0 the last. Frequencies stay on the
//! harmonic grid; only amplitudes morph.

use std::sync::Arc;

use crate::{
    dsp::tables::SharedTables,
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor, VoiceCtx},
    },
};

pub const POSITION: usize = 0;
pub const LEVEL: usize = 1;
pub const TABLE: usize = 0;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[
        ModPort {
            name: "Position",
            default: 0.0,
        },
        ModPort {
            name: "Level",
            default: 1.0,
        },
    ],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[OptionSpec {
        name: "Table",
        min: 0,
        max: 63,
        default: 0,
    }],
};

#[derive(Debug, Clone)]
pub struct WavetableNode {
    options: Options,
    tables: Arc<SharedTables>,
    last: Option<(f32, f32, i32)>,
}

impl WavetableNode {
    pub fn new(tables: Arc<SharedTables>) -> Self {
        Self {
            options: Options::defaults(&PORTS),
            tables,
            last: None,
        }
    }
}

impl Processor for WavetableNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Wavetable
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
        let position = io.mod_in(POSITION);
        let level = io.mod_in(LEVEL);
        let index = self.options.value(TABLE);

        let params = (position, level, index);
        if self.last == Some(params) {
            return;
        }
        self.last = Some(params);

        // Table indices past the loaded set clamp to the last table.
        let table = self.tables.harmonic_table(index.max(0) as usize);
        let span = (table.rows() - 1) as f32;
        let scan = position * span;
        let lower = scan.floor() as usize;
        let frac = scan - lower as f32;
        let row_a = table.row(lower);
        let row_b = table.row(lower + 1);

        let out = io.output_mut(0);
        for k in 0..out.len() {
            out.freq[k] = (k + 1) as f32;
            out.amp[k] = level * (row_a[k] + (row_b[k] - row_a[k]) * frac);
            out.order[k] = k;
        }
        out.constrain();
        out.bound_amplitudes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::{oscillator::OscillatorWaveform, tables::HarmonicTable},
        graph::testing::Rig,
    };

    #[test]
    fn endpoints_match_first_and_last_rows() {
        let mut rig = Rig::new(NodeKind::Wavetable);
        rig.tick();
        assert_eq!(rig.out(0).amp[0], 1.0);
        assert_eq!(rig.out(0).amp[1], 0.0, "classic table starts at a sine");

        rig.set_mod(POSITION, 1.0);
        rig.tick();
        let saw = OscillatorWaveform::Saw.harmonic_amplitude(2);
        assert!((rig.out(0).amp[1] - saw).abs() < 1e-6, "and ends at a saw");
    }

    #[test]
    fn midpoint_crossfades_rows() {
        let table = HarmonicTable::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let tables = Arc::new(SharedTables::new().with_table(table));
        let mut rig = Rig::with_node(Box::new(WavetableNode::new(tables)));
        rig.set_option(TABLE, 1);
        rig.set_mod(POSITION, 0.5);
        rig.tick();

        let out = rig.out(0);
        assert!((out.amp[0] - 0.5).abs() < 1e-6);
        assert!((out.amp[1] - 0.5).abs() < 1e-6);
        assert!(out.is_sorted());
    }

    #[test]
    fn missing_table_index_clamps() {
        let mut rig = Rig::new(NodeKind::Wavetable);
        rig.set_option(TABLE, 40);
        rig.tick();
        assert_eq!(rig.out(0).amp[0], 1.0);
    }
}
