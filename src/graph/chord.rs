use std::sync::Arc;

use crate::{
    dsp::{
        sort::{settle, SortStrategy, TagPool},
        tables::SharedTables,
    },
    graph::{
        kind::NodeKind,
        node::{ModPort, NodeIo, OptionSpec, Options, Ports, Processor},
    },
    PARTIALS,
};

/*
Spectral Chords
===============

Turns one note into a chord by replicating its lowest partials at each chord
interval. The slot budget is fixed, so the chord shares it:

    notes n = chord.len()
    share   = PARTIALS / n             slots per added note
    root    = PARTIALS − (n − 1) × share   (the root keeps the remainder)

For a minor triad {0, 3, 7} with 256 partials: root keeps 86 partials, each of
the two added notes gets 85.

    slot range      content                       amplitude
    0 .. root       input partials 0 .. root      unchanged
    next share      input 0 .. share × ratio[3]   × Gain
    next share      input 0 .. share × ratio[7]   × Gain

Ratios come from the shared semitone table. The copies interleave with the
root in frequency, so the whole buffer settles with big_sort.

Root partials keep their input tags. The copies take the tags displaced from
the slots they overwrite, handed out by the rank of the source partial's tag
(see TagPool), so a copy stays with its source when sources cross.
*/

pub const IN: usize = 0;
pub const GAIN: usize = 0;
pub const CHORD: usize = 0;

pub static PORTS: Ports = Ports {
    unit_inputs: &["In"],
    mod_inputs: &[ModPort {
        name: "Gain",
        default: 1.0,
    }],
    unit_outputs: &["Out"],
    mod_outputs: &[],
    options: &[OptionSpec {
        name: "Chord",
        min: 0,
        max: 11,
        default: 0,
    }],
};

#[derive(Debug, Clone)]
pub struct ChordNode {
    options: Options,
    tables: Arc<SharedTables>,
    tags: TagPool,
}

impl ChordNode {
    pub fn new(tables: Arc<SharedTables>) -> Self {
        Self {
            options: Options::defaults(&PORTS),
            tables,
            tags: TagPool::new(),
        }
    }
}

impl Processor for ChordNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Chord
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
        let chord = self.tables.chord(self.options.value(CHORD).max(0) as usize);
        let notes = chord.len().max(1);
        let share = PARTIALS / notes;
        let root = PARTIALS - (notes - 1) * share;

        let out = io.copy_input(0, IN);
        self.tags.displace(&out.order, root);
        self.tags.rank_sources(&out.order[..share]);

        // Copies read slots 0..share, which lie inside the untouched root range.
        for (j, &interval) in chord.iter().enumerate().skip(1) {
            let ratio = self.tables.semitone_ratio(interval);
            let base = root + (j - 1) * share;
            for k in 0..share {
                out.freq[base + k] = out.freq[k] * ratio;
                out.amp[base + k] = out.amp[k] * gain;
                out.order[base + k] = self.tags.tag(root, j - 1, share, k);
            }
        }

        settle(out, SortStrategy::Big);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::partials::PartialBuffer,
        graph::testing::{sawtooth, Rig},
    };

    #[test]
    fn minor_triad_adds_third_and_fifth() {
        let tables = SharedTables::new();
        let mut input = PartialBuffer::harmonic();
        input.amp[0] = 1.0;

        let mut rig = Rig::new(NodeKind::Chord);
        rig.set_option(CHORD, 1);
        rig.set_mod(GAIN, 0.5);
        rig.set_unit(IN, input);
        rig.tick();

        let out = rig.out(0);
        assert!(out.is_sorted());
        assert!(out.has_valid_order());

        for step in [3u8, 7] {
            let f = tables.semitone_ratio(step);
            let pos = out
                .freq
                .iter()
                .position(|&x| (x - f).abs() < 1e-6)
                .expect("chord copy present");
            assert_eq!(out.amp[pos], 0.5, "copy at ratio[{step}] scaled by gain");
        }
    }

    #[test]
    fn slots_are_partitioned_evenly() {
        let mut rig = Rig::new(NodeKind::Chord);
        rig.set_option(CHORD, 6); // four notes
        rig.set_unit(IN, sawtooth());
        rig.tick();

        // 64 slots each: the root keeps harmonics 1..=64.
        let out = rig.out(0);
        let roots = out.freq.iter().filter(|&&f| f.fract() == 0.0 && f <= 64.0).count();
        assert!(roots >= 64);
        assert_eq!(*out.freq.last().unwrap(), 64.0 * tables_ratio(11));
    }

    fn tables_ratio(step: u8) -> f32 {
        SharedTables::new().semitone_ratio(step)
    }

    fn tag_data(buf: &PartialBuffer, tag: usize) -> (f32, f32) {
        let pos = buf.position_of(tag).expect("tag present");
        (buf.freq[pos], buf.amp[pos])
    }

    #[test]
    fn crossing_inputs_keep_their_tags() {
        let tables = SharedTables::new();
        let third = tables.semitone_ratio(3);

        let mut rig = Rig::new(NodeKind::Chord);
        rig.set_option(CHORD, 1);
        rig.set_mod(GAIN, 0.5);
        rig.set_unit(IN, sawtooth());
        rig.tick();

        let out = rig.out(0);
        assert_eq!(tag_data(out, 0), (1.0, 1.0));
        let copy = out
            .freq
            .iter()
            .position(|&f| (f - third).abs() < 1e-6)
            .map(|pos| out.order[pos])
            .expect("third of the fundamental");

        // The two lowest partials cross: tag 1 now sits below tag 0.
        let mut crossed = sawtooth();
        crossed.freq[0] = 1.9;
        crossed.amp[0] = 0.5;
        crossed.order[0] = 1;
        crossed.freq[1] = 2.1;
        crossed.amp[1] = 1.0;
        crossed.order[1] = 0;
        rig.set_unit(IN, crossed);
        rig.tick();

        let out = rig.out(0);
        assert!(out.has_valid_order());
        assert_eq!(tag_data(out, 0), (2.1, 1.0));
        assert_eq!(tag_data(out, 1), (1.9, 0.5));

        let (freq, amp) = tag_data(out, copy);
        assert!((freq - 2.1 * third).abs() < 1e-5, "copy followed its source");
        assert_eq!(amp, 0.5);
    }

    #[test]
    fn tags_are_stable_across_ticks() {
        let mut rig = Rig::new(NodeKind::Chord);
        rig.set_unit(IN, sawtooth());
        rig.tick();
        let first = rig.out(0).order;
        rig.tick();

        assert_eq!(first, rig.out(0).order);
    }
}
