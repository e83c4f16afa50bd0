//! Benchmarks for a single voice tick.

use criterion::Criterion;
use saavy_spectral::synth::{NoteParams, Voice};

use super::{heavy, plain};

const CONTROL_RATE: f32 = 500.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for (name, patch) in [("plain", plain()), ("heavy", heavy())] {
        let mut voice = Voice::new(&patch, CONTROL_RATE);
        voice.note_on(NoteParams::from_midi(45, 100, 0, 1), true);
        // Past the attack so the envelope sits in sustain
        for _ in 0..200 {
            voice.tick();
        }

        group.bench_function(name, |b| b.iter(|| voice.tick()));
    }

    group.finish();
}
