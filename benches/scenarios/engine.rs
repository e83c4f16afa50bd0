//! Benchmarks for a full engine tick at several polyphony levels.

use criterion::{BenchmarkId, Criterion};
use saavy_spectral::{Engine, EngineConfig, SynthMessage};

use super::heavy;
use crate::VOICE_COUNTS;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let patch = heavy();

    for &voices in VOICE_COUNTS {
        for parallel in [false, true] {
            let config = EngineConfig::default()
                .with_max_voices(voices)
                .with_parallel(parallel);
            let mut engine = match Engine::new(&patch, config) {
                Ok(engine) => engine,
                Err(err) => panic!("benchmark config is invalid: {err}"),
            };
            for i in 0..voices {
                let _ = engine.handle(SynthMessage::NoteOn {
                    channel: 0,
                    note: 36 + i as u8,
                    velocity: 100,
                });
            }

            let name = if parallel { "parallel" } else { "serial" };
            group.bench_with_input(BenchmarkId::new(name, voices), &voices, |b, _| {
                b.iter(|| engine.tick())
            });
        }
    }

    group.finish();
}
