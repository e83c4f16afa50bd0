//! Benchmarks for subnormal-safe smoothing.

use std::hint::black_box;

use criterion::Criterion;
use saavy_spectral::{
    dsp::smooth::{amount_to_alpha, blend},
    PARTIALS,
};

pub fn bench_smooth(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smooth");
    let alpha = amount_to_alpha(0.8);

    // Audible glide: every blend takes the arithmetic path
    let mut state = [1.0f32; PARTIALS];
    let targets: [f32; PARTIALS] = std::array::from_fn(|i| 1.0 / (i + 1) as f32);
    group.bench_function("glide", |b| {
        b.iter(|| {
            for (s, &t) in state.iter_mut().zip(targets.iter()) {
                *s = blend(*s, black_box(t), alpha);
            }
        })
    });

    // Decay into silence: operands hit the guard and snap to zero
    let mut state = [1.0e-20f32; PARTIALS];
    group.bench_function("decay_tail", |b| {
        b.iter(|| {
            for s in state.iter_mut() {
                *s = blend(*s, black_box(0.0), alpha);
            }
        })
    });

    group.finish();
}
