//! Benchmarks for the tag-carrying sorts.

use std::hint::black_box;

use criterion::{BatchSize, Criterion};
use saavy_spectral::{
    dsp::sort::{big_sort, simple_sort},
    PartialBuffer, PARTIALS,
};

/// Harmonic grid with every partial nudged a little, as jitter would.
fn nearly_sorted() -> PartialBuffer {
    let mut buf = PartialBuffer::harmonic();
    for i in (0..PARTIALS - 1).step_by(7) {
        buf.freq.swap(i, i + 1);
    }
    buf
}

/// Two interleaved series, as a chord or merge leaves them.
fn scattered() -> PartialBuffer {
    let mut buf = PartialBuffer::harmonic();
    for i in 0..PARTIALS {
        buf.freq[i] = ((i * 97) % PARTIALS) as f32 * 1.5;
        buf.amp[i] = 1.0 / (i + 1) as f32;
    }
    buf
}

pub fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/sort");

    // Already sorted: the steady-state cost of a sorting node
    let sorted = PartialBuffer::harmonic();
    group.bench_function("simple_sorted", |b| {
        b.iter_batched_ref(
            || sorted.clone(),
            |buf| simple_sort(black_box(buf)),
            BatchSize::SmallInput,
        )
    });

    let nearly = nearly_sorted();
    group.bench_function("simple_nearly_sorted", |b| {
        b.iter_batched_ref(
            || nearly.clone(),
            |buf| simple_sort(black_box(buf)),
            BatchSize::SmallInput,
        )
    });

    let scattered = scattered();
    group.bench_function("big_scattered", |b| {
        b.iter_batched_ref(
            || scattered.clone(),
            |buf| big_sort(black_box(buf)),
            BatchSize::SmallInput,
        )
    });

    // What the big sort costs when it was not needed
    group.bench_function("big_sorted", |b| {
        b.iter_batched_ref(
            || sorted.clone(),
            |buf| big_sort(black_box(buf)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("constrain", |b| {
        b.iter_batched_ref(
            || scattered.clone(),
            |buf| black_box(buf.constrain()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}
