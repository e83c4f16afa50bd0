//! Benchmarks for low-level spectral primitives.

mod smooth;
mod sort;

pub use smooth::bench_smooth;
pub use sort::bench_sort;
