//! Low-level spectral primitives used by the graph nodes.
//!
//! These components are allocation-free on the tick path, making them safe to
//! embed directly inside node structs. They stay focused on the math so graph
//! nodes can layer on wiring and lifecycle.

/// Control-rate attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Control-rate phase accumulator and rate mapping.
pub mod lfo;
/// Modulation signals and control mappings.
pub mod modulation;
/// Waveform harmonic recipes and cycle shapes.
pub mod oscillator;
/// Fixed-size partial buffers and their invariants.
pub mod partials;
/// Shared or privately seeded randomness.
pub mod random;
/// Subnormal-safe smoothing.
pub mod smooth;
/// Order-tag preserving sorts.
pub mod sort;
/// Process-wide lookup tables.
pub mod tables;

pub use envelope::EnvelopeState;
pub use modulation::ModSignal;
pub use partials::PartialBuffer;
pub use tables::SharedTables;
