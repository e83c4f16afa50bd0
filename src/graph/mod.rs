//! Spectral processing graph: node kinds, wiring, and the per-tick IO seam.
//!
//! Unit nodes read and write partial buffers; modulation nodes read and write
//! bounded control signals. Every node implements `node::Processor` and is
//! created through the closed `kind::NodeKind` catalog.

/// Closed catalog of node kinds and their port declarations.
pub mod kind;
/// Core traits shared by all graph nodes.
pub mod node;
/// Resolved input wiring.
pub mod wiring;

/// Unit amplitude scaling by a modulation input.
pub mod amplify;
/// Chord replication at semitone ratios.
pub mod chord;
/// Frequency folding / aliasing above a cutoff.
pub mod fold;
/// Harmonic series source.
pub mod harmonics;
/// Sum / max / merge of two spectra.
pub mod mix;
/// Dilate and Skeletonize over the amplitude array.
pub mod morph;
/// Random spectrum source.
pub mod noise;
/// Tag-indexed smoothing.
pub mod smooth;
/// Harmonic table scanner.
pub mod wavetable;

/// Control-rate ADSR envelope.
pub mod envelope;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Voice parameters as modulation signals.
pub mod note_info;
/// Triggered random values.
pub mod random;
/// Sample & hold.
pub mod sample_hold;

#[cfg(test)]
pub(crate) mod testing;

pub use kind::NodeKind;
pub use node::{NodeIo, Processor, VoiceCtx};
