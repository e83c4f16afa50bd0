pub mod dsp; // Partial buffers, sorts and control-rate primitives
pub mod engine; // Host harness: config, control clock
pub mod error;
pub mod graph; // Spectral processing nodes
pub mod io;
pub mod patch; // Graph descriptions and validated patches
pub mod synth; // Voice management and polyphony

/// Number of partials in every spectral buffer.
pub const PARTIALS: usize = 256;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

pub use dsp::{ModSignal, PartialBuffer, SharedTables};
pub use engine::{ControlClock, Engine, EngineConfig};
pub use error::{Error, Result};
pub use graph::NodeKind;
pub use io::SpectralSnapshot;
pub use patch::{GraphDescription, Patch};
pub use synth::{NoteParams, SynthMessage, Voice};
