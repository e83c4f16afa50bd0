//! Real-world scenario benchmarks.
//!
//! These benchmarks model complete patches: a single voice tick and a full
//! engine with several voices sounding.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;

use std::sync::Arc;

use saavy_spectral::{
    graph::NodeKind,
    patch::{GraphDescription, ModSourceRef, NodeDescriptor, UnitSourceRef},
    Patch, SharedTables,
};

/// Saw into an envelope: the baseline cost of a voice.
pub fn plain() -> Patch {
    build(
        GraphDescription::new("amp")
            .node(NodeDescriptor::new("osc", NodeKind::Harmonics))
            .node(NodeDescriptor::new("env", NodeKind::Envelope))
            .node(
                NodeDescriptor::new("amp", NodeKind::Amplify)
                    .unit("In", UnitSourceRef::node("osc", "Out"))
                    .modulation("Gain", ModSourceRef::node("env", "Out")),
            ),
    )
}

/// Jittered noise folded by an LFO, chorded, merged and smoothed: every
/// sorting node on the path.
pub fn heavy() -> Patch {
    build(
        GraphDescription::new("amp")
            .node(
                NodeDescriptor::new("noise", NodeKind::Noise)
                    .modulation("Jitter", ModSourceRef::Constant(0.7)),
            )
            .node(NodeDescriptor::new("lfo", NodeKind::Lfo))
            .node(
                NodeDescriptor::new("fold", NodeKind::Fold)
                    .unit("In", UnitSourceRef::node("noise", "Out"))
                    .modulation("Cutoff", ModSourceRef::node("lfo", "Out")),
            )
            .node(
                NodeDescriptor::new("chord", NodeKind::Chord)
                    .unit("In", UnitSourceRef::node("fold", "Out")),
            )
            .node(NodeDescriptor::new("osc", NodeKind::Harmonics))
            .node(
                NodeDescriptor::new("merge", NodeKind::Mix)
                    .option(0, 2)
                    .unit("A", UnitSourceRef::node("chord", "Out"))
                    .unit("B", UnitSourceRef::node("osc", "Out")),
            )
            .node(
                NodeDescriptor::new("smooth", NodeKind::Smooth)
                    .unit("In", UnitSourceRef::node("merge", "Out"))
                    .modulation("Amount", ModSourceRef::Constant(0.5)),
            )
            .node(NodeDescriptor::new("env", NodeKind::Envelope))
            .node(
                NodeDescriptor::new("amp", NodeKind::Amplify)
                    .unit("In", UnitSourceRef::node("smooth", "Out"))
                    .modulation("Gain", ModSourceRef::node("env", "Out")),
            ),
    )
}

fn build(desc: GraphDescription) -> Patch {
    match Patch::build(&desc, Arc::new(SharedTables::new())) {
        Ok(patch) => patch,
        Err(err) => panic!("benchmark patch is invalid: {err}"),
    }
}
