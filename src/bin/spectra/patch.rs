//! Demo patch: a tilted saw, folded by an LFO-swept cutoff, doubled into a
//! minor triad and shaped by an envelope.

use std::sync::Arc;

use saavy_spectral::{
    graph::NodeKind,
    patch::{GraphDescription, ModSourceRef, NodeDescriptor, UnitSourceRef},
    Patch, Result, SharedTables,
};

pub fn demo() -> Result<Patch> {
    let desc = GraphDescription::new("amp")
        .node(
            NodeDescriptor::new("osc", NodeKind::Harmonics)
                .modulation("Tilt", ModSourceRef::Constant(0.2)),
        )
        .node(
            NodeDescriptor::new("lfo", NodeKind::Lfo)
                .modulation("Rate", ModSourceRef::Constant(0.25)),
        )
        .node(
            NodeDescriptor::new("fold", NodeKind::Fold)
                .unit("In", UnitSourceRef::node("osc", "Out"))
                .modulation("Cutoff", ModSourceRef::node("lfo", "Out")),
        )
        .node(
            NodeDescriptor::new("chord", NodeKind::Chord)
                .option(0, 1)
                .unit("In", UnitSourceRef::node("fold", "Out"))
                .modulation("Gain", ModSourceRef::Constant(0.6)),
        )
        .node(
            NodeDescriptor::new("env", NodeKind::Envelope)
                .modulation("Attack", ModSourceRef::Constant(0.1))
                .modulation("Release", ModSourceRef::Constant(0.3)),
        )
        .node(
            NodeDescriptor::new("amp", NodeKind::Amplify)
                .unit("In", UnitSourceRef::node("chord", "Out"))
                .modulation("Gain", ModSourceRef::node("env", "Out")),
        )
        .export("lfo", "lfo", "Out")
        .export("env", "env", "Out");

    Patch::build(&desc, Arc::new(SharedTables::new()))
}
