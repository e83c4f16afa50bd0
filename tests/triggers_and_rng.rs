use std::sync::Arc;

use saavy_spectral::{
    graph::NodeKind,
    patch::{GraphDescription, ModSourceRef, NodeDescriptor},
    synth::{NoteParams, Voice},
    Patch, SharedTables,
};

const CONTROL_RATE: f32 = 500.0;

fn build(desc: GraphDescription) -> Patch {
    Patch::build(&desc, Arc::new(SharedTables::new())).unwrap()
}

fn start(patch: &Patch, voice_seed: u64) -> Voice {
    let mut voice = Voice::new(patch, CONTROL_RATE);
    voice.note_on(NoteParams::from_midi(60, 100, 0, voice_seed), true);
    voice
}

fn fired(voice: &Voice, id: &str) -> bool {
    voice.node_state(id).unwrap().modulation(0).triggered
}

fn value(voice: &Voice, id: &str) -> f32 {
    voice.node_state(id).unwrap().modulation(0).value
}

/// Two sample & holds and a random node all clocked by one LFO.
fn clocked() -> Patch {
    let held = |id: &str| {
        NodeDescriptor::new(id, NodeKind::SampleHold)
            .modulation("In", ModSourceRef::node("note", "Velocity"))
            .modulation("Trigger", ModSourceRef::node("lfo", "Out"))
    };
    build(
        GraphDescription::new("osc")
            .node(NodeDescriptor::new("osc", NodeKind::Harmonics))
            .node(NodeDescriptor::new("note", NodeKind::NoteInfo))
            .node(
                NodeDescriptor::new("lfo", NodeKind::Lfo)
                    .modulation("Rate", ModSourceRef::Constant(1.0)),
            )
            .node(held("first"))
            .node(held("second"))
            .node(
                NodeDescriptor::new("chained", NodeKind::Random)
                    .modulation("Trigger", ModSourceRef::node("first", "Out")),
            ),
    )
}

#[test]
fn every_consumer_sees_each_edge_once() {
    let mut voice = start(&clocked(), 1);
    let mut edges = 0;

    for _ in 0..1_000 {
        voice.tick();
        let edge = fired(&voice, "lfo");
        if edge {
            edges += 1;
        }
        assert_eq!(fired(&voice, "first"), edge);
        assert_eq!(fired(&voice, "second"), edge);
    }

    // 20 Hz at 500 ticks/s over 2 s
    assert!((39..=41).contains(&edges), "{edges} LFO wraps");
}

#[test]
fn edges_last_exactly_one_tick() {
    let mut voice = start(&clocked(), 1);
    let mut previous = false;
    for _ in 0..1_000 {
        voice.tick();
        let edge = fired(&voice, "lfo");
        assert!(!(edge && previous), "trigger held over two ticks");
        previous = edge;
    }
}

#[test]
fn forwarded_triggers_redraw_downstream() {
    let mut voice = start(&clocked(), 1);
    let mut draws = Vec::new();

    for _ in 0..1_000 {
        voice.tick();
        if fired(&voice, "chained") {
            draws.push(value(&voice, "chained"));
        }
    }

    // one draw on gate, then one per forwarded edge
    assert!(draws.len() >= 40);
    draws.dedup();
    assert!(draws.len() > 30, "draws should vary");
}

fn noisy(seed: f32) -> Patch {
    build(
        GraphDescription::new("noise").node(
            NodeDescriptor::new("noise", NodeKind::Noise)
                .modulation("Seed", ModSourceRef::Constant(seed)),
        ),
    )
}

#[test]
fn private_seed_is_independent_of_voice_rng() {
    let patch = noisy(0.375);
    let mut a = start(&patch, 11);
    let mut b = start(&patch, 99);
    a.tick();
    b.tick();

    assert!(a.output().peak_amplitude() > 0.0);
    assert!(a.output().bits_eq(b.output()));
}

#[test]
fn private_seed_restarts_on_fresh_notes() {
    let patch = noisy(0.375);
    let mut voice = start(&patch, 11);
    voice.tick();
    let first = voice.output().as_ref().clone();

    voice.note_on(NoteParams::from_midi(64, 100, 0, 12), true);
    voice.tick();
    assert!(voice.output().bits_eq(&first));
}

#[test]
fn zero_seed_tracks_voice_rng() {
    let patch = noisy(0.0);
    let mut a = start(&patch, 11);
    let mut b = start(&patch, 11);
    let mut c = start(&patch, 12);
    a.tick();
    b.tick();
    c.tick();

    assert!(a.output().bits_eq(b.output()), "same voice seed, same draw");
    assert!(!a.output().bits_eq(c.output()), "voice seed drives the draw");
}

#[test]
fn legato_retrigger_keeps_drawing_from_the_voice_rng() {
    let patch = noisy(0.0);
    let mut voice = start(&patch, 11);
    voice.tick();
    let first = voice.output().as_ref().clone();

    voice.note_on(NoteParams::from_midi(64, 100, 0, 11), false);
    voice.tick();
    assert!(!voice.output().bits_eq(&first));
}
