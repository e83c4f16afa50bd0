//! Publishes the voice's note parameters as modulation signals.
//!
//! Pitch is the MIDI note number over 127, so one semitone is 1/127 of the
//! range wherever the note sits. `Gate` holds 1.0 while the key is down and
//! triggers on the first tick after each gate.

use crate::graph::{
    kind::NodeKind,
    node::{NodeIo, Options, Ports, Processor, VoiceCtx},
};

pub const PITCH: usize = 0;
pub const VELOCITY: usize = 1;
pub const RELEASE_VELOCITY: usize = 2;
pub const AFTERTOUCH: usize = 3;
pub const GATE: usize = 4;

pub static PORTS: Ports = Ports {
    unit_inputs: &[],
    mod_inputs: &[],
    unit_outputs: &[],
    mod_outputs: &["Pitch", "Velocity", "ReleaseVelocity", "Aftertouch", "Gate"],
    options: &[],
};

/// Hz → MIDI note / 127, clamped to [0, 1]. Non-positive pitch maps to 0.
#[inline]
pub fn pitch_to_unit(hz: f32) -> f32 {
    if hz <= 0.0 || !hz.is_finite() {
        return 0.0;
    }
    let note = 69.0 + 12.0 * (hz / 440.0).log2();
    (note / 127.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct NoteInfoNode {
    options: Options,
    gate_pending: bool,
}

impl NoteInfoNode {
    pub fn new() -> Self {
        Self {
            options: Options::defaults(&PORTS),
            gate_pending: false,
        }
    }
}

impl Default for NoteInfoNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for NoteInfoNode {
    fn kind(&self) -> NodeKind {
        NodeKind::NoteInfo
    }

    fn instantiate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    fn reset(&mut self, _ctx: &VoiceCtx) {
        self.gate_pending = false;
    }

    fn gate(&mut self, _ctx: &VoiceCtx) {
        self.gate_pending = true;
    }

    fn go(&mut self, io: &mut NodeIo<'_>) {
        let voice = io.voice();
        let pitch = pitch_to_unit(voice.pitch);
        let velocity = voice.velocity;
        let release_velocity = voice.release_velocity;
        let aftertouch = voice.aftertouch;
        let gated = if voice.gated { 1.0 } else { 0.0 };

        io.set_mod(PITCH, pitch);
        io.set_mod(VELOCITY, velocity);
        io.set_mod(RELEASE_VELOCITY, release_velocity);
        io.set_mod(AFTERTOUCH, aftertouch);
        io.set_mod(GATE, gated);

        if self.gate_pending {
            self.gate_pending = false;
            io.trigger(GATE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::Rig;

    #[test]
    fn pitch_maps_through_midi_scale() {
        assert!((pitch_to_unit(440.0) - 69.0 / 127.0).abs() < 1e-6);
        assert_eq!(pitch_to_unit(0.0), 0.0);
        assert_eq!(pitch_to_unit(f32::NAN), 0.0);
        assert_eq!(pitch_to_unit(1.0e6), 1.0);
    }

    #[test]
    fn gate_triggers_once() {
        let mut rig = Rig::new(NodeKind::NoteInfo);
        rig.tick();
        assert!(!rig.mod_out(GATE).triggered);
        assert_eq!(rig.mod_out(GATE).value, 0.0);

        rig.gate();
        rig.tick();
        assert!(rig.mod_out(GATE).triggered);
        assert_eq!(rig.mod_out(GATE).value, 1.0);

        rig.tick();
        assert!(!rig.mod_out(GATE).triggered, "edge lasts one tick");
        assert_eq!(rig.mod_out(GATE).value, 1.0);

        rig.release();
        rig.tick();
        assert_eq!(rig.mod_out(GATE).value, 0.0);
    }

    #[test]
    fn voice_parameters_are_published() {
        let mut rig = Rig::new(NodeKind::NoteInfo);
        rig.ctx.velocity = 0.8;
        rig.ctx.aftertouch = 0.3;
        rig.ctx.release_velocity = 0.6;
        rig.tick();

        assert_eq!(rig.mod_out(VELOCITY).value, 0.8);
        assert_eq!(rig.mod_out(AFTERTOUCH).value, 0.3);
        assert_eq!(rig.mod_out(RELEASE_VELOCITY).value, 0.6);
        assert!(rig.mod_out(PITCH).value > 0.0);
    }
}
