use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::{
    error::{Error, Result},
    io::SpectralSnapshot,
    synth::{
        factory::VoiceFactory,
        message::SynthMessage,
        voice::{NoteParams, Voice, VoiceState},
    },
};

/// Channel and MIDI note a voice is sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteKey {
    pub channel: u8,
    pub note: u8,
}

impl NoteKey {
    pub fn new(channel: u8, note: u8) -> Self {
        Self { channel, note }
    }
}

struct Slot {
    voice: Voice,
    key: Option<NoteKey>,
}

/// Fixed pool of voices built from one patch.
///
/// Allocation takes the first free voice; when none is free the note is
/// refused. A note-on for a key that is still held re-gates its voice in place.
pub struct PolySynth {
    slots: Vec<Slot>,
    seeds: StdRng,
    parallel: bool,
}

impl PolySynth {
    pub fn new(
        factory: &impl VoiceFactory,
        control_rate: f32,
        max_voices: usize,
        seed: u64,
        parallel: bool,
    ) -> Self {
        let slots = (0..max_voices)
            .map(|_| Slot {
                voice: factory.create_voice(control_rate),
                key: None,
            })
            .collect();

        Self {
            slots,
            seeds: StdRng::seed_from_u64(seed),
            parallel,
        }
    }

    pub fn handle(&mut self, msg: SynthMessage) -> Result<()> {
        match msg {
            SynthMessage::NoteOn {
                channel,
                note,
                velocity,
            } => {
                // A zero velocity note-on is a note-off
                if velocity == 0 {
                    self.note_off(NoteKey::new(channel, note), 0);
                } else {
                    self.note_on(NoteKey::new(channel, note), velocity)?;
                }
            }
            SynthMessage::NoteOff {
                channel,
                note,
                velocity,
            } => {
                self.note_off(NoteKey::new(channel, note), velocity);
            }
            SynthMessage::Aftertouch {
                channel,
                note,
                pressure,
            } => self.aftertouch(NoteKey::new(channel, note), pressure),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
        Ok(())
    }

    /// Start a note and return the index of the voice sounding it.
    pub fn note_on(&mut self, key: NoteKey, velocity: u8) -> Result<usize> {
        let seed = self.seeds.gen::<u64>();
        let params = NoteParams::from_midi(key.note, velocity, key.channel, seed);

        if let Some(idx) = self.find(key) {
            debug!(voice = idx, note = key.note, "retrigger");
            self.slots[idx].voice.note_on(params, false);
            return Ok(idx);
        }

        let idx = self
            .slots
            .iter()
            .position(|slot| slot.voice.is_free())
            .ok_or(Error::VoicesExhausted(self.slots.len()))?;
        let slot = &mut self.slots[idx];
        slot.voice.note_on(params, true);
        slot.key = Some(key);
        debug!(voice = idx, note = key.note, channel = key.channel, "note on");
        Ok(idx)
    }

    /// Release the voice holding `key`. Returns false when no voice holds it.
    pub fn note_off(&mut self, key: NoteKey, velocity: u8) -> bool {
        match self.find(key) {
            Some(idx) => {
                self.slots[idx].voice.note_off(velocity as f32 / 127.0);
                debug!(voice = idx, note = key.note, "note off");
                true
            }
            None => false,
        }
    }

    pub fn aftertouch(&mut self, key: NoteKey, pressure: u8) {
        if let Some(idx) = self.find(key) {
            self.slots[idx].voice.set_aftertouch(pressure as f32 / 127.0);
        }
    }

    pub fn all_notes_off(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.voice.note_off(0.0);
        }
    }

    /// Advance every sounding voice by one control tick.
    pub fn tick(&mut self) {
        if self.parallel {
            self.slots
                .par_iter_mut()
                .filter(|slot| !slot.voice.is_free())
                .for_each(|slot| slot.voice.tick());
        } else {
            for slot in self.slots.iter_mut().filter(|slot| !slot.voice.is_free()) {
                slot.voice.tick();
            }
        }

        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.key.is_some() && slot.voice.is_free() {
                debug!(voice = idx, "voice finished");
                slot.key = None;
            }
        }
    }

    pub fn snapshots(&self) -> Vec<SpectralSnapshot> {
        self.slots
            .iter()
            .filter(|slot| !slot.voice.is_free())
            .map(|slot| slot.voice.snapshot())
            .collect()
    }

    pub fn active_voices(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.voice.is_free()).count()
    }

    pub fn max_voices(&self) -> usize {
        self.slots.len()
    }

    pub fn voice(&self, idx: usize) -> Option<&Voice> {
        self.slots.get(idx).map(|slot| &slot.voice)
    }

    pub fn key(&self, idx: usize) -> Option<NoteKey> {
        self.slots.get(idx).and_then(|slot| slot.key)
    }

    fn find(&self, key: NoteKey) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.key == Some(key) && slot.voice.state() == VoiceState::Active)
    }
}
