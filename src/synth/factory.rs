use crate::{patch::Patch, synth::voice::Voice};

/// Factory for creating voices with a specific patch
///
/// The patch is validated and ordered once; every voice the engine holds is
/// an independent instance of it.
pub trait VoiceFactory: Send {
    fn create_voice(&self, control_rate: f32) -> Voice;
}

impl VoiceFactory for Patch {
    fn create_voice(&self, control_rate: f32) -> Voice {
        Voice::new(self, control_rate)
    }
}

impl<F> VoiceFactory for F
where
    F: Fn(f32) -> Voice + Send,
{
    fn create_voice(&self, control_rate: f32) -> Voice {
        self(control_rate)
    }
}
