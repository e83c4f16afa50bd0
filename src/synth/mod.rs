// Purpose: Voice management, polyphony, note messages
// This layer sits above the graph and drives one evaluation per voice per tick

pub mod factory;
pub mod message;
pub mod poly;
pub mod voice;

pub use factory::VoiceFactory;
pub use message::{MessageReceiver, SynthMessage};
pub use poly::{NoteKey, PolySynth};
pub use voice::{NoteParams, Voice, VoiceState};
