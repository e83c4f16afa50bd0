// Purpose - external interfaces: what a renderer reads back from the engine

use std::sync::Arc;

use crate::dsp::{modulation::ModSignal, partials::PartialBuffer};

/// One voice's spectrum for a renderer, taken between ticks.
///
/// `partials` shares the output node's buffer; frequencies are in multiples
/// of `pitch`.
#[derive(Debug, Clone)]
pub struct SpectralSnapshot {
    pub pitch: f32,
    pub channel: u8,
    pub partials: Arc<PartialBuffer>,
    pub exports: Vec<(String, ModSignal)>,
}

impl SpectralSnapshot {
    pub fn export(&self, name: &str) -> Option<ModSignal> {
        self.exports
            .iter()
            .find(|(export, _)| export == name)
            .map(|(_, signal)| *signal)
    }

    /// Audible partials as (Hz, amplitude), skipping silent and non-positive
    /// frequency entries.
    pub fn hz_partials(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        let pitch = self.pitch;
        self.partials
            .freq
            .iter()
            .zip(self.partials.amp.iter())
            .filter(|(&f, &a)| f > 0.0 && a > 0.0)
            .map(move |(&f, &a)| (f * pitch, a))
    }
}

/// Accumulate the partials of every snapshot into `bins` linear bins between
/// 0 Hz and `max_hz`. Partials at or above `max_hz` are dropped.
pub fn spectrum_bins(snapshots: &[SpectralSnapshot], bins: usize, max_hz: f32) -> Vec<f32> {
    let mut out = vec![0.0; bins];
    if bins == 0 || max_hz <= 0.0 {
        return out;
    }
    let width = max_hz / bins as f32;
    for (hz, amp) in snapshots.iter().flat_map(|snap| snap.hz_partials()) {
        let bin = (hz / width) as usize;
        if bin < bins {
            out[bin] += amp;
        }
    }
    out
}
