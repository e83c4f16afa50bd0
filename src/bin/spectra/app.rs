//! Spectra - engine worker thread and terminal runner

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use color_eyre::eyre::{eyre, Result as EyreResult};
use rtrb::{Consumer, Producer, RingBuffer};

use saavy_spectral::{io::spectrum_bins, Engine, EngineConfig, Patch, SynthMessage};

use crate::ui::{UiApp, UiState, SPECTRUM_BINS};

/// Highest frequency shown by the spectrum view.
pub const DISPLAY_MAX_HZ: f32 = 8_000.0;

/// How often the worker publishes a UI frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct Spectra {
    patch: Patch,
    config: EngineConfig,
}

impl Spectra {
    pub fn new(patch: Patch, config: EngineConfig) -> Self {
        Self { patch, config }
    }

    /// Run the application (takes over the terminal until quit)
    pub fn run(self) -> EyreResult<()> {
        let engine = Engine::new(&self.patch, self.config.clone())?;

        let (note_tx, note_rx) = RingBuffer::<SynthMessage>::new(256);
        let (state_tx, state_rx) = RingBuffer::<UiState>::new(8);
        let running = Arc::new(AtomicBool::new(true));

        let worker = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("spectra-engine".into())
                .spawn(move || engine_loop(engine, note_rx, state_tx, running))?
        };

        let mut terminal = ratatui::init();
        let mut app = UiApp::new(note_tx, state_rx, UiState::idle(&self.config));
        let result = app.run(&mut terminal);
        ratatui::restore();

        running.store(false, Ordering::Relaxed);
        worker
            .join()
            .map_err(|_| eyre!("engine thread panicked"))?;

        result
    }
}

/// Advance the engine in real time, feeding it notes and publishing frames.
fn engine_loop(
    mut engine: Engine,
    mut notes: Consumer<SynthMessage>,
    mut frames: Producer<UiState>,
    running: Arc<AtomicBool>,
) {
    let mut clock = FrameClock::new(engine.config().sample_rate);
    let start = Instant::now();

    while running.load(Ordering::Relaxed) {
        thread::sleep(FRAME_INTERVAL);

        engine.poll(&mut notes);
        engine.advance(clock.due(start.elapsed()));

        let snapshots = engine.snapshots();
        let state = UiState {
            bins: spectrum_bins(&snapshots, SPECTRUM_BINS, DISPLAY_MAX_HZ),
            exports: snapshots
                .first()
                .map(|snap| {
                    snap.exports
                        .iter()
                        .map(|(name, signal)| (name.clone(), signal.value))
                        .collect()
                })
                .unwrap_or_default(),
            voices: snapshots.len(),
            max_voices: engine.config().max_voices,
            control_rate: engine.config().control_rate(),
            ticks: engine.clock().ticks(),
        };

        // UI is behind: drop the frame rather than block the engine
        let _ = frames.push(state);
    }
}

/// Wall time to whole audio frames. Counts from the start so fractional
/// frames carry over instead of being dropped on every wakeup.
struct FrameClock {
    sample_rate: f64,
    sent: u64,
}

impl FrameClock {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: f64::from(sample_rate),
            sent: 0,
        }
    }

    /// Frames owed for `elapsed` since start, minus what was already handed out.
    fn due(&mut self, elapsed: Duration) -> usize {
        let total = (elapsed.as_secs_f64() * self.sample_rate) as u64;
        let due = total.saturating_sub(self.sent);
        self.sent += due;
        due as usize
    }
}
