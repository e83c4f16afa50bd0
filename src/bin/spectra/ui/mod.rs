//! TUI module for spectra
//!
//! Plays notes from the computer keyboard and shows the live partial spectrum.

pub mod state;
mod spectrum;
mod status;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use saavy_spectral::SynthMessage;

pub use state::UiState;

use crate::app::DISPLAY_MAX_HZ;
use spectrum::{render_spectrum, to_points};
use status::{render_exports, render_status};

pub const SPECTRUM_BINS: usize = 128;

/// Lower piano row, starting at C3.
const KEYS: &str = "awsedftgyhujk";
const BASE_NOTE: u8 = 48;

/// MIDI note for a key on the lower piano row.
pub fn key_to_note(key: char, octave: i8) -> Option<u8> {
    let offset = KEYS.find(key.to_ascii_lowercase())? as i16;
    let note = BASE_NOTE as i16 + offset + 12 * octave as i16;
    u8::try_from(note).ok().filter(|n| *n <= 127)
}

pub struct UiApp {
    /// Ring buffer sender for note messages
    note_tx: Producer<SynthMessage>,
    /// Ring buffer receiver for engine frames
    state_rx: Consumer<UiState>,
    current_state: UiState,
    /// Notes toggled on from the keyboard
    held: Vec<u8>,
    octave: i8,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        note_tx: Producer<SynthMessage>,
        state_rx: Consumer<UiState>,
        initial_state: UiState,
    ) -> Self {
        Self {
            note_tx,
            state_rx,
            current_state: initial_state,
            held: Vec::new(),
            octave: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.release_all();
        Ok(())
    }

    fn poll_state(&mut self) {
        // Keep only the latest state
        while let Ok(state) = self.state_rx.pop() {
            self.current_state = state;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char(' ') => self.release_all(),
            KeyCode::Char('z') => self.octave = (self.octave - 1).max(-3),
            KeyCode::Char('x') => self.octave = (self.octave + 1).min(3),
            KeyCode::Char(c) => {
                if let Some(note) = key_to_note(c, self.octave) {
                    self.toggle(note);
                }
            }
            _ => {}
        }
    }

    /// Terminals report presses only, so keys latch notes on and off.
    fn toggle(&mut self, note: u8) {
        let msg = if let Some(pos) = self.held.iter().position(|n| *n == note) {
            self.held.remove(pos);
            SynthMessage::NoteOff {
                channel: 0,
                note,
                velocity: 64,
            }
        } else {
            self.held.push(note);
            SynthMessage::NoteOn {
                channel: 0,
                note,
                velocity: 100,
            }
        };
        let _ = self.note_tx.push(msg);
    }

    fn release_all(&mut self) {
        self.held.clear();
        let _ = self.note_tx.push(SynthMessage::AllNotesOff);
    }

    fn render(&self, frame: &mut Frame) {
        let exports_height = self.current_state.exports.len() as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // Status bar
                Constraint::Min(8),                 // Spectrum
                Constraint::Length(exports_height), // Exported signals
                Constraint::Length(1),              // Help bar
            ])
            .split(frame.area());

        render_status(frame, chunks[0], &self.current_state, &self.held);

        let points = to_points(&self.current_state.bins, DISPLAY_MAX_HZ);
        render_spectrum(frame, chunks[1], &points, DISPLAY_MAX_HZ);

        render_exports(frame, chunks[2], &self.current_state);

        let help = Paragraph::new(" [A-K] Toggle note  [Z/X] Octave  [Space] All off  [Esc] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
