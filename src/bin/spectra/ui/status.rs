//! Status bar widget - voices, control rate, held notes and exported signals

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::UiState;

pub fn render_status(frame: &mut Frame, area: Rect, state: &UiState, held: &[u8]) {
    let block = Block::default()
        .title(" spectra ")
        .borders(Borders::ALL);

    let held = held
        .iter()
        .map(|note| note.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let line = Line::from(vec![
        Span::styled(
            format!(" Voices: {}/{}  ", state.voices, state.max_voices),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{:.0} Hz control  ", state.control_rate),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("tick {}  ", state.ticks),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Held: [{}]", held),
            Style::default().fg(Color::Green),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// One gauge row per exported modulation channel.
pub fn render_exports(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default()
        .title(" Exports ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (row, (name, value)) in state.exports.iter().enumerate() {
        if row as u16 >= inner.height {
            break;
        }
        let line = Rect {
            y: inner.y + row as u16,
            height: 1,
            ..inner
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(value.clamp(0.0, 1.0) as f64)
            .label(format!("{name} {value:.2}"));
        frame.render_widget(gauge, line);
    }
}
