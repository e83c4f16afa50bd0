//! Spectrum widget
//!
//! Draws the summed partial amplitudes of every sounding voice in dB.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

const FLOOR_DB: f64 = -80.0;

/// Bin amplitudes as (Hz, dB) points for the chart.
pub fn to_points(bins: &[f32], max_hz: f32) -> Vec<(f64, f64)> {
    let width = max_hz as f64 / bins.len().max(1) as f64;
    bins.iter()
        .enumerate()
        .map(|(i, &amp)| {
            let db = if amp > 0.0 {
                (20.0 * (amp as f64).log10()).max(FLOOR_DB)
            } else {
                FLOOR_DB
            };
            ((i as f64 + 0.5) * width, db)
        })
        .collect()
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)], max_hz: f32) {
    let block = Block::default()
        .title(" Partials ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let max_khz = format!("{:.0}k", max_hz / 1000.0);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_hz as f64])
                .labels(vec!["0".to_string(), max_khz])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 6.0])
                .labels(vec!["-80", "-40", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
