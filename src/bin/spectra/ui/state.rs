//! Frame state sent from the engine thread to the UI

use saavy_spectral::EngineConfig;

#[derive(Clone, Debug)]
pub struct UiState {
    /// Summed partial amplitude per linear frequency bin
    pub bins: Vec<f32>,
    /// Exported modulation values of the first sounding voice
    pub exports: Vec<(String, f32)>,
    pub voices: usize,
    pub max_voices: usize,
    pub control_rate: f32,
    /// Control ticks since start
    pub ticks: u64,
}

impl UiState {
    pub fn idle(config: &EngineConfig) -> Self {
        Self {
            bins: Vec::new(),
            exports: Vec::new(),
            voices: 0,
            max_voices: config.max_voices,
            control_rate: config.control_rate(),
            ticks: 0,
        }
    }
}
