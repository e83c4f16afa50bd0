//! spectra - terminal viewer for the spectral engine
//!
//! Run with: cargo run --bin spectra

mod app;
mod patch;
mod ui;

use app::Spectra;
use saavy_spectral::EngineConfig;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = EngineConfig::default().with_max_voices(8).with_seed(0x5eed);

    Spectra::new(patch::demo()?, config).run()
}
