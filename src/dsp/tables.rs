//! Process-wide lookup tables, built once before any voice exists.

use crate::{
    dsp::oscillator::OscillatorWaveform,
    error::{Error, Result},
    PARTIALS,
};

/// Number of entries in the semitone ratio table (three octaves plus unison).
pub const SEMITONES: usize = 37;

/// Chord shapes as semitone offsets from the root.
pub const CHORDS: &[&[u8]] = &[
    &[0, 4, 7],      // major
    &[0, 3, 7],      // minor
    &[0, 5, 7],      // sus4
    &[0, 2, 7],      // sus2
    &[0, 3, 6],      // diminished
    &[0, 4, 8],      // augmented
    &[0, 4, 7, 11],  // major 7
    &[0, 3, 7, 10],  // minor 7
    &[0, 4, 7, 10],  // dominant 7
    &[0, 7],         // power
    &[0, 12],        // octave
    &[0, 7, 12, 19], // stacked fifths
];

/// A harmonic table: rows of per-harmonic amplitudes a Wavetable node scans.
#[derive(Debug, Clone)]
pub struct HarmonicTable {
    rows: Vec<[f32; PARTIALS]>,
}

impl HarmonicTable {
    /// Build from rows of harmonic amplitudes. Short rows are zero padded;
    /// rows longer than PARTIALS, empty tables and non-finite or negative
    /// amplitudes are rejected.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidTable("table has no rows".into()));
        }

        let mut out = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            if row.len() > PARTIALS {
                return Err(Error::InvalidTable(format!(
                    "row {r} has {} harmonics, at most {PARTIALS} allowed",
                    row.len()
                )));
            }
            if row.iter().any(|a| !a.is_finite() || *a < 0.0) {
                return Err(Error::InvalidTable(format!(
                    "row {r} contains a negative or non-finite amplitude"
                )));
            }
            let mut padded = [0.0; PARTIALS];
            padded[..row.len()].copy_from_slice(row);
            out.push(padded);
        }

        Ok(Self { rows: out })
    }

    /// Morph through the classic shapes: sine, triangle, square, saw.
    pub fn classic() -> Self {
        let shapes = [
            OscillatorWaveform::Sine,
            OscillatorWaveform::Triangle,
            OscillatorWaveform::Square,
            OscillatorWaveform::Saw,
        ];
        let rows = shapes
            .iter()
            .map(|shape| std::array::from_fn(|k| shape.harmonic_amplitude(k + 1)))
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> &[f32; PARTIALS] {
        &self.rows[index.min(self.rows.len() - 1)]
    }
}

/// Immutable data shared by every voice.
///
/// Build it once at startup, wrap it in an `Arc`, and hand it to
/// `Patch::build`. Nodes keep the `Arc`; cloning a voice never copies tables.
#[derive(Debug, Clone)]
pub struct SharedTables {
    semitone_ratios: [f32; SEMITONES],
    harmonic_tables: Vec<HarmonicTable>,
}

impl SharedTables {
    /// Built-in tables only: semitone ratios and the classic harmonic table.
    pub fn new() -> Self {
        Self {
            semitone_ratios: std::array::from_fn(|s| 2.0f32.powf(s as f32 / 12.0)),
            harmonic_tables: vec![HarmonicTable::classic()],
        }
    }

    /// Append a loaded harmonic table; it gets the next table index.
    pub fn with_table(mut self, table: HarmonicTable) -> Self {
        self.harmonic_tables.push(table);
        self
    }

    /// Frequency ratio for a semitone offset, clamped to the table.
    #[inline]
    pub fn semitone_ratio(&self, semitones: u8) -> f32 {
        self.semitone_ratios[(semitones as usize).min(SEMITONES - 1)]
    }

    pub fn semitone_ratios(&self) -> &[f32; SEMITONES] {
        &self.semitone_ratios
    }

    pub fn chord(&self, index: usize) -> &'static [u8] {
        CHORDS[index.min(CHORDS.len() - 1)]
    }

    pub fn harmonic_table(&self, index: usize) -> &HarmonicTable {
        &self.harmonic_tables[index.min(self.harmonic_tables.len() - 1)]
    }
}

impl Default for SharedTables {
    fn default() -> Self {
        Self::new()
    }
}
