use std::{fmt, str::FromStr, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::tables::SharedTables,
    graph::{
        amplify, chord, envelope, fold, harmonics, lfo, mix, morph, noise, note_info,
        node::{Ports, Processor},
        random, sample_hold, smooth, wavetable,
    },
};

/// The closed set of node kinds a patch can instantiate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Unit sources
    Harmonics,
    Noise,
    Wavetable,
    // Unit effects
    Amplify,
    Mix,
    Fold,
    Dilate,
    Skeletonize,
    Chord,
    Smooth,
    // Modulation
    NoteInfo,
    Lfo,
    Envelope,
    SampleHold,
    Random,
}

impl NodeKind {
    pub const ALL: [NodeKind; 15] = [
        Self::Harmonics,
        Self::Noise,
        Self::Wavetable,
        Self::Amplify,
        Self::Mix,
        Self::Fold,
        Self::Dilate,
        Self::Skeletonize,
        Self::Chord,
        Self::Smooth,
        Self::NoteInfo,
        Self::Lfo,
        Self::Envelope,
        Self::SampleHold,
        Self::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Harmonics => "harmonics",
            Self::Noise => "noise",
            Self::Wavetable => "wavetable",
            Self::Amplify => "amplify",
            Self::Mix => "mix",
            Self::Fold => "fold",
            Self::Dilate => "dilate",
            Self::Skeletonize => "skeletonize",
            Self::Chord => "chord",
            Self::Smooth => "smooth",
            Self::NoteInfo => "note_info",
            Self::Lfo => "lfo",
            Self::Envelope => "envelope",
            Self::SampleHold => "sample_hold",
            Self::Random => "random",
        }
    }

    pub fn ports(self) -> &'static Ports {
        match self {
            Self::Harmonics => &harmonics::PORTS,
            Self::Noise => &noise::PORTS,
            Self::Wavetable => &wavetable::PORTS,
            Self::Amplify => &amplify::PORTS,
            Self::Mix => &mix::PORTS,
            Self::Fold => &fold::PORTS,
            Self::Dilate | Self::Skeletonize => &morph::PORTS,
            Self::Chord => &chord::PORTS,
            Self::Smooth => &smooth::PORTS,
            Self::NoteInfo => &note_info::PORTS,
            Self::Lfo => &lfo::PORTS,
            Self::Envelope => &envelope::PORTS,
            Self::SampleHold => &sample_hold::PORTS,
            Self::Random => &random::PORTS,
        }
    }

    /// Unit nodes produce partial buffers; the rest only modulation signals.
    pub fn is_unit(self) -> bool {
        !self.ports().unit_outputs.is_empty()
    }

    /// A prototype with default options.
    pub fn create(self, tables: &Arc<SharedTables>) -> Box<dyn Processor> {
        match self {
            Self::Harmonics => Box::new(harmonics::HarmonicsNode::new()),
            Self::Noise => Box::new(noise::NoiseNode::new()),
            Self::Wavetable => Box::new(wavetable::WavetableNode::new(Arc::clone(tables))),
            Self::Amplify => Box::new(amplify::AmplifyNode::new()),
            Self::Mix => Box::new(mix::MixNode::new()),
            Self::Fold => Box::new(fold::FoldNode::new()),
            Self::Dilate => Box::new(morph::MorphNode::dilate()),
            Self::Skeletonize => Box::new(morph::MorphNode::skeletonize()),
            Self::Chord => Box::new(chord::ChordNode::new(Arc::clone(tables))),
            Self::Smooth => Box::new(smooth::SmoothNode::new()),
            Self::NoteInfo => Box::new(note_info::NoteInfoNode::new()),
            Self::Lfo => Box::new(lfo::LfoNode::new()),
            Self::Envelope => Box::new(envelope::EnvelopeNode::new()),
            Self::SampleHold => Box::new(sample_hold::SampleHoldNode::new()),
            Self::Random => Box::new(random::RandomNode::new()),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown node kind '{s}'"))
    }
}
