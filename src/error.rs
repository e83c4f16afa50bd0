//! Error types for saavy_spectral.
//!
//! Everything here is a build-time or host-level failure. The per-tick path
//! (`Processor::go`) never produces errors; numerical trouble is recovered
//! locally inside the nodes.

use thiserror::Error;

/// Result type alias for saavy_spectral operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building patches or driving voices.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The graph description has no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Two nodes share an id.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    /// Wiring or output designation names a node that does not exist.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// Wiring names an input port the node kind does not declare.
    #[error("node '{node}' has no {kind} input port '{port}'")]
    UnknownPort {
        node: String,
        kind: &'static str,
        port: String,
    },

    /// Wiring names an output channel the source node does not declare.
    #[error("node '{node}' has no {kind} output channel '{channel}'")]
    UnknownChannel {
        node: String,
        kind: &'static str,
        channel: String,
    },

    /// Option index outside the node kind's option list.
    #[error("node '{node}' has no option at index {index}")]
    UnknownOption { node: String, index: usize },

    /// Option value outside its declared range.
    #[error("option '{option}' of node '{node}' must be in {min}..={max}, got {value}")]
    OptionOutOfRange {
        node: String,
        option: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// The wiring contains a cycle through the named node.
    #[error("cyclic wiring through node '{0}'")]
    CyclicGraph(String),

    /// A harmonic table failed validation.
    #[error("invalid harmonic table: {0}")]
    InvalidTable(String),

    /// Invalid engine configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No free voice for a new note.
    #[error("all {0} voices are busy")]
    VoicesExhausted(usize),
}
