//! Patch descriptions and their validated, topologically ordered form.
//!
//! A `GraphDescription` is plain data, the shape a patch loader or editor
//! hands over: node ids and kinds, option values by index, wiring by port and
//! channel name. `Patch::build` checks it against the node catalog and turns
//! it into a `Patch` whose prototypes voices instantiate from.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::NodeKind;

mod builder;

pub use builder::{Export, Patch, Topology};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDescription {
    pub nodes: Vec<NodeDescriptor>,
    /// Id of the unit node whose `Out` channel is the voice's spectrum.
    pub output: String,
    /// Modulation channels surfaced to the host with each snapshot.
    pub exports: Vec<ExportDescriptor>,
}

impl GraphDescription {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            output: output.into(),
            exports: Vec::new(),
        }
    }

    pub fn node(mut self, node: NodeDescriptor) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn export(
        mut self,
        name: impl Into<String>,
        node: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        self.exports.push(ExportDescriptor {
            name: name.into(),
            node: node.into(),
            channel: channel.into(),
        });
        self
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub id: String,
    pub kind: NodeKind,
    pub options: Vec<OptionValue>,
    /// Unit input port name → source. Unlisted ports read silence.
    pub units: Vec<(String, UnitSourceRef)>,
    /// Modulation input port name → source. Unlisted ports read their default.
    pub mods: Vec<(String, ModSourceRef)>,
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            options: Vec::new(),
            units: Vec::new(),
            mods: Vec::new(),
        }
    }

    pub fn option(mut self, index: usize, value: i32) -> Self {
        self.options.push(OptionValue { index, value });
        self
    }

    pub fn unit(mut self, port: impl Into<String>, source: UnitSourceRef) -> Self {
        self.units.push((port.into(), source));
        self
    }

    pub fn modulation(mut self, port: impl Into<String>, source: ModSourceRef) -> Self {
        self.mods.push((port.into(), source));
        self
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionValue {
    pub index: usize,
    pub value: i32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum UnitSourceRef {
    Nil,
    Node { node: String, channel: String },
}

impl UnitSourceRef {
    pub fn node(node: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::Node {
            node: node.into(),
            channel: channel.into(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ModSourceRef {
    Constant(f32),
    Node { node: String, channel: String },
}

impl ModSourceRef {
    pub fn node(node: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::Node {
            node: node.into(),
            channel: channel.into(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDescriptor {
    pub name: String,
    pub node: String,
    pub channel: String,
}
