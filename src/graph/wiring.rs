use crate::{dsp::modulation::clamp_unit, graph::node::Ports};

/// Where a unit input reads from, resolved to evaluation positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitSource {
    /// Unwired: reads the silent buffer.
    Nil,
    Node { node: usize, channel: usize },
}

/// Where a modulation input reads from, resolved to evaluation positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModSource {
    /// Unwired or explicitly constant. Constants never trigger.
    Constant(f32),
    Node { node: usize, channel: usize },
}

impl ModSource {
    /// A constant source, clamped like every other modulation value.
    pub fn constant(value: f32) -> Self {
        Self::Constant(clamp_unit(value))
    }
}

/// Resolved input wiring of one node, indexed by port.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeWiring {
    pub units: Vec<UnitSource>,
    pub mods: Vec<ModSource>,
}

impl NodeWiring {
    /// Every unit input silent, every modulation input at its default.
    pub fn unwired(ports: &Ports) -> Self {
        Self {
            units: vec![UnitSource::Nil; ports.unit_inputs.len()],
            mods: ports
                .mod_inputs
                .iter()
                .map(|port| ModSource::constant(port.default))
                .collect(),
        }
    }

    /// Evaluation positions this node reads from.
    pub fn upstream(&self) -> impl Iterator<Item = usize> + '_ {
        let units = self.units.iter().filter_map(|source| match source {
            UnitSource::Node { node, .. } => Some(*node),
            UnitSource::Nil => None,
        });
        let mods = self.mods.iter().filter_map(|source| match source {
            ModSource::Node { node, .. } => Some(*node),
            ModSource::Constant(_) => None,
        });
        units.chain(mods)
    }

    /// Rewrite node references through `map` (old position → new position).
    pub(crate) fn remap(&mut self, map: &[usize]) {
        for source in self.units.iter_mut() {
            if let UnitSource::Node { node, .. } = source {
                *node = map[*node];
            }
        }
        for source in self.mods.iter_mut() {
            if let ModSource::Node { node, .. } = source {
                *node = map[*node];
            }
        }
    }
}
