use std::{collections::HashMap, sync::Arc};

use petgraph::{algo::toposort, graph::DiGraph};
use tracing::debug;

use crate::{
    dsp::{partials::PartialBuffer, tables::SharedTables},
    error::{Error, Result},
    graph::{
        node::Processor,
        wiring::{ModSource, NodeWiring, UnitSource},
        NodeKind,
    },
    patch::{GraphDescription, ModSourceRef, NodeDescriptor, UnitSourceRef},
};

/// A modulation channel surfaced with every snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub name: String,
    pub node: usize,
    pub channel: usize,
}

/// Everything voices share about a patch: evaluation order and wiring.
///
/// Node positions are evaluation positions; wiring always points to an
/// earlier position.
#[derive(Debug)]
pub struct Topology {
    ids: Vec<String>,
    kinds: Vec<NodeKind>,
    wiring: Vec<NodeWiring>,
    output: usize,
    exports: Vec<Export>,
    silence: Arc<PartialBuffer>,
}

impl Topology {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids in evaluation order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn kinds(&self) -> &[NodeKind] {
        &self.kinds
    }

    pub fn wiring(&self) -> &[NodeWiring] {
        &self.wiring
    }

    /// Evaluation position of the output node.
    pub fn output(&self) -> usize {
        self.output
    }

    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// The buffer unwired unit inputs read.
    pub fn silence(&self) -> &Arc<PartialBuffer> {
        &self.silence
    }
}

/// A validated patch: one prototype per node plus the shared topology.
pub struct Patch {
    prototypes: Vec<Box<dyn Processor>>,
    topology: Arc<Topology>,
    tables: Arc<SharedTables>,
}

impl std::fmt::Debug for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patch")
            .field("prototypes", &self.prototypes.len())
            .field("topology", &self.topology)
            .finish_non_exhaustive()
    }
}

impl Patch {
    /// Validate `desc` against the node catalog and order it for evaluation.
    ///
    /// Rejects empty graphs, duplicate ids, unknown nodes, ports and channels,
    /// bad option indices or values, and cyclic wiring.
    pub fn build(desc: &GraphDescription, tables: Arc<SharedTables>) -> Result<Self> {
        if desc.nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(desc.nodes.len());
        for (i, node) in desc.nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
        }

        let mut prototypes = Vec::with_capacity(desc.nodes.len());
        let mut wiring = Vec::with_capacity(desc.nodes.len());
        for node in &desc.nodes {
            let mut proto = node.kind.create(&tables);
            for option in &node.options {
                proto
                    .options_mut()
                    .set(&node.id, option.index, option.value)?;
            }
            prototypes.push(proto);
            wiring.push(resolve_wiring(node, desc, &index)?);
        }

        let order = evaluation_order(desc, &wiring)?;

        // old position → evaluation position
        let mut position = vec![0; order.len()];
        for (new, &old) in order.iter().enumerate() {
            position[old] = new;
        }

        let mut slots: Vec<Option<Box<dyn Processor>>> =
            prototypes.into_iter().map(Some).collect();
        let mut sorted_prototypes = Vec::with_capacity(order.len());
        let mut sorted_wiring = Vec::with_capacity(order.len());
        let mut ids = Vec::with_capacity(order.len());
        let mut kinds = Vec::with_capacity(order.len());
        for &old in &order {
            if let Some(proto) = slots[old].take() {
                sorted_prototypes.push(proto);
            }
            let mut node_wiring = wiring[old].clone();
            node_wiring.remap(&position);
            sorted_wiring.push(node_wiring);
            ids.push(desc.nodes[old].id.clone());
            kinds.push(desc.nodes[old].kind);
        }

        let output = resolve_output(desc, &index)?;
        let exports = desc
            .exports
            .iter()
            .map(|export| {
                let (node, channel) =
                    resolve_mod_channel(desc, &index, &export.node, &export.channel)?;
                Ok(Export {
                    name: export.name.clone(),
                    node: position[node],
                    channel,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(nodes = ids.len(), order = ?ids, output = %desc.output, "patch built");

        Ok(Self {
            prototypes: sorted_prototypes,
            topology: Arc::new(Topology {
                ids,
                kinds,
                wiring: sorted_wiring,
                output: position[output],
                exports,
                silence: Arc::new(PartialBuffer::silent()),
            }),
            tables,
        })
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn tables(&self) -> &Arc<SharedTables> {
        &self.tables
    }

    /// Fresh per-voice copies of every prototype, in evaluation order.
    pub fn instantiate(&self) -> Vec<Box<dyn Processor>> {
        self.prototypes.iter().map(|proto| proto.instantiate()).collect()
    }

    /// Change an option on a prototype. Voices created afterwards pick it up.
    pub fn set_option(&mut self, id: &str, index: usize, value: i32) -> Result<()> {
        let position = self
            .topology
            .position(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))?;
        self.prototypes[position].options_mut().set(id, index, value)
    }

    pub fn option(&self, id: &str, index: usize) -> Option<i32> {
        let position = self.topology.position(id)?;
        self.prototypes[position].option(index)
    }
}

fn lookup(index: &HashMap<&str, usize>, id: &str) -> Result<usize> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| Error::UnknownNode(id.to_string()))
}

fn resolve_wiring(
    node: &NodeDescriptor,
    desc: &GraphDescription,
    index: &HashMap<&str, usize>,
) -> Result<NodeWiring> {
    let ports = node.kind.ports();
    let mut wiring = NodeWiring::unwired(ports);

    for (port, source) in &node.units {
        let slot = ports.unit_input(port).ok_or_else(|| Error::UnknownPort {
            node: node.id.clone(),
            kind: "unit",
            port: port.clone(),
        })?;
        wiring.units[slot] = match source {
            UnitSourceRef::Nil => UnitSource::Nil,
            UnitSourceRef::Node {
                node: source,
                channel,
            } => {
                let upstream = lookup(index, source)?;
                let channel = desc.nodes[upstream]
                    .kind
                    .ports()
                    .unit_output(channel)
                    .ok_or_else(|| Error::UnknownChannel {
                        node: source.clone(),
                        kind: "unit",
                        channel: channel.clone(),
                    })?;
                UnitSource::Node {
                    node: upstream,
                    channel,
                }
            }
        };
    }

    for (port, source) in &node.mods {
        let slot = ports.mod_input(port).ok_or_else(|| Error::UnknownPort {
            node: node.id.clone(),
            kind: "modulation",
            port: port.clone(),
        })?;
        wiring.mods[slot] = match source {
            ModSourceRef::Constant(value) => ModSource::constant(*value),
            ModSourceRef::Node {
                node: source,
                channel,
            } => {
                let (upstream, channel) = resolve_mod_channel(desc, index, source, channel)?;
                ModSource::Node {
                    node: upstream,
                    channel,
                }
            }
        };
    }

    Ok(wiring)
}

fn resolve_mod_channel(
    desc: &GraphDescription,
    index: &HashMap<&str, usize>,
    node: &str,
    channel: &str,
) -> Result<(usize, usize)> {
    let upstream = lookup(index, node)?;
    let channel = desc.nodes[upstream]
        .kind
        .ports()
        .mod_output(channel)
        .ok_or_else(|| Error::UnknownChannel {
            node: node.to_string(),
            kind: "modulation",
            channel: channel.to_string(),
        })?;
    Ok((upstream, channel))
}

fn resolve_output(desc: &GraphDescription, index: &HashMap<&str, usize>) -> Result<usize> {
    let output = lookup(index, &desc.output)?;
    if !desc.nodes[output].kind.is_unit() {
        return Err(Error::UnknownChannel {
            node: desc.output.clone(),
            kind: "unit",
            channel: "Out".to_string(),
        });
    }
    Ok(output)
}

/// Topological order over description positions.
fn evaluation_order(desc: &GraphDescription, wiring: &[NodeWiring]) -> Result<Vec<usize>> {
    let mut graph = DiGraph::<usize, ()>::with_capacity(wiring.len(), 0);
    let nodes: Vec<_> = (0..wiring.len()).map(|i| graph.add_node(i)).collect();
    for (i, node_wiring) in wiring.iter().enumerate() {
        for upstream in node_wiring.upstream() {
            graph.add_edge(nodes[upstream], nodes[i], ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.iter().map(|&idx| graph[idx]).collect()),
        Err(cycle) => {
            let culprit = graph[cycle.node_id()];
            Err(Error::CyclicGraph(desc.nodes[culprit].id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Arc<SharedTables> {
        Arc::new(SharedTables::new())
    }

    /// Declared downstream-first so the builder has to reorder.
    fn simple() -> GraphDescription {
        GraphDescription::new("amp")
            .node(
                NodeDescriptor::new("amp", NodeKind::Amplify)
                    .unit("In", UnitSourceRef::node("osc", "Out"))
                    .modulation("Gain", ModSourceRef::node("env", "Out")),
            )
            .node(NodeDescriptor::new("env", NodeKind::Envelope))
            .node(NodeDescriptor::new("osc", NodeKind::Harmonics).option(0, 2))
            .export("env", "env", "Out")
    }

    #[test]
    fn builds_in_dependency_order() {
        let patch = Patch::build(&simple(), tables()).unwrap();
        let topo = patch.topology();

        let amp = topo.position("amp").unwrap();
        assert!(topo.position("osc").unwrap() < amp);
        assert!(topo.position("env").unwrap() < amp);
        assert_eq!(topo.output(), amp);
        assert_eq!(topo.exports()[0].node, topo.position("env").unwrap());
        for (i, wiring) in topo.wiring().iter().enumerate() {
            assert!(wiring.upstream().all(|up| up < i));
        }
        assert_eq!(patch.option("osc", 0), Some(2));
    }

    #[test]
    fn rejects_empty_and_duplicate() {
        assert_eq!(
            Patch::build(&GraphDescription::new("x"), tables()).err(),
            Some(Error::EmptyGraph)
        );

        let desc = GraphDescription::new("a")
            .node(NodeDescriptor::new("a", NodeKind::Harmonics))
            .node(NodeDescriptor::new("a", NodeKind::Noise));
        assert_eq!(
            Patch::build(&desc, tables()).err(),
            Some(Error::DuplicateNode("a".into()))
        );
    }

    #[test]
    fn rejects_unknown_references() {
        let unknown_node = GraphDescription::new("amp").node(
            NodeDescriptor::new("amp", NodeKind::Amplify).unit("In", UnitSourceRef::node("ghost", "Out")),
        );
        assert_eq!(
            Patch::build(&unknown_node, tables()).err(),
            Some(Error::UnknownNode("ghost".into()))
        );

        let unknown_port = GraphDescription::new("amp")
            .node(NodeDescriptor::new("amp", NodeKind::Amplify).modulation("Volume", ModSourceRef::Constant(0.5)));
        assert!(matches!(
            Patch::build(&unknown_port, tables()),
            Err(Error::UnknownPort { kind: "modulation", .. })
        ));

        let unknown_channel = GraphDescription::new("amp")
            .node(NodeDescriptor::new("lfo", NodeKind::Lfo))
            .node(NodeDescriptor::new("amp", NodeKind::Amplify).modulation("Gain", ModSourceRef::node("lfo", "End")));
        assert!(matches!(
            Patch::build(&unknown_channel, tables()),
            Err(Error::UnknownChannel { kind: "modulation", .. })
        ));
    }

    #[test]
    fn rejects_bad_options() {
        let bad_index = GraphDescription::new("osc").node(NodeDescriptor::new("osc", NodeKind::Harmonics).option(3, 0));
        assert_eq!(
            Patch::build(&bad_index, tables()).err(),
            Some(Error::UnknownOption {
                node: "osc".into(),
                index: 3
            })
        );

        let bad_value = GraphDescription::new("osc").node(NodeDescriptor::new("osc", NodeKind::Harmonics).option(0, 9));
        assert!(matches!(
            Patch::build(&bad_value, tables()),
            Err(Error::OptionOutOfRange { value: 9, .. })
        ));
    }

    #[test]
    fn rejects_cycles() {
        let desc = GraphDescription::new("a")
            .node(NodeDescriptor::new("a", NodeKind::Amplify).unit("In", UnitSourceRef::node("b", "Out")))
            .node(NodeDescriptor::new("b", NodeKind::Smooth).unit("In", UnitSourceRef::node("a", "Out")));
        assert!(matches!(
            Patch::build(&desc, tables()),
            Err(Error::CyclicGraph(_))
        ));

        let self_loop = GraphDescription::new("s").node(
            NodeDescriptor::new("s", NodeKind::SampleHold).modulation("In", ModSourceRef::node("s", "Out")),
        );
        assert!(matches!(
            Patch::build(&self_loop, tables()),
            Err(Error::CyclicGraph(_))
        ));
    }

    #[test]
    fn output_must_be_a_unit_node() {
        let desc = GraphDescription::new("lfo").node(NodeDescriptor::new("lfo", NodeKind::Lfo));
        assert!(matches!(
            Patch::build(&desc, tables()),
            Err(Error::UnknownChannel { kind: "unit", .. })
        ));
    }

    #[test]
    fn prototype_options_apply_to_new_instances() {
        let mut patch = Patch::build(&simple(), tables()).unwrap();
        patch.set_option("osc", 0, 3).unwrap();

        let osc = patch.topology().position("osc").unwrap();
        assert_eq!(patch.instantiate()[osc].option(0), Some(3));
        assert!(patch.set_option("ghost", 0, 0).is_err());
    }
}
