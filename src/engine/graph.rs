//! Continuity graphs.
//!
//! Two undirected graphs over terminal nodes are built every cycle:
//!
//! - the **open graph**: wires, device internal contacts, supply N-E bonds
//!   and plug bridges. Loads do not conduct.
//! - the **closed graph**: the open graph plus one line-neutral bridge per
//!   load, so loads that are not yet proven energized still count as a path
//!   for leakage reasoning.
//!
//! Both passes go through [`Adjacency::add_edge`], the only way an edge is
//! ever inserted.

use std::collections::HashMap;

use tracing::debug;

use crate::devices::TerminalDef;
use crate::diagram::{ComponentInstance, NodeId, TerminalRole, Wire};

/// Undirected adjacency map over nodes.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    edges: HashMap<NodeId, Vec<NodeId>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an undirected edge. Both directions are always recorded.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        self.edges.entry(b.clone()).or_default().push(a.clone());
        if a != b {
            self.edges.entry(a).or_default().push(b);
        }
    }

    /// Neighbours of a node; empty for nodes not in the graph.
    pub fn neighbors(&self, node: &NodeId) -> &[NodeId] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.edges.contains_key(node)
    }

    pub fn is_adjacent(&self, a: &NodeId, b: &NodeId) -> bool {
        self.neighbors(a).contains(b)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.edges.keys()
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of undirected edges (parallel edges counted separately).
    pub fn edge_count(&self) -> usize {
        let ends: usize = self.edges.values().map(Vec::len).sum();
        ends / 2
    }
}

/// Component lookup by id for one snapshot.
pub(crate) struct InstanceIndex<'a> {
    by_id: HashMap<&'a str, &'a ComponentInstance>,
}

impl<'a> InstanceIndex<'a> {
    pub(crate) fn new(instances: &'a [ComponentInstance]) -> Self {
        let mut by_id = HashMap::with_capacity(instances.len());
        for inst in instances {
            // First instance wins on duplicate ids
            by_id.entry(inst.id.as_str()).or_insert(inst);
        }
        Self { by_id }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&'a ComponentInstance> {
        self.by_id.get(id).copied()
    }

    /// Terminal definition a node refers to, if both component and terminal
    /// exist.
    pub(crate) fn terminal(&self, node: &NodeId) -> Option<&'static TerminalDef> {
        self.get(node.component.as_str())?
            .device
            .definition()
            .terminal(&node.terminal)
    }

    pub(crate) fn resolves(&self, node: &NodeId) -> bool {
        self.terminal(node).is_some()
    }

    pub(crate) fn role_of(&self, node: &NodeId) -> Option<TerminalRole> {
        self.terminal(node).map(|t| t.role)
    }
}

/// Build the open graph.
pub fn build_open_graph(instances: &[ComponentInstance], wires: &[Wire]) -> Adjacency {
    let index = InstanceIndex::new(instances);
    let mut graph = Adjacency::new();

    add_wire_edges(&mut graph, &index, wires);
    add_internal_edges(&mut graph, instances);
    add_supply_bonds(&mut graph, instances);
    add_plug_bridges(&mut graph, &index, instances);

    graph
}

/// Build the closed graph: the open graph with every load bridged.
pub fn build_closed_graph(instances: &[ComponentInstance], wires: &[Wire]) -> Adjacency {
    with_load_bridges(build_open_graph(instances, wires), instances)
}

/// Turn an open graph into the closed graph of the same snapshot.
pub fn with_load_bridges(mut graph: Adjacency, instances: &[ComponentInstance]) -> Adjacency {
    for inst in instances {
        let def = inst.device.definition();
        if !def.is_load() {
            continue;
        }
        if let Some((live, neutral)) = def.energy_terminals() {
            graph.add_edge(inst.node(live), inst.node(neutral));
        }
    }
    graph
}

fn add_wire_edges(graph: &mut Adjacency, index: &InstanceIndex<'_>, wires: &[Wire]) {
    for wire in wires {
        if index.resolves(&wire.from) && index.resolves(&wire.to) {
            graph.add_edge(wire.from.clone(), wire.to.clone());
        } else {
            debug!(wire = %wire.id, "skipping wire with dangling endpoint");
        }
    }
}

fn add_internal_edges(graph: &mut Adjacency, instances: &[ComponentInstance]) {
    for inst in instances {
        for (a, b) in inst.device.closed_pairs() {
            graph.add_edge(inst.node(a), inst.node(b));
        }
    }
}

fn add_supply_bonds(graph: &mut Adjacency, instances: &[ComponentInstance]) {
    for inst in instances {
        if inst.device.supply().is_some_and(|s| s.pen_bonded()) {
            graph.add_edge(inst.node("N"), inst.node("E"));
        }
    }
}

fn add_plug_bridges(graph: &mut Adjacency, index: &InstanceIndex<'_>, instances: &[ComponentInstance]) {
    for inst in instances {
        if !inst.device.is_portable() {
            continue;
        }
        let Some(host) = inst.plugged_into.as_ref().and_then(|id| index.get(id.as_str())) else {
            continue;
        };
        let Some(outlet) = host.device.outlet() else {
            continue;
        };
        let def = inst.device.definition();
        let leads = [
            (def.first_with_role(TerminalRole::Live), outlet.live),
            (def.first_with_role(TerminalRole::Neutral), outlet.neutral),
            (def.first_with_role(TerminalRole::Earth), outlet.earth),
        ];
        for (lead, socket_terminal) in leads {
            if let Some(lead) = lead {
                graph.add_edge(host.node(socket_terminal), inst.node(lead));
            }
        }
    }
}
