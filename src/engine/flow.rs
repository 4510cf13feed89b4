//! Energization and current flow.
//!
//! Energized means: designated line terminal reached by a line role and
//! designated neutral terminal reached by neutral. Flow is narrower than
//! potential: only nodes on a shortest route from an energized load back to
//! the supply are active, so dead-end branches that merely sit at potential
//! are not animated.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::diagram::{ComponentId, ComponentInstance, NodeId, Role, Wire, WireId};

use super::graph::Adjacency;
use super::propagate::{Potentials, Reach};

/// Current in one wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireFlow {
    /// Conductor role the current is carried on
    pub role: Role,
    /// True when current runs from the wire's `from` end to its `to` end
    pub forward: bool,
}

/// Instances whose designated line and neutral terminals are both fed.
pub fn energized_instances(instances: &[ComponentInstance], potentials: &Potentials) -> BTreeSet<ComponentId> {
    instances
        .iter()
        .filter(|inst| is_energized(inst, potentials))
        .map(|inst| inst.id.clone())
        .collect()
}

fn is_energized(inst: &ComponentInstance, potentials: &Potentials) -> bool {
    let Some((live, neutral)) = inst.device.definition().energy_terminals() else {
        return false;
    };
    potentials.is_live(&inst.node(live)) && potentials.reach(Role::Neutral).contains(&inst.node(neutral))
}

/// Nodes carrying operating current, per role.
#[derive(Debug, Default)]
pub struct ActiveNodes {
    by_role: BTreeMap<Role, HashSet<NodeId>>,
}

impl ActiveNodes {
    pub fn contains(&self, role: Role, node: &NodeId) -> bool {
        self.by_role.get(&role).is_some_and(|set| set.contains(node))
    }

    pub fn count(&self, role: Role) -> usize {
        self.by_role.get(&role).map_or(0, HashSet::len)
    }
}

/// Walk back from every energized load towards the supplies, only ever
/// stepping to a strictly nearer node of the same role.
pub fn active_nodes(
    graph: &Adjacency,
    potentials: &Potentials,
    instances: &[ComponentInstance],
    energized: &BTreeSet<ComponentId>,
) -> ActiveNodes {
    let mut active = ActiveNodes::default();

    for inst in instances {
        let def = inst.device.definition();
        if !def.is_load() || !energized.contains(&inst.id) {
            continue;
        }
        let Some((live, neutral)) = def.energy_terminals() else {
            continue;
        };

        let live_node = inst.node(live);
        for role in potentials.live_roles_at(&live_node) {
            let set = active.by_role.entry(role).or_default();
            walk_to_source(graph, potentials.reach(role), &live_node, set);
        }

        let set = active.by_role.entry(Role::Neutral).or_default();
        walk_to_source(graph, potentials.reach(Role::Neutral), &inst.node(neutral), set);
    }

    active
}

fn walk_to_source(graph: &Adjacency, reach: &Reach, start: &NodeId, active: &mut HashSet<NodeId>) {
    if !reach.contains(start) || !active.insert(start.clone()) {
        return;
    }
    let mut stack = vec![start.clone()];

    while let Some(current) = stack.pop() {
        let Some(d) = reach.distance(&current) else {
            continue;
        };
        for next in graph.neighbors(&current) {
            let closer = reach.distance(next).is_some_and(|nd| nd < d);
            if closer && active.insert(next.clone()) {
                stack.push(next.clone());
            }
        }
    }
}

/// Wires whose both ends are active on the same role, with direction.
///
/// Line current flows away from the supply (towards increasing distance);
/// neutral current flows back towards it.
pub fn resolve_flows(wires: &[Wire], potentials: &Potentials, active: &ActiveNodes) -> BTreeMap<WireId, WireFlow> {
    let mut flows = BTreeMap::new();

    for wire in wires {
        let roles = Role::LIVE.into_iter().chain(std::iter::once(Role::Neutral));
        for role in roles {
            if !(active.contains(role, &wire.from) && active.contains(role, &wire.to)) {
                continue;
            }
            let reach = potentials.reach(role);
            let (Some(d_from), Some(d_to)) = (reach.distance(&wire.from), reach.distance(&wire.to)) else {
                continue;
            };
            if d_from == d_to {
                continue;
            }
            let forward = if role.is_live() { d_from < d_to } else { d_from > d_to };
            flows.insert(wire.id.clone(), WireFlow { role, forward });
            break;
        }
    }

    flows
}
