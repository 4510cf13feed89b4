//! Potential propagation.
//!
//! For each conductor role, one multi-source breadth-first search over the
//! open graph starting from every active supply's terminal of that role.
//! Supplies sharing a role are merged into one frontier; no phase identity is
//! kept between independent supplies.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::diagram::{ComponentInstance, NodeId, Role};

use super::graph::Adjacency;

/// Nodes reached from one role's seeds, with hop distance to the nearest
/// seed.
#[derive(Debug, Clone, Default)]
pub struct Reach {
    dist: HashMap<NodeId, u32>,
}

impl Reach {
    pub fn contains(&self, node: &NodeId) -> bool {
        self.dist.contains_key(node)
    }

    pub fn distance(&self, node: &NodeId) -> Option<u32> {
        self.dist.get(node).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.dist.keys()
    }

    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    /// Whether any node is reached by both `self` and `other`.
    pub fn overlaps(&self, other: &Reach) -> bool {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.nodes().any(|n| large.contains(n))
    }
}

/// Multi-source BFS. Seeds sit at distance 0.
pub fn explore(graph: &Adjacency, seeds: &[NodeId]) -> Reach {
    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();

    for seed in seeds {
        if !dist.contains_key(seed) {
            dist.insert(seed.clone(), 0);
            queue.push_back(seed.clone());
        }
    }

    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        for next in graph.neighbors(&current) {
            if !dist.contains_key(next) {
                dist.insert(next.clone(), d + 1);
                queue.push_back(next.clone());
            }
        }
    }

    Reach { dist }
}

/// Reachability for every role in one cycle.
#[derive(Debug, Clone, Default)]
pub struct Potentials {
    /// Indexed in [`Role::ALL`] order
    reach: [Reach; 6],
}

fn slot(role: Role) -> usize {
    match role {
        Role::L1 => 0,
        Role::L2 => 1,
        Role::L3 => 2,
        Role::Live => 3,
        Role::Neutral => 4,
        Role::Earth => 5,
    }
}

impl Potentials {
    /// Seed every active supply and propagate each role over `graph`.
    pub fn propagate(graph: &Adjacency, instances: &[ComponentInstance]) -> Self {
        let reach = Role::ALL.map(|role| {
            let seeds: Vec<NodeId> = instances
                .iter()
                .flat_map(|inst| {
                    inst.device
                        .source_seeds()
                        .iter()
                        .filter(move |(r, _)| *r == role)
                        .map(move |(_, terminal)| inst.node(terminal))
                })
                .collect();
            explore(graph, &seeds)
        });
        Self { reach }
    }

    pub fn reach(&self, role: Role) -> &Reach {
        &self.reach[slot(role)]
    }

    /// Live roles that reach `node`.
    pub fn live_roles_at<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = Role> + 'a {
        Role::LIVE.into_iter().filter(move |r| self.reach(*r).contains(node))
    }

    /// Whether any line role reaches `node`.
    pub fn is_live(&self, node: &NodeId) -> bool {
        self.live_roles_at(node).next().is_some()
    }

    /// Node to role map. A node reached by several roles keeps the last one
    /// in propagation order, so Earth beats Neutral: on a bonded TN-C-S
    /// supply every neutral node reads as Earth here. Use [`Self::reach`]
    /// when the neutral set itself matters.
    pub fn node_roles(&self) -> BTreeMap<NodeId, Role> {
        let mut roles = BTreeMap::new();
        for role in Role::ALL {
            for node in self.reach(role).nodes() {
                roles.insert(node.clone(), role);
            }
        }
        roles
    }
}
