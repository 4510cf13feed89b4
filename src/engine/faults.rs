//! Fault detection.
//!
//! All faults are topological. A short is a node reached by two incompatible
//! roles. Trips are attributed to individual protective devices with guarded
//! path searches: starting at a pole output, never stepping onto any other
//! pole terminal of the same device, looking for a node that proves the
//! device sits between a supply and the fault.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::devices::{ProtectionClass, ProtectionDef};
use crate::diagram::{ComponentId, ComponentInstance, NodeId, Role, TerminalRole};

use super::graph::{Adjacency, InstanceIndex};
use super::propagate::Potentials;

/// Global short-circuit flags for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShortCircuits {
    /// Two different numbered phases meet
    pub phase_phase: bool,
    /// A line role meets neutral
    pub line_neutral: bool,
    /// A line role meets earth
    pub line_earth: bool,
}

impl ShortCircuits {
    pub fn any(&self) -> bool {
        self.phase_phase || self.line_neutral || self.line_earth
    }
}

/// Why a protective device must trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TripCause {
    /// Line output reaches earth outside the device's own poles
    LineLeakage,
    /// Neutral output reaches earth outside the device's own poles
    NeutralFault,
    /// RCD acting as last-resort overcurrent protection
    LoadSideShort,
    /// MCB or fuse between the supply and a short
    Overcurrent,
}

impl TripCause {
    pub fn describe(self) -> &'static str {
        match self {
            TripCause::LineLeakage => "line-side leakage to earth",
            TripCause::NeutralFault => "neutral-side fault to earth",
            TripCause::LoadSideShort => "short circuit on load side",
            TripCause::Overcurrent => "overcurrent",
        }
    }
}

/// A fault attributed to one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub device: ComponentId,
    pub cause: TripCause,
}

/// Everything the detector found in one cycle.
#[derive(Debug, Clone, Default)]
pub struct FaultReport {
    pub shorts: ShortCircuits,
    /// In instance order, line causes before neutral causes
    pub attributions: Vec<Attribution>,
}

impl FaultReport {
    pub fn is_attributed(&self, id: &ComponentId) -> bool {
        self.attributions.iter().any(|a| &a.device == id)
    }

    pub fn causes_for<'a>(&'a self, id: &'a ComponentId) -> impl Iterator<Item = TripCause> + 'a {
        self.attributions.iter().filter(move |a| &a.device == id).map(|a| a.cause)
    }
}

/// Compare role reach sets for shorts.
pub fn detect_shorts(potentials: &Potentials) -> ShortCircuits {
    let phases = [Role::L1, Role::L2, Role::L3];
    let phase_phase = phases.iter().enumerate().any(|(i, a)| {
        phases[i + 1..]
            .iter()
            .any(|b| potentials.reach(*a).overlaps(potentials.reach(*b)))
    });

    let touches = |other: Role| {
        Role::LIVE
            .iter()
            .any(|live| potentials.reach(*live).overlaps(potentials.reach(other)))
    };

    ShortCircuits {
        phase_phase,
        line_neutral: touches(Role::Neutral),
        line_earth: touches(Role::Earth),
    }
}

/// Breadth-first search from `start` that never enters a `forbidden` node.
/// Returns true as soon as a node satisfying `hit` is visited.
pub fn guarded_search(
    graph: &Adjacency,
    start: &NodeId,
    forbidden: &HashSet<NodeId>,
    mut hit: impl FnMut(&NodeId) -> bool,
) -> bool {
    if forbidden.contains(start) {
        return false;
    }
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start.clone());
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        if hit(&current) {
            return true;
        }
        for next in graph.neighbors(&current) {
            if !forbidden.contains(next) && visited.insert(next.clone()) {
                queue.push_back(next.clone());
            }
        }
    }
    false
}

/// Run every detector for one cycle.
///
/// `open` and `closed` are the two continuity graphs of the same snapshot;
/// `potentials` must come from `open`.
pub fn detect_faults(
    instances: &[ComponentInstance],
    open: &Adjacency,
    closed: &Adjacency,
    potentials: &Potentials,
) -> FaultReport {
    let shorts = detect_shorts(potentials);
    let index = InstanceIndex::new(instances);
    let mut attributions = Vec::new();

    for inst in instances {
        if !inst.device.latch().is_some_and(|l| l.is_closed()) {
            continue;
        }
        let Some(protection) = inst.device.definition().protection.as_ref() else {
            continue;
        };
        // An unfed device carries no current
        if !potentials.is_live(&inst.node(protection.line.output)) {
            continue;
        }

        let causes = match protection.class {
            ProtectionClass::ResidualCurrent => {
                residual_current_causes(inst, protection, open, closed, potentials, &index, shorts)
            }
            ProtectionClass::Overcurrent if shorts.any() => {
                overcurrent_causes(inst, protection, open, potentials, &index)
            }
            ProtectionClass::Overcurrent => Vec::new(),
        };

        attributions.extend(causes.into_iter().map(|cause| Attribution {
            device: inst.id.clone(),
            cause,
        }));
    }

    FaultReport {
        shorts,
        attributions,
    }
}

fn guard_nodes(inst: &ComponentInstance, protection: &ProtectionDef, start: &str) -> HashSet<NodeId> {
    protection
        .guard_terminals(start)
        .into_iter()
        .map(|t| inst.node(t))
        .collect()
}

/// A neutral or earth terminal sitting at its own role's potential.
///
/// During a short the reach sets bleed into each other, so mere membership
/// of the neutral or earth set says nothing: every live node is in it. Only
/// a return-conductor terminal proves a path back to the supply.
fn is_return_terminal(index: &InstanceIndex<'_>, potentials: &Potentials, node: &NodeId) -> bool {
    match index.role_of(node) {
        Some(TerminalRole::Neutral) => potentials.reach(Role::Neutral).contains(node),
        Some(TerminalRole::Earth) => potentials.reach(Role::Earth).contains(node),
        _ => false,
    }
}

fn residual_current_causes(
    inst: &ComponentInstance,
    protection: &ProtectionDef,
    open: &Adjacency,
    closed: &Adjacency,
    potentials: &Potentials,
    index: &InstanceIndex<'_>,
    shorts: ShortCircuits,
) -> Vec<TripCause> {
    let earth = potentials.reach(Role::Earth);
    // Protective conductors only: on a bonded supply every neutral is also
    // earth-reachable.
    let is_protective_earth =
        |n: &NodeId| earth.contains(n) && index.role_of(n) == Some(TerminalRole::Earth);

    let mut causes = Vec::new();
    let line_out = protection.line.output;
    let line_start = inst.node(line_out);
    let line_guard = guard_nodes(inst, protection, line_out);

    if guarded_search(closed, &line_start, &line_guard, is_protective_earth) {
        causes.push(TripCause::LineLeakage);
    }

    if let Some(neutral) = protection.neutral {
        let start = inst.node(neutral.output);
        let guard = guard_nodes(inst, protection, neutral.output);
        if guarded_search(closed, &start, &guard, is_protective_earth) {
            causes.push(TripCause::NeutralFault);
        }
    }

    if shorts.any() {
        let neutral = potentials.reach(Role::Neutral);
        let is_neutral_return =
            |n: &NodeId| neutral.contains(n) && index.role_of(n) == Some(TerminalRole::Neutral);
        if guarded_search(open, &line_start, &line_guard, is_neutral_return) {
            causes.push(TripCause::LoadSideShort);
        }
    }

    causes
}

fn overcurrent_causes(
    inst: &ComponentInstance,
    protection: &ProtectionDef,
    open: &Adjacency,
    potentials: &Potentials,
    index: &InstanceIndex<'_>,
) -> Vec<TripCause> {
    let out = protection.line.output;
    let guard = guard_nodes(inst, protection, out);

    if guarded_search(open, &inst.node(out), &guard, |n| is_return_terminal(index, potentials, n)) {
        vec![TripCause::Overcurrent]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Device, Earthing, Latch, SupplyState};
    use crate::diagram::Wire;
    use crate::engine::graph::{build_open_graph, with_load_bridges};

    fn node(c: &str, t: &str) -> NodeId {
        NodeId::new(&ComponentId::new(c), t)
    }

    fn detect(instances: &[ComponentInstance], wires: &[Wire]) -> FaultReport {
        let open = build_open_graph(instances, wires);
        let closed = with_load_bridges(open.clone(), instances);
        let potentials = Potentials::propagate(&open, instances);
        detect_faults(instances, &open, &closed, &potentials)
    }

    /// Supply -> RCD -> lamp, with the lamp earth on an earth bar.
    fn rcd_circuit(earthing: Earthing) -> (Vec<ComponentInstance>, Vec<Wire>) {
        let instances = vec![
            ComponentInstance::new("src", Device::SourceAc(SupplyState::new(true).with_earthing(earthing))),
            ComponentInstance::new("rcd", Device::Rcd(Latch::Closed)),
            ComponentInstance::new("lamp", Device::LampPendant),
            ComponentInstance::new("eb", Device::BarEarth),
        ];
        let wires = vec![
            Wire::new("w1", ("src", "L"), ("rcd", "L_IN")),
            Wire::new("w2", ("src", "N"), ("rcd", "N_IN")),
            Wire::new("w3", ("rcd", "L_OUT"), ("lamp", "L")),
            Wire::new("w4", ("rcd", "N_OUT"), ("lamp", "N")),
            Wire::new("w5", ("src", "E"), ("eb", "T1")),
            Wire::new("w6", ("eb", "T2"), ("lamp", "E")),
        ];
        (instances, wires)
    }

    #[test]
    fn test_guarded_search_respects_forbidden() {
        let mut graph = Adjacency::new();
        graph.add_edge(node("a", "1"), node("b", "1"));
        graph.add_edge(node("b", "1"), node("c", "1"));
        let target = node("c", "1");

        let none = HashSet::new();
        assert!(guarded_search(&graph, &node("a", "1"), &none, |n| *n == target));

        let blocked: HashSet<_> = [node("b", "1")].into_iter().collect();
        assert!(!guarded_search(&graph, &node("a", "1"), &blocked, |n| *n == target));
    }

    #[test]
    fn test_healthy_rcd_circuit_has_no_faults() {
        for earthing in [Earthing::TnS, Earthing::TnCS] {
            let (instances, wires) = rcd_circuit(earthing);
            let report = detect(&instances, &wires);
            assert!(!report.shorts.any(), "{earthing:?}");
            assert!(report.attributions.is_empty(), "{earthing:?}: {:?}", report.attributions);
        }
    }

    #[test]
    fn test_neutral_to_earth_fault_trips_rcd() {
        let (instances, mut wires) = rcd_circuit(Earthing::TnS);
        wires.push(Wire::new("fault", ("lamp", "N"), ("eb", "T3")));
        let report = detect(&instances, &wires);

        // N meeting E is not a global short
        assert!(!report.shorts.any());
        let id = ComponentId::new("rcd");
        let causes: Vec<_> = report.causes_for(&id).collect();
        assert!(causes.contains(&TripCause::NeutralFault));
    }

    #[test]
    fn test_neutral_bypassing_rcd_trips_on_bonded_supply() {
        let (instances, mut wires) = rcd_circuit(Earthing::TnCS);
        // Lamp neutral returns straight to the supply instead of through the RCD
        wires.retain(|w| w.id.0 != "w4");
        wires.push(Wire::new("w4b", ("src", "N"), ("lamp", "N")));
        let report = detect(&instances, &wires);
        assert!(report.is_attributed(&ComponentId::new("rcd")));
    }

    #[test]
    fn test_phase_phase_short() {
        let instances = vec![
            ComponentInstance::new("tp", Device::Source3Ph(SupplyState::new(true))),
            ComponentInstance::new("jb", Device::JunctionBox),
        ];
        let wires = vec![
            Wire::new("w1", ("tp", "L1"), ("jb", "T1")),
            Wire::new("w2", ("tp", "L2"), ("jb", "T1")),
        ];
        let report = detect(&instances, &wires);
        assert!(report.shorts.phase_phase);
        assert!(!report.shorts.line_neutral);
        assert!(!report.shorts.line_earth);
    }

    #[test]
    fn test_mcb_upstream_of_short_only() {
        let instances = vec![
            ComponentInstance::new("src", Device::SourceAc(SupplyState::new(true))),
            ComponentInstance::new("faulty", Device::Mcb(Latch::Closed)),
            ComponentInstance::new("healthy", Device::Mcb(Latch::Closed)),
            ComponentInstance::new("lamp", Device::LampPendant),
        ];
        let wires = vec![
            Wire::new("w1", ("src", "L"), ("faulty", "IN")),
            Wire::new("w2", ("faulty", "OUT"), ("src", "N")),
            Wire::new("w3", ("src", "L"), ("healthy", "IN")),
            Wire::new("w4", ("healthy", "OUT"), ("lamp", "L")),
            Wire::new("w5", ("lamp", "N"), ("src", "N")),
        ];
        let report = detect(&instances, &wires);
        assert!(report.shorts.line_neutral);
        assert!(report.is_attributed(&ComponentId::new("faulty")));
        assert!(!report.is_attributed(&ComponentId::new("healthy")));
    }

    #[test]
    fn test_healthy_rcd_ignores_unrelated_short() {
        let (instances, mut wires) = rcd_circuit(Earthing::TnS);
        wires.push(Wire::new("short", ("src", "L"), ("src", "N")));
        let report = detect(&instances, &wires);
        assert!(report.shorts.line_neutral);
        assert!(report.attributions.is_empty(), "{:?}", report.attributions);
    }

    #[test]
    fn test_rcd_line_out_to_neutral_is_load_side_short() {
        let (mut instances, mut wires) = rcd_circuit(Earthing::TnS);
        instances.push(ComponentInstance::new("rcd-2", Device::Rcd(Latch::Closed)));
        instances.push(ComponentInstance::new("nb", Device::BarNeutral));
        wires.extend([
            Wire::new("f1", ("src", "L"), ("rcd-2", "L_IN")),
            Wire::new("f2", ("src", "N"), ("rcd-2", "N_IN")),
            Wire::new("f3", ("rcd-2", "L_OUT"), ("nb", "T1")),
            Wire::new("f4", ("nb", "T2"), ("src", "N")),
        ]);
        let report = detect(&instances, &wires);

        assert!(report.shorts.line_neutral);
        let faulty = ComponentId::new("rcd-2");
        let causes: Vec<_> = report.causes_for(&faulty).collect();
        assert_eq!(causes, vec![TripCause::LoadSideShort]);
        assert!(!report.is_attributed(&ComponentId::new("rcd")));
    }

    #[test]
    fn test_fused_switch_overcurrent() {
        let instances = vec![
            ComponentInstance::new("src", Device::SourceAc(SupplyState::new(true))),
            ComponentInstance::new("fcu-a", Device::SwitchFused(Latch::Closed)),
            ComponentInstance::new("fcu-b", Device::SwitchFused(Latch::Closed)),
            ComponentInstance::new("lamp", Device::LampPendant),
        ];
        let wires = vec![
            Wire::new("a1", ("src", "L"), ("fcu-a", "L_IN")),
            Wire::new("a2", ("src", "N"), ("fcu-a", "N_IN")),
            Wire::new("a3", ("fcu-a", "L_OUT"), ("src", "N")),
            Wire::new("b1", ("src", "L"), ("fcu-b", "L_IN")),
            Wire::new("b2", ("src", "N"), ("fcu-b", "N_IN")),
            Wire::new("b3", ("fcu-b", "L_OUT"), ("lamp", "L")),
            Wire::new("b4", ("fcu-b", "N_OUT"), ("lamp", "N")),
        ];
        let report = detect(&instances, &wires);

        let faulty = ComponentId::new("fcu-a");
        assert_eq!(report.causes_for(&faulty).collect::<Vec<_>>(), vec![TripCause::Overcurrent]);
        assert!(!report.is_attributed(&ComponentId::new("fcu-b")));
    }

    #[test]
    fn test_breaker_into_earth_fault_is_overcurrent() {
        let instances = vec![
            ComponentInstance::new("src", Device::SourceAc(SupplyState::new(true))),
            ComponentInstance::new("mcb", Device::Mcb(Latch::Closed)),
            ComponentInstance::new("eb", Device::BarEarth),
        ];
        let wires = vec![
            Wire::new("w1", ("src", "L"), ("mcb", "IN")),
            Wire::new("w2", ("src", "E"), ("eb", "T1")),
            Wire::new("w3", ("mcb", "OUT"), ("eb", "T4")),
        ];
        let report = detect(&instances, &wires);
        assert!(report.shorts.line_earth);
        assert!(report.is_attributed(&ComponentId::new("mcb")));
    }

    #[test]
    fn test_unfed_breaker_is_not_attributed() {
        let instances = vec![
            ComponentInstance::new("src", Device::SourceAc(SupplyState::new(true))),
            ComponentInstance::new("mcb", Device::Mcb(Latch::Closed)),
        ];
        // Dead short at the supply, breaker wired only on its load side
        let wires = vec![
            Wire::new("w1", ("src", "L"), ("src", "N")),
            Wire::new("w2", ("mcb", "OUT"), ("src", "E")),
        ];
        let report = detect(&instances, &wires);
        assert!(report.shorts.line_neutral);
        assert!(report.attributions.is_empty());
    }
}
