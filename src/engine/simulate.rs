//! The recomputation entry point.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::diagram::{ComponentInstance, Diagram, Wire};

use super::evaluator::tripped_devices;
use super::faults::detect_faults;
use super::flow::{active_nodes, energized_instances, resolve_flows};
use super::graph::{build_open_graph, with_load_bridges};
use super::propagate::Potentials;
use super::result::{Fault, SimulationResult};

/// Recompute everything for one snapshot of the diagram.
///
/// Pure: builds its graphs from scratch, never touches its inputs and keeps
/// nothing between calls. Dangling wires are ignored. While a dead short
/// exists, energization and flow are reported empty; faults and trips are
/// still reported.
pub fn simulate(instances: &[ComponentInstance], wires: &[Wire]) -> SimulationResult {
    if !instances.iter().any(|inst| inst.device.is_active_source()) {
        debug!("no active supply");
        return SimulationResult::default();
    }

    // 1. Continuity graphs
    let open = build_open_graph(instances, wires);
    let closed = with_load_bridges(open.clone(), instances);

    // 2. Potentials
    let potentials = Potentials::propagate(&open, instances);

    // 3. Faults and trips
    let report = detect_faults(instances, &open, &closed, &potentials);
    let tripped = tripped_devices(&report, instances);
    let faults = Fault::from_report(&report, instances);

    // 4. Energization and flow, suppressed during a dead short
    let (energized, flows) = if report.shorts.any() {
        (BTreeSet::new(), BTreeMap::new())
    } else {
        let energized = energized_instances(instances, &potentials);
        let active = active_nodes(&open, &potentials, instances, &energized);
        (energized, resolve_flows(wires, &potentials, &active))
    };

    debug!(
        nodes = open.node_count(),
        edges = open.edge_count(),
        energized = energized.len(),
        tripped = tripped.len(),
        faults = faults.len(),
        flowing = flows.len(),
        "recomputed"
    );

    SimulationResult {
        energized,
        tripped,
        faults,
        flows,
        potentials: potentials.node_roles(),
    }
}

/// [`simulate`] over a whole diagram.
pub fn simulate_diagram(diagram: &Diagram) -> SimulationResult {
    simulate(&diagram.components, &diagram.wires)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{CookerUnit, Device, Earthing, Latch, Position, SupplyState, Switched, Throw};
    use crate::diagram::{NodeId, Role};

    fn supply(on: bool) -> ComponentInstance {
        ComponentInstance::new("src", Device::SourceAc(SupplyState::new(on)))
    }

    /// Supply -> closed MCB -> lamp, neutral straight back.
    fn mcb_lamp() -> Diagram {
        Diagram::new(
            vec![
                supply(true),
                ComponentInstance::new("mcb", Device::Mcb(Latch::Closed)),
                ComponentInstance::new("lamp", Device::LampPendant),
            ],
            vec![
                Wire::new("l1", ("src", "L"), ("mcb", "IN")),
                Wire::new("l2", ("mcb", "OUT"), ("lamp", "L")),
                Wire::new("n1", ("lamp", "N"), ("src", "N")),
            ],
        )
    }

    #[test]
    fn test_no_active_supply_is_empty() {
        let mut diagram = mcb_lamp();
        diagram.components[0] = supply(false);
        let result = simulate_diagram(&diagram);
        assert!(result.energized.is_empty());
        assert!(result.tripped.is_empty());
        assert!(result.faults.is_empty());
        assert!(result.flows.is_empty());
        assert!(result.potentials.is_empty());
    }

    #[test]
    fn test_mcb_lamp_energized_with_flow() {
        let result = simulate_diagram(&mcb_lamp());
        assert!(result.is_energized("lamp"));
        assert!(result.faults.is_empty());
        assert!(result.tripped.is_empty());

        let live = result.flow("l2").unwrap();
        assert_eq!(live.role, Role::Live);
        assert!(live.forward);
        assert!(result.flow("l1").unwrap().forward);
        let neutral = result.flow("n1").unwrap();
        assert_eq!(neutral.role, Role::Neutral);
        assert!(neutral.forward);
    }

    #[test]
    fn test_neutral_wire_drawn_from_supply_flows_reverse() {
        let mut diagram = mcb_lamp();
        diagram.wires[2] = Wire::new("n1", ("src", "N"), ("lamp", "N"));
        let result = simulate_diagram(&diagram);
        assert!(!result.flow("n1").unwrap().forward);
    }

    #[test]
    fn test_dead_short_trips_breaker_and_blanks_flow() {
        let diagram = Diagram::new(
            vec![
                supply(true),
                ComponentInstance::new("mcb", Device::Mcb(Latch::Closed)),
                ComponentInstance::new("lamp", Device::LampPendant),
            ],
            vec![
                Wire::new("l1", ("src", "L"), ("mcb", "IN")),
                Wire::new("short", ("mcb", "OUT"), ("src", "N")),
                Wire::new("l2", ("mcb", "OUT"), ("lamp", "L")),
                Wire::new("n1", ("lamp", "N"), ("src", "N")),
            ],
        );
        let result = simulate_diagram(&diagram);
        assert!(result.messages().iter().any(|m| m.contains("Short Circuit")));
        assert!(result.is_tripped("mcb"));
        assert!(result.energized.is_empty());
        assert!(result.flows.is_empty());
        assert!(!result.potentials.is_empty());
    }

    #[test]
    fn test_supply_line_to_neutral_without_load() {
        let diagram = Diagram::new(vec![supply(true)], vec![Wire::new("w", ("src", "L"), ("src", "N"))]);
        let result = simulate_diagram(&diagram);
        assert_eq!(result.messages(), vec!["Short Circuit Detected (L-N)!"]);
        assert!(result.energized.is_empty());
    }

    #[test]
    fn test_rcd_line_out_to_earth_is_leakage() {
        let diagram = Diagram::new(
            vec![
                supply(true),
                ComponentInstance::new("rcd", Device::Rcd(Latch::Closed)).with_label("Main RCD"),
                ComponentInstance::new("eb", Device::BarEarth),
            ],
            vec![
                Wire::new("w1", ("src", "L"), ("rcd", "L_IN")),
                Wire::new("w2", ("src", "N"), ("rcd", "N_IN")),
                Wire::new("w3", ("src", "E"), ("eb", "T1")),
                Wire::new("w4", ("rcd", "L_OUT"), ("eb", "T5")),
            ],
        );
        let result = simulate_diagram(&diagram);
        assert!(result.is_tripped("rcd"));
        let messages = result.messages();
        assert!(messages.contains(&"Main RCD tripped: line-side leakage to earth".to_string()));
        assert!(!messages.iter().any(|m| m.contains("overcurrent")));
    }

    #[test]
    fn test_dangling_wire_is_tolerated() {
        let mut diagram = mcb_lamp();
        diagram.wires.push(Wire::new("ghost", ("mcb", "OUT"), ("removed", "L")));
        let result = simulate_diagram(&diagram);
        assert!(result.is_energized("lamp"));
        assert!(!result.potentials.keys().any(|n| n.component.as_str() == "removed"));
    }

    #[test]
    fn test_idempotent() {
        let diagram = mcb_lamp();
        let before = diagram.clone();
        let first = simulate_diagram(&diagram);
        for _ in 0..3 {
            assert_eq!(simulate_diagram(&diagram), first);
        }
        assert_eq!(diagram, before);
    }

    #[test]
    fn test_two_way_lighting() {
        let mut diagram = Diagram::new(
            vec![
                supply(true),
                ComponentInstance::new("sw_a", Device::Switch2W(Throw::new(Position::First))),
                ComponentInstance::new("sw_b", Device::Switch2W(Throw::new(Position::Second))),
                ComponentInstance::new("lamp", Device::LampPendant),
            ],
            vec![
                Wire::new("feed", ("src", "L"), ("sw_a", "COM")),
                Wire::new("s1", ("sw_a", "L1"), ("sw_b", "L1")),
                Wire::new("s2", ("sw_a", "L2"), ("sw_b", "L2")),
                Wire::new("sl", ("sw_b", "COM"), ("lamp", "L")),
                Wire::new("n", ("lamp", "N"), ("src", "N")),
            ],
        );
        assert!(!simulate_diagram(&diagram).is_energized("lamp"));

        diagram.components[2].device = Device::Switch2W(Throw::new(Position::First));
        let result = simulate_diagram(&diagram);
        assert!(result.is_energized("lamp"));
        assert!(result.flow("s1").is_some());
        assert!(result.flow("s2").is_none());
    }

    #[test]
    fn test_plugged_fan_runs_from_switched_socket() {
        let mut diagram = Diagram::new(
            vec![
                supply(true),
                ComponentInstance::new("sock", Device::SocketDouble(Switched::new(true))),
                ComponentInstance::new("fan", Device::FanPlug).plugged_into("sock"),
            ],
            vec![
                Wire::new("l", ("src", "L"), ("sock", "L")),
                Wire::new("n", ("src", "N"), ("sock", "N")),
                Wire::new("e", ("src", "E"), ("sock", "E")),
            ],
        );
        let result = simulate_diagram(&diagram);
        assert!(result.is_energized("fan"));
        assert!(result.is_energized("sock"));
        assert_eq!(result.potential(&NodeId::new(&"fan".into(), "E")), Some(Role::Earth));

        diagram.components[1].device = Device::SocketDouble(Switched::new(false));
        let result = simulate_diagram(&diagram);
        assert!(!result.is_energized("fan"));
        assert!(result.is_energized("sock"));
    }

    #[test]
    fn test_fan_plugged_into_cooker_unit_socket() {
        let mut diagram = Diagram::new(
            vec![
                supply(true),
                ComponentInstance::new("ccu", Device::SwitchCooker(CookerUnit { on: false, socket_on: true })),
                ComponentInstance::new("fan", Device::FanPlug).plugged_into("ccu"),
            ],
            vec![
                Wire::new("l", ("src", "L"), ("ccu", "L_IN")),
                Wire::new("n", ("src", "N"), ("ccu", "N_IN")),
                Wire::new("e", ("src", "E"), ("ccu", "E")),
            ],
        );
        let result = simulate_diagram(&diagram);
        assert!(result.is_energized("fan"));
        assert!(result.faults.is_empty());
        assert!(result.flow("l").is_some());

        diagram.components[1].device = Device::SwitchCooker(CookerUnit { on: true, socket_on: false });
        let result = simulate_diagram(&diagram);
        assert!(!result.is_energized("fan"));
        assert!(result.flows.is_empty());
    }

    #[test]
    fn test_consumer_unit_demo() {
        let diagram = Diagram::from_json(include_str!("../../demos/consumer_unit.json")).unwrap();
        let result = simulate_diagram(&diagram);
        assert!(result.faults.is_empty(), "{:?}", result.messages());
        for id in ["lamp", "socket", "fan"] {
            assert!(result.is_energized(id), "{id}");
        }
        assert!(result.flow("switched-l").is_some());
        assert!(result.flow("sockets-e").is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["potentials"]["lamp:L"], "L");
        assert_eq!(json["flows"]["lights-n"]["role"], "N");
    }

    #[test]
    fn test_bonded_supply_healthy_circuit() {
        let mut diagram = mcb_lamp();
        diagram.components[0] = ComponentInstance::new(
            "src",
            Device::SourceAc(SupplyState::new(true).with_earthing(Earthing::TnCS)),
        );
        let result = simulate_diagram(&diagram);
        assert!(result.faults.is_empty());
        assert!(result.is_energized("lamp"));
    }
}
