//! Simulation output.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::diagram::{ComponentId, ComponentInstance, NodeId, Role, WireId};

use super::faults::{FaultReport, TripCause};
use super::flow::WireFlow;

/// A fault reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    PhaseShort,
    LineNeutralShort,
    EarthFault,
    DeviceTrip {
        device: ComponentId,
        name: String,
        cause: TripCause,
    },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::PhaseShort => write!(f, "Phase-Phase Short Circuit!"),
            Fault::LineNeutralShort => write!(f, "Short Circuit Detected (L-N)!"),
            Fault::EarthFault => write!(f, "Earth Fault Detected (L-E)!"),
            Fault::DeviceTrip { name, cause, .. } => write!(f, "{name} tripped: {}", cause.describe()),
        }
    }
}

impl Fault {
    /// Turn a detector report into user-facing faults: global shorts first,
    /// then per-device causes in instance order.
    pub(crate) fn from_report(report: &FaultReport, instances: &[ComponentInstance]) -> Vec<Fault> {
        let mut faults = Vec::new();
        if report.shorts.phase_phase {
            faults.push(Fault::PhaseShort);
        }
        if report.shorts.line_neutral {
            faults.push(Fault::LineNeutralShort);
        }
        if report.shorts.line_earth {
            faults.push(Fault::EarthFault);
        }

        for attribution in &report.attributions {
            let name = instances
                .iter()
                .find(|inst| inst.id == attribution.device)
                .map_or_else(|| attribution.device.to_string(), |inst| inst.display_name().to_string());
            faults.push(Fault::DeviceTrip {
                device: attribution.device.clone(),
                name,
                cause: attribution.cause,
            });
        }
        faults
    }
}

/// Output of one recomputation cycle. Replaced wholesale every cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Instances with both line and neutral fed
    pub energized: BTreeSet<ComponentId>,
    /// Protective devices that must trip
    pub tripped: BTreeSet<ComponentId>,
    pub faults: Vec<Fault>,
    /// Wires carrying operating current
    pub flows: BTreeMap<WireId, WireFlow>,
    /// Role of every node reached by a supply
    pub potentials: BTreeMap<NodeId, Role>,
}

impl SimulationResult {
    /// Human-readable fault messages.
    pub fn messages(&self) -> Vec<String> {
        self.faults.iter().map(ToString::to_string).collect()
    }

    pub fn is_energized(&self, id: &str) -> bool {
        self.energized.iter().any(|c| c.as_str() == id)
    }

    pub fn is_tripped(&self, id: &str) -> bool {
        self.tripped.iter().any(|c| c.as_str() == id)
    }

    /// Flow in a wire, if it carries current.
    pub fn flow(&self, wire: &str) -> Option<WireFlow> {
        self.flows.iter().find(|(id, _)| id.0 == wire).map(|(_, f)| *f)
    }

    pub fn potential(&self, node: &NodeId) -> Option<Role> {
        self.potentials.get(node).copied()
    }

    /// Whether a dead short was found this cycle.
    pub fn has_short(&self) -> bool {
        self.faults
            .iter()
            .any(|f| matches!(f, Fault::PhaseShort | Fault::LineNeutralShort | Fault::EarthFault))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Device, Latch};
    use crate::engine::faults::{Attribution, ShortCircuits};

    #[test]
    fn test_messages_order_and_names() {
        let report = FaultReport {
            shorts: ShortCircuits {
                phase_phase: false,
                line_neutral: true,
                line_earth: true,
            },
            attributions: vec![Attribution {
                device: ComponentId::new("mcb-1"),
                cause: TripCause::Overcurrent,
            }],
        };
        let instances = vec![ComponentInstance::new("mcb-1", Device::Mcb(Latch::Closed)).with_label("Ring")];
        let result = SimulationResult {
            faults: Fault::from_report(&report, &instances),
            ..Default::default()
        };
        assert_eq!(
            result.messages(),
            vec![
                "Short Circuit Detected (L-N)!",
                "Earth Fault Detected (L-E)!",
                "Ring tripped: overcurrent",
            ]
        );
        assert!(result.has_short());
    }

    #[test]
    fn test_fault_json_shape() {
        let fault = Fault::DeviceTrip {
            device: ComponentId::new("rcd"),
            name: "rcd".to_string(),
            cause: TripCause::LineLeakage,
        };
        let json = serde_json::to_value(&fault).unwrap();
        assert_eq!(json["kind"], "device_trip");
        assert_eq!(json["cause"], "line_leakage");
    }
}
