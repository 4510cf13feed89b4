//! Protective device evaluation.
//!
//! Maps this cycle's fault attributions onto the latch of each device. The
//! evaluator only decides; writing `Tripped` back into the instance store is
//! the caller's job (see [`Simulator`](super::Simulator)), so a trip shows up
//! in the graph one cycle later.

use std::collections::BTreeSet;

use crate::diagram::{ComponentId, ComponentInstance};

use super::faults::FaultReport;

/// Whether `instance` must trip on this cycle.
pub fn should_trip(report: &FaultReport, instance: &ComponentInstance) -> bool {
    instance.device.latch().is_some_and(|l| l.is_closed()) && report.is_attributed(&instance.id)
}

/// Ids of every device that must trip.
pub fn tripped_devices(report: &FaultReport, instances: &[ComponentInstance]) -> BTreeSet<ComponentId> {
    instances
        .iter()
        .filter(|inst| should_trip(report, inst))
        .map(|inst| inst.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Device, Latch};
    use crate::engine::faults::{Attribution, TripCause};

    fn report_for(id: &str) -> FaultReport {
        FaultReport {
            attributions: vec![Attribution {
                device: ComponentId::new(id),
                cause: TripCause::Overcurrent,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_only_closed_attributed_devices_trip() {
        let report = report_for("mcb");
        assert!(should_trip(&report, &ComponentInstance::new("mcb", Device::Mcb(Latch::Closed))));
        assert!(!should_trip(&report, &ComponentInstance::new("mcb", Device::Mcb(Latch::Tripped))));
        assert!(!should_trip(&report, &ComponentInstance::new("mcb", Device::Mcb(Latch::Open))));
        assert!(!should_trip(&report, &ComponentInstance::new("other", Device::Mcb(Latch::Closed))));
    }

    #[test]
    fn test_non_protective_devices_never_trip() {
        let report = report_for("lamp");
        let instances = vec![ComponentInstance::new("lamp", Device::LampPendant)];
        assert!(tripped_devices(&report, &instances).is_empty());
    }
}
