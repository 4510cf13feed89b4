//! Caller-side simulation loop.
//!
//! [`simulate`](super::simulate) is pure: it only reports which devices must
//! trip. The [`Simulator`] owns the diagram and writes those trips back, so
//! the next cycle sees the devices open.

use std::collections::BTreeSet;

use tracing::info;

use crate::devices::DeviceAction;
use crate::diagram::{ComponentId, Diagram};
use crate::error::{LvError, Result};

use super::result::SimulationResult;
use super::simulate::simulate;

/// Default cap on recompute cycles in [`Simulator::settle`].
pub const DEFAULT_MAX_SETTLE_CYCLES: usize = 8;

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Maximum recompute cycles while trips cascade.
    pub max_settle_cycles: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_settle_cycles: DEFAULT_MAX_SETTLE_CYCLES,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settle cycle cap. Values below 1 are raised to 1.
    pub fn with_max_settle_cycles(mut self, cycles: usize) -> Self {
        self.max_settle_cycles = cycles.max(1);
        self
    }
}

/// Owns the authoritative diagram and latches trips into it.
#[derive(Debug, Clone)]
pub struct Simulator {
    diagram: Diagram,
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with default configuration.
    pub fn new(diagram: Diagram) -> Self {
        Self::with_config(diagram, SimulatorConfig::default())
    }

    pub fn with_config(diagram: Diagram, config: SimulatorConfig) -> Self {
        Self { diagram, config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Mutable access for editing. Callers recompute afterwards.
    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    /// Run one cycle and latch every device it trips.
    ///
    /// The returned result describes the state *before* the trips took
    /// effect, which is what lets the fault messages name the cause.
    pub fn recompute(&mut self) -> SimulationResult {
        let result = simulate(&self.diagram.components, &self.diagram.wires);
        self.apply_trips(&result);
        result
    }

    /// Latch `Tripped` on every device listed in `result`. Returns how many
    /// latches actually changed.
    pub fn apply_trips(&mut self, result: &SimulationResult) -> usize {
        let mut count = 0;
        for id in &result.tripped {
            let Some(latch) = self
                .diagram
                .component_mut(id.as_str())
                .and_then(|inst| inst.device.latch_mut())
            else {
                continue;
            };
            if latch.trip() {
                info!(device = %id, "protective device tripped");
                count += 1;
            }
        }
        count
    }

    /// Recompute until a cycle trips nothing new, or the cycle cap is hit.
    ///
    /// Returns the last cycle's energization and flow, every fault seen on
    /// the way (first occurrence order) and every device latched `Tripped`.
    pub fn settle(&mut self) -> SimulationResult {
        let mut faults = Vec::new();
        let mut cycles = 0;

        loop {
            let result = simulate(&self.diagram.components, &self.diagram.wires);
            cycles += 1;
            for fault in &result.faults {
                if !faults.contains(fault) {
                    faults.push(fault.clone());
                }
            }

            let tripped = self.apply_trips(&result);
            if tripped == 0 || cycles >= self.config.max_settle_cycles {
                return SimulationResult {
                    faults,
                    tripped: self.tripped_devices(),
                    ..result
                };
            }
        }
    }

    /// Apply a user action to one device.
    pub fn apply(&mut self, id: &str, action: DeviceAction) -> Result<()> {
        let inst = self
            .diagram
            .component_mut(id)
            .ok_or_else(|| LvError::component_not_found(id))?;
        if !inst.device.apply(action) {
            return Err(LvError::unsupported_action(id, inst.device.type_tag(), action.to_string()));
        }
        Ok(())
    }

    /// Devices currently latched `Tripped`.
    pub fn tripped_devices(&self) -> BTreeSet<ComponentId> {
        self.diagram
            .components
            .iter()
            .filter(|inst| inst.device.latch().is_some_and(|l| l.is_tripped()))
            .map(|inst| inst.id.clone())
            .collect()
    }
}
