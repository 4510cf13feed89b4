//! # LV Circuit Core
//!
//! A topological simulator for low-voltage electrical installation diagrams.
//!
//! This library provides:
//! - A device catalog of supplies, protective devices, switches, loads and
//!   connection hardware, each with terminals and switch-state dependent
//!   internal contacts
//! - A JSON diagram model of placed components and point-to-point wires
//! - A pure recomputation engine that decides which nodes are live, which
//!   loads are energized, which wires carry current and which protective
//!   devices must trip
//! - Test instruments (multimeter, insulation tester) read against a result
//!
//! ## Architecture
//!
//! - [`diagram`] - Component instances, wires, JSON loading and validation
//! - [`devices`] - Device catalog, device state and user actions
//! - [`engine`] - Graph builder, potential propagation, fault detection,
//!   protective device evaluation, energization and flow
//! - [`instruments`] - Multimeter and insulation tester
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! lvsim kitchen.json --settle --action mcb-1=toggle
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmLvSim } from 'lv_circuit_core';
//!
//! const sim = new WasmLvSim(diagramJson);
//! const result = JSON.parse(sim.settle());
//! ```
//!
//! ## Simulation Method
//!
//! There are no voltages or currents to solve for. Every cycle:
//!
//! 1. Build an undirected graph over terminals from wires and closed contacts
//! 2. Breadth-first search from each supply terminal, per conductor role
//! 3. Nodes reached by two incompatible roles are shorts; guarded searches
//!    from each protective device's outputs attribute trips
//! 4. Loads fed on line and neutral are energized; a backward walk along
//!    decreasing hop distance marks the wires that carry current

pub mod devices;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod instruments;

// Re-export main types for convenience
pub use devices::{Device, DeviceAction, Latch};
pub use diagram::{ComponentInstance, Diagram, NodeId, Role, Wire};
pub use engine::{simulate, simulate_diagram, SimulationResult, Simulator, SimulatorConfig};
pub use error::{LvError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmLvSim;

/// Nominal line-to-neutral voltage in volts
pub const NOMINAL_PHASE_VOLTAGE: f64 = 230.0;

/// Nominal line-to-line voltage of a three-phase supply in volts
pub const LINE_VOLTAGE: f64 = 400.0;
