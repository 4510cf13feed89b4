//! Test instruments read against a simulation result.
//!
//! Instruments never change the diagram; they only interpret the latest
//! [`SimulationResult`](crate::engine::SimulationResult).

mod insulation;
mod multimeter;

pub use insulation::{probes_connected, InsulationTester, Reading, TesterMode};
pub use multimeter::{clamp, measure_voltage, ClampReading, NominalVoltage};
