//! Multimeter: nominal voltage between two probes, clamp on a wire.

use std::fmt;

use serde::Serialize;

use crate::diagram::{NodeId, Role};
use crate::engine::{SimulationResult, WireFlow};
use crate::{LINE_VOLTAGE, NOMINAL_PHASE_VOLTAGE};

/// Voltage class between two nodes. The engine has no magnitudes, so a
/// reading is always one of three nominal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NominalVoltage {
    Zero,
    /// Line to neutral or earth
    Phase,
    /// Line to line
    Line,
}

impl NominalVoltage {
    /// Classify the potential difference between two probe roles.
    pub fn between(a: Option<Role>, b: Option<Role>) -> Self {
        let (Some(a), Some(b)) = (a, b) else {
            return NominalVoltage::Zero;
        };
        match (a.is_live(), b.is_live()) {
            _ if a == b => NominalVoltage::Zero,
            (true, true) => NominalVoltage::Line,
            (true, false) | (false, true) => NominalVoltage::Phase,
            (false, false) => NominalVoltage::Zero,
        }
    }

    pub fn volts(self) -> f64 {
        match self {
            NominalVoltage::Zero => 0.0,
            NominalVoltage::Phase => NOMINAL_PHASE_VOLTAGE,
            NominalVoltage::Line => LINE_VOLTAGE,
        }
    }
}

impl fmt::Display for NominalVoltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NominalVoltage::Zero => write!(f, "0.00 V"),
            other => write!(f, "{:.1} V", other.volts()),
        }
    }
}

/// Voltage between the red and black probe.
pub fn measure_voltage(result: &SimulationResult, red: &NodeId, black: &NodeId) -> NominalVoltage {
    NominalVoltage::between(result.potential(red), result.potential(black))
}

/// What the clamp shows for one wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClampReading {
    Idle,
    Carrying { role: Role, forward: bool },
}

impl ClampReading {
    pub fn is_carrying(self) -> bool {
        matches!(self, ClampReading::Carrying { .. })
    }
}

impl From<Option<WireFlow>> for ClampReading {
    fn from(flow: Option<WireFlow>) -> Self {
        match flow {
            Some(WireFlow { role, forward }) => ClampReading::Carrying { role, forward },
            None => ClampReading::Idle,
        }
    }
}

pub fn clamp(result: &SimulationResult, wire: &str) -> ClampReading {
    result.flow(wire).into()
}
