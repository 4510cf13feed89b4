//! Insulation and continuity tester.
//!
//! Resistance modes refuse to measure while the probes see a voltage.
//! Continuity is judged on the open graph of the current diagram: two
//! probes are connected if a path of wires and closed contacts joins them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagram::{Diagram, NodeId, Role};
use crate::engine::{build_open_graph, guarded_search, SimulationResult};

use super::multimeter::{measure_voltage, NominalVoltage};

/// Rotary selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TesterMode {
    #[default]
    Off,
    Voltage,
    Continuity,
    #[serde(rename = "IR_250")]
    Ir250,
    #[serde(rename = "IR_500")]
    Ir500,
    #[serde(rename = "IR_1000")]
    Ir1000,
}

impl TesterMode {
    fn is_insulation(self) -> bool {
        matches!(self, TesterMode::Ir250 | TesterMode::Ir500 | TesterMode::Ir1000)
    }
}

/// Display of the tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Blank,
    Volts(NominalVoltage),
    /// Voltage present, resistance test locked out
    VoltageLockout,
    ContinuityClosed,
    ContinuityOpen,
    /// Insulation test selected but the test button is not held
    Idle,
    InsulationShort,
    /// Above the range ceiling of the selected mode
    InsulationAbove(TesterMode),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Blank => Ok(()),
            Reading::Volts(NominalVoltage::Zero) => write!(f, "0 V"),
            Reading::Volts(v) => write!(f, "{} V", v.volts() as u32),
            Reading::VoltageLockout => write!(f, "VOLT!"),
            Reading::ContinuityClosed => write!(f, "0.05 Ω"),
            Reading::ContinuityOpen => write!(f, "> 99 Ω"),
            Reading::Idle => write!(f, "---"),
            Reading::InsulationShort => write!(f, "0.00 MΩ"),
            Reading::InsulationAbove(TesterMode::Ir250) => write!(f, "> 200 MΩ"),
            Reading::InsulationAbove(TesterMode::Ir500) => write!(f, "> 500 MΩ"),
            Reading::InsulationAbove(_) => write!(f, "> 999 MΩ"),
        }
    }
}

/// Tester state: selector, probes and test button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsulationTester {
    pub mode: TesterMode,
    pub red: Option<NodeId>,
    pub black: Option<NodeId>,
    /// Test button held
    #[serde(default)]
    pub testing: bool,
}

impl InsulationTester {
    pub fn new(mode: TesterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_probes(mut self, red: NodeId, black: NodeId) -> Self {
        self.red = Some(red);
        self.black = Some(black);
        self
    }

    pub fn with_test_held(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    /// Read the display against a diagram and its latest result.
    pub fn read(&self, diagram: &Diagram, result: &SimulationResult) -> Reading {
        if self.mode == TesterMode::Off {
            return Reading::Blank;
        }

        let roles = (
            self.red.as_ref().and_then(|n| result.potential(n)),
            self.black.as_ref().and_then(|n| result.potential(n)),
        );
        let any_live = [roles.0, roles.1].into_iter().flatten().any(Role::is_live);
        let voltage_present = roles.0 != roles.1 && any_live;

        if self.mode == TesterMode::Voltage {
            return match (&self.red, &self.black) {
                (Some(red), Some(black)) if voltage_present => Reading::Volts(measure_voltage(result, red, black)),
                _ => Reading::Volts(NominalVoltage::Zero),
            };
        }
        if voltage_present {
            return Reading::VoltageLockout;
        }

        let (Some(red), Some(black)) = (&self.red, &self.black) else {
            return self.open_reading();
        };
        let connected = probes_connected(diagram, red, black);

        match self.mode {
            TesterMode::Continuity if connected => Reading::ContinuityClosed,
            TesterMode::Continuity => Reading::ContinuityOpen,
            mode if mode.is_insulation() && !self.testing => Reading::Idle,
            _ if connected => Reading::InsulationShort,
            mode => Reading::InsulationAbove(mode),
        }
    }

    fn open_reading(&self) -> Reading {
        match self.mode {
            TesterMode::Continuity => Reading::ContinuityOpen,
            mode => Reading::InsulationAbove(mode),
        }
    }
}

/// Whether any conducting path joins two nodes with every load open.
pub fn probes_connected(diagram: &Diagram, a: &NodeId, b: &NodeId) -> bool {
    if a == b {
        return true;
    }
    let graph = build_open_graph(&diagram.components, &diagram.wires);
    guarded_search(&graph, a, &HashSet::new(), |n| n == b)
}
