//! Supplies: the only devices that seed potential into the diagram.

use serde::{Deserialize, Serialize};

use crate::diagram::Role;

/// Earthing arrangement at the supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Earthing {
    /// Separate neutral and protective earth all the way from the supply.
    #[default]
    #[serde(rename = "TN-S")]
    TnS,
    /// Combined neutral/earth: N and E are bonded at the supply terminals.
    #[serde(rename = "TN-C-S")]
    TnCS,
}

/// State of a supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplyState {
    #[serde(default)]
    pub on: bool,
    #[serde(default)]
    pub earthing: Earthing,
}

impl SupplyState {
    pub fn new(on: bool) -> Self {
        Self {
            on,
            earthing: Earthing::TnS,
        }
    }

    pub fn with_earthing(mut self, earthing: Earthing) -> Self {
        self.earthing = earthing;
        self
    }

    /// Whether the supply bonds neutral to earth at its terminals.
    pub fn pen_bonded(&self) -> bool {
        self.earthing == Earthing::TnCS
    }
}

/// Seed terminals of a single-phase supply.
pub(crate) const SINGLE_PHASE_SEEDS: &[(Role, &str)] =
    &[(Role::Live, "L"), (Role::Neutral, "N"), (Role::Earth, "E")];

/// Seed terminals of a three-phase supply.
pub(crate) const THREE_PHASE_SEEDS: &[(Role, &str)] = &[
    (Role::L1, "L1"),
    (Role::L2, "L2"),
    (Role::L3, "L3"),
    (Role::Neutral, "N"),
    (Role::Earth, "E"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_supply_is_off_and_separated() {
        let state = SupplyState::default();
        assert!(!state.on);
        assert!(!state.pen_bonded());
        assert!(SupplyState::new(true).with_earthing(Earthing::TnCS).pen_bonded());
    }

    #[test]
    fn test_earthing_wire_names() {
        let json = serde_json::to_string(&Earthing::TnCS).unwrap();
        assert_eq!(json, "\"TN-C-S\"");
    }
}
