//! Device models for the installation diagram.
//!
//! This module provides the device catalog:
//! - Supplies: single-phase and three-phase
//! - Protection: MCB, RCD, fused connection unit
//! - Controls: 1-way, 2-way, 2-gang, intermediate, rotary isolator, cooker unit
//! - Loads: pendant lamp, sockets, fans (hardwired and plug-in)
//! - Connection: junction box, cooker outlet, connector block, N/E bars
//!
//! Each kind is one variant of [`Device`] carrying its own typed state. The
//! engine only talks to devices through [`Device::closed_pairs`] and the
//! static [`DeviceDef`] tables; the few kind-specific questions it needs
//! (supply seeds, plug outlets, protective poles) are answered here.

mod actions;
mod catalog;
mod protection;
mod supply;
mod switches;

pub use actions::DeviceAction;
pub use catalog::{lookup, Category, DeviceDef, TerminalDef, CATALOG};
pub use protection::{Latch, Pole, ProtectionClass, ProtectionDef};
pub use supply::{Earthing, SupplyState};
pub use switches::{CookerUnit, Outlet, Position, Switched, Throw, TwoGang};

use serde::{Deserialize, Serialize};

use crate::diagram::Role;

use switches::{intermediate_pairs, two_way_pairs};

/// A device kind together with its current state.
///
/// Serialized adjacently tagged, e.g. `{"type": "MCB", "state": "CLOSED"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Device {
    SourceAc(SupplyState),
    #[serde(rename = "SOURCE_3PH")]
    Source3Ph(SupplyState),
    Mcb(Latch),
    Rcd(Latch),
    SwitchFused(Latch),
    #[serde(rename = "SWITCH_1G")]
    Switch1G(Switched),
    #[serde(rename = "SWITCH_2W")]
    Switch2W(Throw),
    #[serde(rename = "SWITCH_2G_2W")]
    Switch2G2W(TwoGang),
    SwitchInt(Throw),
    SwitchRotary(Switched),
    SwitchCooker(CookerUnit),
    LampPendant,
    SocketSingle(Switched),
    SocketDouble(Switched),
    Fan,
    FanPlug,
    JunctionBox,
    OutletCooker,
    ConnectorBlock,
    BarNeutral,
    BarEarth,
}

impl Device {
    /// Static definition of this device kind.
    pub fn definition(&self) -> &'static DeviceDef {
        match self {
            Device::SourceAc(_) => &catalog::SOURCE_AC,
            Device::Source3Ph(_) => &catalog::SOURCE_3PH,
            Device::Mcb(_) => &catalog::MCB,
            Device::Rcd(_) => &catalog::RCD,
            Device::SwitchFused(_) => &catalog::SWITCH_FUSED,
            Device::Switch1G(_) => &catalog::SWITCH_1G,
            Device::Switch2W(_) => &catalog::SWITCH_2W,
            Device::Switch2G2W(_) => &catalog::SWITCH_2G_2W,
            Device::SwitchInt(_) => &catalog::SWITCH_INT,
            Device::SwitchRotary(_) => &catalog::SWITCH_ROTARY,
            Device::SwitchCooker(_) => &catalog::SWITCH_COOKER,
            Device::LampPendant => &catalog::LAMP_PENDANT,
            Device::SocketSingle(_) => &catalog::SOCKET_SINGLE,
            Device::SocketDouble(_) => &catalog::SOCKET_DOUBLE,
            Device::Fan => &catalog::FAN,
            Device::FanPlug => &catalog::FAN_PLUG,
            Device::JunctionBox => &catalog::JUNCTION_BOX,
            Device::OutletCooker => &catalog::OUTLET_COOKER,
            Device::ConnectorBlock => &catalog::CONNECTOR_BLOCK,
            Device::BarNeutral => &catalog::BAR_NEUTRAL,
            Device::BarEarth => &catalog::BAR_EARTH,
        }
    }

    /// Type tag as used in diagram files.
    pub fn type_tag(&self) -> &'static str {
        self.definition().type_tag
    }

    /// Terminal pairs currently bridged inside the device.
    pub fn closed_pairs(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Device::Mcb(latch) if latch.is_closed() => vec![("IN", "OUT")],
            Device::Rcd(latch) | Device::SwitchFused(latch) if latch.is_closed() => {
                vec![("L_IN", "L_OUT"), ("N_IN", "N_OUT")]
            }
            Device::Switch1G(sw) if sw.on => vec![("COM", "L1")],
            Device::Switch2W(throw) => vec![two_way_pairs(throw.position, "COM", "L1", "L2")],
            Device::Switch2G2W(gangs) => vec![
                two_way_pairs(gangs.gang1, "COM1", "L1_1", "L2_1"),
                two_way_pairs(gangs.gang2, "COM2", "L1_2", "L2_2"),
            ],
            Device::SwitchInt(throw) => intermediate_pairs(throw.position).to_vec(),
            Device::SwitchRotary(sw) if sw.on => vec![
                ("L1_IN", "L1_OUT"),
                ("L2_IN", "L2_OUT"),
                ("L3_IN", "L3_OUT"),
                ("N_IN", "N_OUT"),
            ],
            Device::SwitchCooker(unit) if unit.on => vec![("L_IN", "L_OUT"), ("N_IN", "N_OUT")],
            Device::OutletCooker => vec![("L_IN", "L_OUT"), ("N_IN", "N_OUT"), ("E_IN", "E_OUT")],
            Device::ConnectorBlock => vec![("T1", "T2")],
            Device::BarNeutral | Device::BarEarth => {
                vec![("T1", "T2"), ("T2", "T3"), ("T3", "T4"), ("T4", "T5")]
            }
            _ => Vec::new(),
        }
    }

    /// Supply state, if this device is a supply.
    pub fn supply(&self) -> Option<&SupplyState> {
        match self {
            Device::SourceAc(state) | Device::Source3Ph(state) => Some(state),
            _ => None,
        }
    }

    /// Whether this is a supply that is switched on.
    pub fn is_active_source(&self) -> bool {
        self.supply().is_some_and(|s| s.on)
    }

    /// Role seeds `(role, terminal)` this device injects. Empty unless it is
    /// an active supply.
    pub fn source_seeds(&self) -> &'static [(Role, &'static str)] {
        match self {
            Device::SourceAc(state) if state.on => supply::SINGLE_PHASE_SEEDS,
            Device::Source3Ph(state) if state.on => supply::THREE_PHASE_SEEDS,
            _ => &[],
        }
    }

    /// Terminals a plug-in appliance bridges to, while the local outlet
    /// switch is on.
    pub fn outlet(&self) -> Option<Outlet> {
        match self {
            Device::SocketSingle(sw) | Device::SocketDouble(sw) if sw.on => Some(Outlet {
                live: "L",
                neutral: "N",
                earth: "E",
            }),
            // The cooker unit socket taps the supply side of its main switch.
            Device::SwitchCooker(unit) if unit.socket_on => Some(Outlet {
                live: "L_IN",
                neutral: "N_IN",
                earth: "E",
            }),
            _ => None,
        }
    }

    /// Whether this device can be plugged into an outlet.
    pub fn is_portable(&self) -> bool {
        matches!(self, Device::FanPlug)
    }

    /// Protective latch, if this is a protective device.
    pub fn latch(&self) -> Option<Latch> {
        match self {
            Device::Mcb(latch) | Device::Rcd(latch) | Device::SwitchFused(latch) => Some(*latch),
            _ => None,
        }
    }

    pub fn latch_mut(&mut self) -> Option<&mut Latch> {
        match self {
            Device::Mcb(latch) | Device::Rcd(latch) | Device::SwitchFused(latch) => Some(latch),
            _ => None,
        }
    }
}
