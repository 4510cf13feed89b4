//! User actions on devices.
//!
//! These are the state transitions the editor triggers: flipping switches,
//! resetting tripped breakers, pressing an RCD's test button. The engine
//! never calls them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LvError;

use super::Device;

/// A user action on a single device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceAction {
    /// Main lever / switch / rocker.
    Toggle,
    /// Reset a tripped protective device to open.
    Reset,
    /// RCD test button.
    Test,
    /// Socket switch of a cooker control unit.
    ToggleSocket,
    /// One gang of a two-gang switch (1 or 2).
    ToggleGang(u8),
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAction::Toggle => write!(f, "toggle"),
            DeviceAction::Reset => write!(f, "reset"),
            DeviceAction::Test => write!(f, "test"),
            DeviceAction::ToggleSocket => write!(f, "socket"),
            DeviceAction::ToggleGang(n) => write!(f, "gang{n}"),
        }
    }
}

impl FromStr for DeviceAction {
    type Err = LvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toggle" => Ok(DeviceAction::Toggle),
            "reset" => Ok(DeviceAction::Reset),
            "test" => Ok(DeviceAction::Test),
            "socket" => Ok(DeviceAction::ToggleSocket),
            "gang1" | "sw1" => Ok(DeviceAction::ToggleGang(1)),
            "gang2" | "sw2" => Ok(DeviceAction::ToggleGang(2)),
            _ => Err(LvError::UnknownAction {
                action: s.to_string(),
            }),
        }
    }
}

impl Device {
    /// Apply a user action. Returns `false` if this device kind has no such
    /// control, in which case the state is untouched.
    pub fn apply(&mut self, action: DeviceAction) -> bool {
        match (self, action) {
            (Device::SourceAc(state) | Device::Source3Ph(state), DeviceAction::Toggle) => {
                state.on = !state.on;
            }
            (Device::Mcb(latch) | Device::Rcd(latch) | Device::SwitchFused(latch), DeviceAction::Toggle) => {
                latch.toggle();
            }
            (Device::Mcb(latch) | Device::Rcd(latch) | Device::SwitchFused(latch), DeviceAction::Reset) => {
                latch.reset();
            }
            (Device::Rcd(latch), DeviceAction::Test) => {
                latch.trip();
            }
            (
                Device::Switch1G(sw)
                | Device::SwitchRotary(sw)
                | Device::SocketSingle(sw)
                | Device::SocketDouble(sw),
                DeviceAction::Toggle,
            ) => sw.toggle(),
            (Device::Switch2W(throw) | Device::SwitchInt(throw), DeviceAction::Toggle) => {
                throw.position.flip();
            }
            (Device::Switch2G2W(gangs), DeviceAction::Toggle | DeviceAction::ToggleGang(1)) => {
                gangs.gang1.flip();
            }
            (Device::Switch2G2W(gangs), DeviceAction::ToggleGang(2)) => gangs.gang2.flip(),
            (Device::SwitchCooker(unit), DeviceAction::Toggle) => unit.on = !unit.on,
            (Device::SwitchCooker(unit), DeviceAction::ToggleSocket) => {
                unit.socket_on = !unit.socket_on;
            }
            _ => return false,
        }
        true
    }
}
