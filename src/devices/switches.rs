//! Control components: plain switches, change-over switches and the cooker
//! control unit.

use serde::{Deserialize, Serialize};

/// State of a simple on/off device (1-way switch, isolator, socket switch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Switched {
    #[serde(default)]
    pub on: bool,
}

impl Switched {
    pub fn new(on: bool) -> Self {
        Self { on }
    }

    pub fn toggle(&mut self) {
        self.on = !self.on;
    }
}

/// Position of a change-over contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// 2-way: COM to L1. Intermediate: straight through.
    #[default]
    First,
    /// 2-way: COM to L2. Intermediate: crossed.
    Second,
}

impl Position {
    pub fn flip(&mut self) {
        *self = match *self {
            Position::First => Position::Second,
            Position::Second => Position::First,
        };
    }
}

/// State of a single change-over switch (2-way or intermediate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Throw {
    #[serde(default)]
    pub position: Position,
}

impl Throw {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

/// State of a two-gang 2-way switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TwoGang {
    #[serde(default)]
    pub gang1: Position,
    #[serde(default)]
    pub gang2: Position,
}

/// State of a cooker control unit: a double-pole main switch plus a socket
/// outlet tapped from the supply side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CookerUnit {
    #[serde(default)]
    pub on: bool,
    #[serde(default)]
    pub socket_on: bool,
}

/// Contacts of a 2-way switch.
pub(crate) fn two_way_pairs(
    position: Position,
    com: &'static str,
    l1: &'static str,
    l2: &'static str,
) -> (&'static str, &'static str) {
    match position {
        Position::First => (com, l1),
        Position::Second => (com, l2),
    }
}

/// Contacts of an intermediate switch.
pub(crate) fn intermediate_pairs(position: Position) -> [(&'static str, &'static str); 2] {
    match position {
        Position::First => [("L1", "L3"), ("L2", "L4")],
        Position::Second => [("L1", "L4"), ("L2", "L3")],
    }
}

/// Outlet terminals a plug bridges to: (line, neutral, earth).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outlet {
    pub live: &'static str,
    pub neutral: &'static str,
    pub earth: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_way_contacts() {
        assert_eq!(two_way_pairs(Position::First, "COM", "L1", "L2"), ("COM", "L1"));
        assert_eq!(two_way_pairs(Position::Second, "COM", "L1", "L2"), ("COM", "L2"));
    }

    #[test]
    fn test_intermediate_crosses() {
        let mut pos = Position::First;
        assert_eq!(intermediate_pairs(pos), [("L1", "L3"), ("L2", "L4")]);
        pos.flip();
        assert_eq!(intermediate_pairs(pos), [("L1", "L4"), ("L2", "L3")]);
    }

    #[test]
    fn test_switched_toggle() {
        let mut sw = Switched::default();
        sw.toggle();
        assert!(sw.on);
    }
}
