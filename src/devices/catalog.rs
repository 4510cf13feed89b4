//! Static device definitions: terminal tables and catalog metadata.

use crate::diagram::TerminalRole;

use super::protection::{Pole, ProtectionClass, ProtectionDef};

/// Broad device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Supply,
    Protection,
    Control,
    Load,
    Connection,
}

/// One terminal of a device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalDef {
    pub id: &'static str,
    pub label: &'static str,
    pub role: TerminalRole,
}

const fn term(id: &'static str, label: &'static str, role: TerminalRole) -> TerminalDef {
    TerminalDef { id, label, role }
}

use TerminalRole::{Earth as E, Generic as G, Live as L, Neutral as N};

/// Read-only definition of a device type.
#[derive(Debug)]
pub struct DeviceDef {
    /// Type tag used in diagram files (e.g. `MCB`)
    pub type_tag: &'static str,
    /// Human readable catalog name
    pub name: &'static str,
    pub category: Category,
    pub terminals: &'static [TerminalDef],
    /// Nominal rating in amps
    pub rating: Option<f64>,
    /// Nominal load in watts
    pub load_watts: Option<f64>,
    pub protection: Option<ProtectionDef>,
}

impl DeviceDef {
    /// Look up a terminal by id.
    pub fn terminal(&self, id: &str) -> Option<&'static TerminalDef> {
        self.terminals.iter().find(|t| t.id == id)
    }

    pub fn has_terminal(&self, id: &str) -> bool {
        self.terminal(id).is_some()
    }

    /// First terminal carrying the given role.
    pub fn first_with_role(&self, role: TerminalRole) -> Option<&'static str> {
        self.terminals.iter().find(|t| t.role == role).map(|t| t.id)
    }

    /// Designated (line, neutral) terminal pair used for energization and
    /// for the load bridge of the closed graph.
    pub fn energy_terminals(&self) -> Option<(&'static str, &'static str)> {
        Some((self.first_with_role(L)?, self.first_with_role(N)?))
    }

    pub fn is_load(&self) -> bool {
        self.category == Category::Load
    }
}

pub static SOURCE_AC: DeviceDef = DeviceDef {
    type_tag: "SOURCE_AC",
    name: "230V AC Supply",
    category: Category::Supply,
    terminals: &[term("L", "L", L), term("N", "N", N), term("E", "E", E)],
    rating: Some(100.0),
    load_watts: None,
    protection: None,
};

pub static SOURCE_3PH: DeviceDef = DeviceDef {
    type_tag: "SOURCE_3PH",
    name: "3-Phase Supply (400V)",
    category: Category::Supply,
    terminals: &[
        term("L1", "L1", L),
        term("L2", "L2", L),
        term("L3", "L3", L),
        term("N", "N", N),
        term("E", "E", E),
    ],
    rating: Some(100.0),
    load_watts: None,
    protection: None,
};

pub static MCB: DeviceDef = DeviceDef {
    type_tag: "MCB",
    name: "MCB (6A)",
    category: Category::Protection,
    terminals: &[term("IN", "In", L), term("OUT", "Out", L)],
    rating: Some(6.0),
    load_watts: None,
    protection: Some(ProtectionDef {
        class: ProtectionClass::Overcurrent,
        line: Pole::new("IN", "OUT"),
        neutral: None,
    }),
};

pub static RCD: DeviceDef = DeviceDef {
    type_tag: "RCD",
    name: "RCD (Main Switch)",
    category: Category::Protection,
    terminals: &[
        term("L_IN", "L In", L),
        term("N_IN", "N In", N),
        term("L_OUT", "L Out", L),
        term("N_OUT", "N Out", N),
    ],
    rating: Some(63.0),
    load_watts: None,
    protection: Some(ProtectionDef {
        class: ProtectionClass::ResidualCurrent,
        line: Pole::new("L_IN", "L_OUT"),
        neutral: Some(Pole::new("N_IN", "N_OUT")),
    }),
};

pub static SWITCH_FUSED: DeviceDef = DeviceDef {
    type_tag: "SWITCH_FUSED",
    name: "Fused Switch (FCU)",
    category: Category::Protection,
    terminals: &[
        term("L_IN", "L In", L),
        term("N_IN", "N In", N),
        term("L_OUT", "L Out", L),
        term("N_OUT", "N Out", N),
        term("E", "E", E),
    ],
    rating: Some(13.0),
    load_watts: None,
    protection: Some(ProtectionDef {
        class: ProtectionClass::Overcurrent,
        line: Pole::new("L_IN", "L_OUT"),
        neutral: Some(Pole::new("N_IN", "N_OUT")),
    }),
};

pub static SWITCH_1G: DeviceDef = DeviceDef {
    type_tag: "SWITCH_1G",
    name: "1-Way Switch",
    category: Category::Control,
    terminals: &[term("COM", "COM", G), term("L1", "L1", G), term("E", "E", E)],
    rating: None,
    load_watts: None,
    protection: None,
};

pub static SWITCH_2W: DeviceDef = DeviceDef {
    type_tag: "SWITCH_2W",
    name: "2-Way Switch",
    category: Category::Control,
    terminals: &[
        term("COM", "COM", G),
        term("L1", "L1", G),
        term("L2", "L2", G),
        term("E", "E", E),
    ],
    rating: None,
    load_watts: None,
    protection: None,
};

pub static SWITCH_2G_2W: DeviceDef = DeviceDef {
    type_tag: "SWITCH_2G_2W",
    name: "2-Gang 2-Way Switch",
    category: Category::Control,
    terminals: &[
        term("COM1", "C1", G),
        term("L1_1", "1_1", G),
        term("L2_1", "2_1", G),
        term("COM2", "C2", G),
        term("L1_2", "1_2", G),
        term("L2_2", "2_2", G),
        term("E", "E", E),
    ],
    rating: None,
    load_watts: None,
    protection: None,
};

pub static SWITCH_INT: DeviceDef = DeviceDef {
    type_tag: "SWITCH_INT",
    name: "Intermediate Switch",
    category: Category::Control,
    terminals: &[
        term("L1", "L1", G),
        term("L2", "L2", G),
        term("L3", "L3", G),
        term("L4", "L4", G),
        term("E", "E", E),
    ],
    rating: None,
    load_watts: None,
    protection: None,
};

pub static SWITCH_ROTARY: DeviceDef = DeviceDef {
    type_tag: "SWITCH_ROTARY",
    name: "3P+N Isolator 32A",
    category: Category::Control,
    terminals: &[
        term("L1_IN", "L1 In", L),
        term("L2_IN", "L2 In", L),
        term("L3_IN", "L3 In", L),
        term("N_IN", "N In", N),
        term("L1_OUT", "L1 Out", L),
        term("L2_OUT", "L2 Out", L),
        term("L3_OUT", "L3 Out", L),
        term("N_OUT", "N Out", N),
        term("E", "E", E),
    ],
    rating: Some(32.0),
    load_watts: None,
    protection: None,
};

pub static SWITCH_COOKER: DeviceDef = DeviceDef {
    type_tag: "SWITCH_COOKER",
    name: "Cooker Control Unit",
    category: Category::Control,
    terminals: &[
        term("L_IN", "L In", L),
        term("N_IN", "N In", N),
        term("L_OUT", "L Out", L),
        term("N_OUT", "N Out", N),
        term("E", "E", E),
    ],
    rating: Some(45.0),
    load_watts: None,
    protection: None,
};

pub static LAMP_PENDANT: DeviceDef = DeviceDef {
    type_tag: "LAMP_PENDANT",
    name: "Pendant Set (Rose)",
    category: Category::Load,
    // L is the switched line, LOOP the permanent live loop-in terminal
    terminals: &[
        term("L", "L", L),
        term("LOOP", "Loop", L),
        term("N", "N", N),
        term("E", "E", E),
    ],
    rating: None,
    load_watts: Some(100.0),
    protection: None,
};

pub static SOCKET_SINGLE: DeviceDef = DeviceDef {
    type_tag: "SOCKET_SINGLE",
    name: "Single Socket",
    category: Category::Load,
    terminals: &[term("L", "L", L), term("N", "N", N), term("E", "E", E)],
    rating: Some(13.0),
    load_watts: Some(2300.0),
    protection: None,
};

pub static SOCKET_DOUBLE: DeviceDef = DeviceDef {
    type_tag: "SOCKET_DOUBLE",
    name: "Double Socket",
    category: Category::Load,
    terminals: &[term("L", "L", L), term("N", "N", N), term("E", "E", E)],
    rating: Some(13.0),
    load_watts: Some(3000.0),
    protection: None,
};

pub static FAN: DeviceDef = DeviceDef {
    type_tag: "FAN",
    name: "Extractor Fan (Hardwired)",
    category: Category::Load,
    terminals: &[term("L", "L", L), term("N", "N", N), term("E", "E", E)],
    rating: None,
    load_watts: Some(60.0),
    protection: None,
};

pub static FAN_PLUG: DeviceDef = DeviceDef {
    type_tag: "FAN_PLUG",
    name: "Portable Fan (Plug)",
    category: Category::Load,
    terminals: &[term("L", "L", L), term("N", "N", N), term("E", "E", E)],
    rating: None,
    load_watts: Some(60.0),
    protection: None,
};

pub static JUNCTION_BOX: DeviceDef = DeviceDef {
    type_tag: "JUNCTION_BOX",
    name: "Junction Box (4T)",
    category: Category::Connection,
    terminals: &[
        term("T1", "T1", G),
        term("T2", "T2", G),
        term("T3", "T3", G),
        term("T4", "T4", G),
    ],
    rating: None,
    load_watts: None,
    protection: None,
};

pub static OUTLET_COOKER: DeviceDef = DeviceDef {
    type_tag: "OUTLET_COOKER",
    name: "Cooker Outlet Plate",
    category: Category::Connection,
    terminals: &[
        term("L_IN", "L In", L),
        term("E_IN", "E In", E),
        term("N_IN", "N In", N),
        term("L_OUT", "L Out", L),
        term("E_OUT", "E Out", E),
        term("N_OUT", "N Out", N),
    ],
    rating: None,
    load_watts: None,
    protection: None,
};

pub static CONNECTOR_BLOCK: DeviceDef = DeviceDef {
    type_tag: "CONNECTOR_BLOCK",
    name: "Connector Block",
    category: Category::Connection,
    terminals: &[term("T1", "1", G), term("T2", "2", G)],
    rating: None,
    load_watts: None,
    protection: None,
};

const BAR_NEUTRAL_TERMINALS: &[TerminalDef] = &[
    term("T1", "1", N),
    term("T2", "2", N),
    term("T3", "3", N),
    term("T4", "4", N),
    term("T5", "5", N),
];

const BAR_EARTH_TERMINALS: &[TerminalDef] = &[
    term("T1", "1", E),
    term("T2", "2", E),
    term("T3", "3", E),
    term("T4", "4", E),
    term("T5", "5", E),
];

pub static BAR_NEUTRAL: DeviceDef = DeviceDef {
    type_tag: "BAR_NEUTRAL",
    name: "Neutral Bar (5T)",
    category: Category::Connection,
    terminals: BAR_NEUTRAL_TERMINALS,
    rating: None,
    load_watts: None,
    protection: None,
};

pub static BAR_EARTH: DeviceDef = DeviceDef {
    type_tag: "BAR_EARTH",
    name: "Earth Bar (5T)",
    category: Category::Connection,
    terminals: BAR_EARTH_TERMINALS,
    rating: None,
    load_watts: None,
    protection: None,
};

/// Every definition in the catalog, in palette order.
pub static CATALOG: [&DeviceDef; 21] = [
    &SOURCE_AC,
    &SOURCE_3PH,
    &MCB,
    &RCD,
    &SWITCH_FUSED,
    &SWITCH_1G,
    &SWITCH_2W,
    &SWITCH_2G_2W,
    &SWITCH_INT,
    &SWITCH_ROTARY,
    &SWITCH_COOKER,
    &LAMP_PENDANT,
    &SOCKET_SINGLE,
    &SOCKET_DOUBLE,
    &FAN,
    &FAN_PLUG,
    &JUNCTION_BOX,
    &OUTLET_COOKER,
    &CONNECTOR_BLOCK,
    &BAR_NEUTRAL,
    &BAR_EARTH,
];

/// Find a definition by its type tag.
pub fn lookup(type_tag: &str) -> Option<&'static DeviceDef> {
    CATALOG.iter().copied().find(|d| d.type_tag == type_tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamp_energy_terminals_use_switched_line() {
        assert_eq!(LAMP_PENDANT.energy_terminals(), Some(("L", "N")));
        assert_eq!(SWITCH_COOKER.energy_terminals(), Some(("L_IN", "N_IN")));
        assert_eq!(MCB.energy_terminals(), None);
        assert_eq!(BAR_NEUTRAL.energy_terminals(), None);
    }

    #[test]
    fn test_protection_poles_exist() {
        for def in CATALOG.iter() {
            let Some(prot) = def.protection.as_ref() else {
                continue;
            };
            for pole in prot.poles() {
                assert!(def.has_terminal(pole.input), "{}:{}", def.type_tag, pole.input);
                assert!(def.has_terminal(pole.output), "{}:{}", def.type_tag, pole.output);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("RCD").map(|d| d.name), Some("RCD (Main Switch)"));
        assert!(lookup("TOASTER").is_none());
    }
}
