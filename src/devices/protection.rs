//! Protective devices: pole layout and the trip latch.
//!
//! Every protective device (MCB, RCD, fused switch) carries a three-state
//! latch:
//!
//! ```text
//!            user             engine fault
//!   Open  <-------->  Closed  ------------>  Tripped
//!     ^                                         |
//!     +------------------ reset ----------------+
//! ```
//!
//! Only `Closed` conducts. The engine never writes the latch; it reports
//! which devices must trip and the caller applies [`Latch::trip`].

use serde::{Deserialize, Serialize};

/// Kind of protection a device provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionClass {
    /// MCBs and fuses: trip on a short downstream.
    Overcurrent,
    /// RCDs: trip on current returning outside their own poles.
    ResidualCurrent,
}

/// One switched pole of a protective device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pole {
    /// Supply-side terminal
    pub input: &'static str,
    /// Load-side terminal
    pub output: &'static str,
}

impl Pole {
    pub const fn new(input: &'static str, output: &'static str) -> Self {
        Self { input, output }
    }
}

/// Protective behaviour of a device type.
#[derive(Debug, Clone, Copy)]
pub struct ProtectionDef {
    pub class: ProtectionClass,
    pub line: Pole,
    pub neutral: Option<Pole>,
}

impl ProtectionDef {
    /// All poles, line first.
    pub fn poles(&self) -> impl Iterator<Item = Pole> {
        std::iter::once(self.line).chain(self.neutral)
    }

    /// Every pole terminal except `except`. A guarded search started at a
    /// pole output must never step onto these.
    pub fn guard_terminals(&self, except: &str) -> Vec<&'static str> {
        self.poles()
            .flat_map(|p| [p.input, p.output])
            .filter(|t| *t != except)
            .collect()
    }
}

/// Three-state protective latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Latch {
    /// Off, not conducting
    #[default]
    Open,
    /// On, conducting
    Closed,
    /// Latched off by a fault, waiting for a reset
    Tripped,
}

impl Latch {
    pub fn is_closed(self) -> bool {
        self == Latch::Closed
    }

    pub fn is_tripped(self) -> bool {
        self == Latch::Tripped
    }

    /// User lever: Open and Closed swap. A tripped latch ignores the lever
    /// and stays tripped.
    pub fn toggle(&mut self) {
        *self = match *self {
            Latch::Open => Latch::Closed,
            Latch::Closed => Latch::Open,
            Latch::Tripped => Latch::Tripped,
        };
    }

    /// Explicit reset: Tripped goes to Open. Other states are unchanged.
    pub fn reset(&mut self) {
        if *self == Latch::Tripped {
            *self = Latch::Open;
        }
    }

    /// Automatic trip. Only a closed latch can trip; returns whether it did.
    pub fn trip(&mut self) -> bool {
        if *self == Latch::Closed {
            *self = Latch::Tripped;
            true
        } else {
            false
        }
    }
}
