//! Diagram validation.
//!
//! The engine tolerates half-edited diagrams, so most findings here are
//! warnings. Only id collisions are errors: they make node identity
//! ambiguous.

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::devices::Device;
use crate::error::{LvError, Result};

use super::{Diagram, NodeId};

/// A non-fatal problem in a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramIssue {
    /// Wire endpoint names a component that does not exist
    DanglingComponent { wire: String, node: NodeId },
    /// Wire endpoint names a terminal the device does not have
    UnknownTerminal { wire: String, node: NodeId },
    /// Plug link points at a missing component or one without an outlet
    BrokenPlug { component: String, host: String },
}

impl fmt::Display for DiagramIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramIssue::DanglingComponent { wire, node } => {
                write!(f, "wire '{wire}' references missing component at '{node}'")
            }
            DiagramIssue::UnknownTerminal { wire, node } => {
                write!(f, "wire '{wire}' references unknown terminal '{node}'")
            }
            DiagramIssue::BrokenPlug { component, host } => {
                write!(f, "'{component}' is plugged into '{host}', which is not an outlet")
            }
        }
    }
}

/// Validate a diagram.
///
/// Checks:
/// - No duplicate component ids
/// - No duplicate wire ids
///
/// Returns the warnings found (dangling wires, unknown terminals, broken
/// plug links); these are also logged.
pub fn validate_diagram(diagram: &Diagram) -> Result<Vec<DiagramIssue>> {
    let mut seen = HashSet::new();
    for comp in &diagram.components {
        if !seen.insert(comp.id.as_str()) {
            return Err(LvError::DuplicateComponent {
                id: comp.id.to_string(),
            });
        }
    }

    let mut seen_wires = HashSet::new();
    for wire in &diagram.wires {
        if !seen_wires.insert(wire.id.0.as_str()) {
            return Err(LvError::DuplicateWire {
                id: wire.id.to_string(),
            });
        }
    }

    let mut issues = Vec::new();
    for wire in &diagram.wires {
        for node in [&wire.from, &wire.to] {
            match diagram.component(node.component.as_str()) {
                None => issues.push(DiagramIssue::DanglingComponent {
                    wire: wire.id.to_string(),
                    node: node.clone(),
                }),
                Some(comp) if !comp.device.definition().has_terminal(&node.terminal) => {
                    issues.push(DiagramIssue::UnknownTerminal {
                        wire: wire.id.to_string(),
                        node: node.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    for comp in &diagram.components {
        let Some(host_id) = &comp.plugged_into else {
            continue;
        };
        // An outlet that is merely switched off is still an outlet.
        let is_outlet = diagram.component(host_id.as_str()).is_some_and(|host| {
            matches!(
                host.device,
                Device::SocketSingle(_) | Device::SocketDouble(_) | Device::SwitchCooker(_)
            )
        });
        if !is_outlet {
            issues.push(DiagramIssue::BrokenPlug {
                component: comp.id.to_string(),
                host: host_id.to_string(),
            });
        }
    }

    for issue in &issues {
        warn!(%issue, "diagram issue");
    }

    Ok(issues)
}
