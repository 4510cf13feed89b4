//! Core identifier and role types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a component instance in the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a wire in the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub String);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WireId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single terminal of a single component: the atomic point of the
/// continuity graph.
///
/// Serialized as `"component:terminal"` so it can key JSON maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId {
    pub component: ComponentId,
    pub terminal: String,
}

impl NodeId {
    pub fn new(component: &ComponentId, terminal: &str) -> Self {
        Self {
            component: component.clone(),
            terminal: terminal.to_string(),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.terminal)
    }
}

impl From<NodeId> for String {
    fn from(node: NodeId) -> Self {
        node.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        // Component ids may contain ':' themselves; terminal ids never do.
        match s.rsplit_once(':') {
            Some((component, terminal)) if !component.is_empty() && !terminal.is_empty() => {
                Ok(NodeId {
                    component: ComponentId::new(component),
                    terminal: terminal.to_string(),
                })
            }
            _ => Err(format!("node id '{s}' is not of the form component:terminal")),
        }
    }
}

/// Electrical role a terminal is designed for, fixed per device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalRole {
    #[serde(rename = "L")]
    Live,
    #[serde(rename = "N")]
    Neutral,
    #[serde(rename = "E")]
    Earth,
    Generic,
}

/// Conductor role assigned to a node by reachability from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Single-phase line
    #[serde(rename = "L")]
    Live,
    L1,
    L2,
    L3,
    #[serde(rename = "N")]
    Neutral,
    #[serde(rename = "E")]
    Earth,
}

impl Role {
    /// Propagation order. Later roles overwrite earlier ones in the node
    /// potential map.
    pub const ALL: [Role; 6] = [Role::L1, Role::L2, Role::L3, Role::Live, Role::Neutral, Role::Earth];

    /// All line roles (single phase and the three phases).
    pub const LIVE: [Role; 4] = [Role::L1, Role::L2, Role::L3, Role::Live];

    pub fn is_live(self) -> bool {
        matches!(self, Role::Live | Role::L1 | Role::L2 | Role::L3)
    }

    /// Whether this role is one of the three numbered phases.
    pub fn is_phase(self) -> bool {
        matches!(self, Role::L1 | Role::L2 | Role::L3)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Live => "L",
            Role::L1 => "L1",
            Role::L2 => "L2",
            Role::L3 => "L3",
            Role::Neutral => "N",
            Role::Earth => "E",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_string_form() {
        let node = NodeId::new(&ComponentId::new("mcb-1"), "OUT");
        let s: String = node.clone().into();
        assert_eq!(s, "mcb-1:OUT");
        assert_eq!(NodeId::try_from(s).unwrap(), node);
    }

    #[test]
    fn test_node_id_component_with_colon() {
        let node = NodeId::try_from("board:a:L_IN".to_string()).unwrap();
        assert_eq!(node.component.as_str(), "board:a");
        assert_eq!(node.terminal, "L_IN");
        assert!(NodeId::try_from("nocolon".to_string()).is_err());
    }

    #[test]
    fn test_role_classes() {
        assert!(Role::L2.is_live());
        assert!(Role::L2.is_phase());
        assert!(Role::Live.is_live());
        assert!(!Role::Live.is_phase());
        assert!(!Role::Earth.is_live());
        assert_eq!(Role::Neutral.to_string(), "N");
    }
}
