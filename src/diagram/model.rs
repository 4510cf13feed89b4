//! Diagram data model: component instances and wires.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{ComponentId, NodeId, WireId};
use crate::devices::Device;
use crate::error::{LvError, Result};

/// User overrides attached to an instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Rating override in amps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Load override in watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watts: Option<f64>,
    /// Anything else the editor stores; carried through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One placed device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: ComponentId,
    pub device: Device,
    #[serde(default)]
    pub properties: Properties,
    /// Host outlet a portable appliance is plugged into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugged_into: Option<ComponentId>,
}

impl ComponentInstance {
    pub fn new(id: impl Into<String>, device: Device) -> Self {
        Self {
            id: ComponentId::new(id),
            device,
            properties: Properties::default(),
            plugged_into: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.properties.label = Some(label.into());
        self
    }

    pub fn plugged_into(mut self, host: impl Into<String>) -> Self {
        self.plugged_into = Some(ComponentId::new(host));
        self
    }

    /// Name used in messages: the label if set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.properties.label.as_deref().unwrap_or(self.id.as_str())
    }

    /// Rating in amps, override first.
    pub fn rating(&self) -> Option<f64> {
        self.properties.rating.or(self.device.definition().rating)
    }

    /// Nominal load in watts, override first.
    pub fn watts(&self) -> Option<f64> {
        self.properties.watts.or(self.device.definition().load_watts)
    }

    /// Node for one of this instance's terminals.
    pub fn node(&self, terminal: &str) -> NodeId {
        NodeId::new(&self.id, terminal)
    }
}

/// Wire sheath/sleeve colour. Carried for the editor only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireColor {
    Brown,
    Blue,
    Green,
    Black,
    Grey,
}

/// A conductor between two terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<WireColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeving: Option<WireColor>,
}

impl Wire {
    /// Create a wire between `from` and `to`, each given as
    /// `(component, terminal)`.
    pub fn new(id: impl Into<String>, from: (&str, &str), to: (&str, &str)) -> Self {
        Self {
            id: WireId(id.into()),
            from: NodeId::new(&ComponentId::new(from.0), from.1),
            to: NodeId::new(&ComponentId::new(to.0), to.1),
            color: None,
            sleeving: None,
        }
    }

    pub fn with_color(mut self, color: WireColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// A complete diagram snapshot: the authoritative instance and wire store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub components: Vec<ComponentInstance>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Diagram {
    pub fn new(components: Vec<ComponentInstance>, wires: Vec<Wire>) -> Self {
        Self { components, wires }
    }

    /// Parse a diagram from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read a diagram JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LvError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the diagram as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| LvError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Find a component by id.
    pub fn component(&self, id: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.id.as_str() == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut ComponentInstance> {
        self.components.iter_mut().find(|c| c.id.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Latch, SupplyState};

    #[test]
    fn test_parse_diagram_json() {
        let input = r#"{
            "components": [
                {"id": "src", "device": {"type": "SOURCE_AC", "state": {"on": true}}},
                {"id": "mcb", "device": {"type": "MCB", "state": "CLOSED"},
                 "properties": {"label": "Lights", "rating": 10, "note": "kitchen"}}
            ],
            "wires": [
                {"id": "w1", "from": "src:L", "to": "mcb:IN", "color": "brown"}
            ]
        }"#;
        let diagram = Diagram::from_json(input).unwrap();
        assert_eq!(diagram.components.len(), 2);
        assert_eq!(diagram.components[0].device, Device::SourceAc(SupplyState::new(true)));

        let mcb = diagram.component("mcb").unwrap();
        assert_eq!(mcb.device.latch(), Some(Latch::Closed));
        assert_eq!(mcb.display_name(), "Lights");
        assert_eq!(mcb.rating(), Some(10.0));
        assert!(mcb.properties.extra.contains_key("note"));

        assert_eq!(diagram.wires[0].from.to_string(), "src:L");
        assert_eq!(diagram.wires[0].color, Some(WireColor::Brown));
    }

    #[test]
    fn test_rejects_malformed_node() {
        let input = r#"{"wires": [{"id": "w1", "from": "srcL", "to": "mcb:IN"}]}"#;
        assert!(matches!(Diagram::from_json(input), Err(LvError::InvalidJson { .. })));
    }

    #[test]
    fn test_catalog_defaults() {
        let lamp = ComponentInstance::new("lamp", Device::LampPendant);
        assert_eq!(lamp.display_name(), "lamp");
        assert_eq!(lamp.watts(), Some(100.0));
        assert_eq!(lamp.rating(), None);
    }

    #[test]
    fn test_wire_color_serialized_only_when_set() {
        let plain = serde_json::to_value(Wire::new("w", ("a", "L"), ("b", "L"))).unwrap();
        assert!(plain.get("color").is_none());

        let brown = Wire::new("w", ("a", "L"), ("b", "L")).with_color(WireColor::Brown);
        let json = serde_json::to_value(&brown).unwrap();
        assert_eq!(json["color"], "brown");
        assert_eq!(json["from"], "a:L");
        assert!(json.get("sleeving").is_none());
    }
}
