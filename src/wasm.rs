//! WASM bindings for LV Circuit Core.
//!
//! This module provides JavaScript-friendly bindings for the diagram editor.
//! Diagrams and results cross the boundary as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmLvSim } from 'lv_circuit_core';
//!
//! await init();
//!
//! const sim = new WasmLvSim(JSON.stringify(diagram));
//! sim.apply('mcb-1', 'toggle');
//! const result = JSON.parse(sim.settle());
//! const lit = result.energized.includes('lamp-1');
//! ```

use wasm_bindgen::prelude::*;

use crate::devices::DeviceAction;
use crate::diagram::{validate_diagram, Diagram};
use crate::engine::{simulate_diagram, SimulationResult, Simulator, SimulatorConfig};
use crate::error::LvError;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: LvError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn result_json(result: &SimulationResult) -> Result<String, JsValue> {
    serde_json::to_string(result).map_err(|e| to_js(e.into()))
}

/// WASM-compatible diagram simulator.
///
/// Wraps the native [`Simulator`], which owns the diagram and latches trips.
#[wasm_bindgen]
pub struct WasmLvSim {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmLvSim {
    /// Create a simulator from diagram JSON.
    ///
    /// Fails on malformed JSON or duplicate ids. Dangling wires are accepted.
    #[wasm_bindgen(constructor)]
    pub fn new(diagram_json: &str) -> Result<WasmLvSim, JsValue> {
        Self::with_config(diagram_json, crate::engine::DEFAULT_MAX_SETTLE_CYCLES)
    }

    /// Create a simulator with a custom settle cycle cap.
    #[wasm_bindgen]
    pub fn with_config(diagram_json: &str, max_settle_cycles: usize) -> Result<WasmLvSim, JsValue> {
        let diagram = Diagram::from_json(diagram_json).map_err(to_js)?;
        validate_diagram(&diagram).map_err(to_js)?;

        let config = SimulatorConfig::new().with_max_settle_cycles(max_settle_cycles);
        Ok(WasmLvSim {
            simulator: Simulator::with_config(diagram, config),
        })
    }

    /// Pure recomputation; latches nothing. Returns result JSON.
    #[wasm_bindgen]
    pub fn simulate(&self) -> Result<String, JsValue> {
        result_json(&simulate_diagram(self.simulator.diagram()))
    }

    /// One cycle with trips latched. Returns result JSON.
    #[wasm_bindgen]
    pub fn recompute(&mut self) -> Result<String, JsValue> {
        let result = self.simulator.recompute();
        result_json(&result)
    }

    /// Recompute until nothing new trips. Returns result JSON.
    #[wasm_bindgen]
    pub fn settle(&mut self) -> Result<String, JsValue> {
        let result = self.simulator.settle();
        result_json(&result)
    }

    /// Apply a device action such as `"toggle"`, `"reset"`, `"test"`,
    /// `"socket"` or `"gang2"`.
    #[wasm_bindgen]
    pub fn apply(&mut self, id: &str, action: &str) -> Result<(), JsValue> {
        let action: DeviceAction = action.parse().map_err(to_js)?;
        self.simulator.apply(id, action).map_err(to_js)
    }

    /// Replace the whole diagram, keeping the configuration.
    #[wasm_bindgen]
    pub fn load(&mut self, diagram_json: &str) -> Result<(), JsValue> {
        let diagram = Diagram::from_json(diagram_json).map_err(to_js)?;
        validate_diagram(&diagram).map_err(to_js)?;
        *self.simulator.diagram_mut() = diagram;
        Ok(())
    }

    /// Current diagram, including latched trips, as JSON.
    #[wasm_bindgen]
    pub fn diagram_json(&self) -> Result<String, JsValue> {
        self.simulator.diagram().to_json().map_err(to_js)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
