//! Error types for the LV circuit simulator.
//!
//! This module provides a unified error type [`LvError`] for everything that
//! can go wrong *around* the simulation: loading diagram files, validating
//! them and applying user actions to devices. The recomputation engine itself
//! never fails; electrical faults are reported as data in
//! [`SimulationResult`](crate::engine::SimulationResult).

use thiserror::Error;

/// Result type alias using [`LvError`].
pub type Result<T> = std::result::Result<T, LvError>;

/// Unified error type for all diagram and device operations.
#[derive(Error, Debug)]
pub enum LvError {
    // ============ Diagram Loading Errors ============
    /// Malformed diagram JSON
    #[error("Invalid diagram JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// Error reading a diagram file
    #[error("Failed to read diagram file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a diagram or result file
    #[error("Failed to write '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ Diagram Validation Errors ============
    /// Two components share one id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Two wires share one id
    #[error("Duplicate wire id '{id}'")]
    DuplicateWire { id: String },

    /// Referenced component does not exist
    #[error("Component '{id}' not found in diagram")]
    ComponentNotFound { id: String },

    // ============ Device Action Errors ============
    /// The device kind has no such control
    #[error("Device '{id}' ({device_type}) does not support action '{action}'")]
    UnsupportedAction {
        id: String,
        device_type: String,
        action: String,
    },

    /// Action text could not be parsed
    #[error("Unknown device action '{action}'")]
    UnknownAction { action: String },
}

impl LvError {
    /// Create a component-not-found error
    pub fn component_not_found(id: impl Into<String>) -> Self {
        Self::ComponentNotFound { id: id.into() }
    }

    /// Create an unsupported-action error
    pub fn unsupported_action(
        id: impl Into<String>,
        device_type: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::UnsupportedAction {
            id: id.into(),
            device_type: device_type.into(),
            action: action.into(),
        }
    }
}

impl From<serde_json::Error> for LvError {
    fn from(source: serde_json::Error) -> Self {
        Self::InvalidJson { source }
    }
}
