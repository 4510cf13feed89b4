//! Diagram representation and validation.
//!
//! This module provides the data model the editor produces and the engine
//! reads: component instances with their device state, and the wires between
//! their terminals. A terminal of a component is a [`NodeId`], the atomic
//! point of every graph the engine builds.

mod model;
mod types;
mod validate;

pub use model::{ComponentInstance, Diagram, Properties, Wire, WireColor};
pub use types::*;
pub use validate::{validate_diagram, DiagramIssue};
