//! Topology simulation engine.
//!
//! One recomputation cycle runs five stages over a snapshot of the diagram:
//!
//! 1. **Graph builder**: open and closed continuity graphs
//! 2. **Potential propagation**: breadth-first reach per supply role
//! 3. **Fault detector**: global shorts and per-device trip attribution
//! 4. **Protective device evaluator**: which closed latches must trip
//! 5. **Energization and flow**: fed instances and current-carrying wires
//!
//! [`simulate`] runs them all and returns a [`SimulationResult`]. Nothing
//! survives between cycles; [`Simulator`] is the caller-side owner that
//! writes trips back into the diagram.

mod evaluator;
mod faults;
mod flow;
mod graph;
mod propagate;
mod result;
mod simulate;
mod simulator;

pub use evaluator::{should_trip, tripped_devices};
pub use faults::{detect_faults, detect_shorts, guarded_search, Attribution, FaultReport, ShortCircuits, TripCause};
pub use flow::{active_nodes, energized_instances, resolve_flows, ActiveNodes, WireFlow};
pub use graph::{build_closed_graph, build_open_graph, with_load_bridges, Adjacency};
pub use propagate::{explore, Potentials, Reach};
pub use result::{Fault, SimulationResult};
pub use simulate::{simulate, simulate_diagram};
pub use simulator::{Simulator, SimulatorConfig, DEFAULT_MAX_SETTLE_CYCLES};
