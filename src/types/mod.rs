//! Simulation types: nodes, edges, steps, and the published [RunState] snapshot.
//!
//! Everything here is plain data; the engine owns the only mutable copy.

mod edge_id;
mod log_buffer;
mod node_id;
mod node_state;
mod phase;
mod run_state;
mod sim_config;
mod step;

pub use edge_id::EdgeId;
pub use log_buffer::{LOG_CAPACITY, LogBuffer};
pub use node_id::NodeId;
pub use node_state::NodeState;
pub use phase::Phase;
pub use run_state::RunState;
pub use sim_config::SimConfig;
pub use step::{Effect, Step};
