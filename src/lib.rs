//! # request-flow-sim
//!
//! Timed simulation of a web request travelling client → [auth] → gateway → (cache | database)
//! and back, published as a stream of [RunState] snapshots for a renderer to draw.
//!
//! ## Architecture
//!
//! - [script]: the request path as an ordered list of steps, built from a config snapshot.
//! - [engine]: owns the single [RunState], rejects overlapping runs, paces steps on the tokio
//!   clock and publishes one snapshot per step.
//! - [topology] and [render]: read-only presentation helpers (links, visibility, text/JSON frames).
//! - [trace]: records one run's snapshots with timing.

pub mod engine;
#[cfg(test)]
mod engine_test;
pub mod error;
pub mod render;
pub mod script;
pub mod topology;
pub mod trace;
pub mod types;

pub use engine::{RunHandle, SimulationEngine, SnapshotStream};
pub use error::SimError;
pub use render::{JsonSink, SnapshotSink, TextSink, drive, render_frame};
pub use script::{RunOutcome, build_script};
pub use trace::{RunTrace, record_run};
pub use types::{EdgeId, NodeId, NodeState, Phase, RunState, SimConfig};
