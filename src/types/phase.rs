//! Run phase.

use serde::Serialize;

/// Whether a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  #[default]
  Idle,
  Running,
}
