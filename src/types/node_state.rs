//! Per-node highlight state.

use std::fmt;

use serde::Serialize;

/// Highlight state of one node during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
  #[default]
  Idle,
  Active,
  Success,
  /// Only reached by the client at the end of a failure run.
  Fail,
}

impl NodeState {
  /// True once a node has settled for the current run.
  pub fn is_terminal(self) -> bool {
    matches!(self, NodeState::Success | NodeState::Fail)
  }
}

impl fmt::Display for NodeState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeState::Idle => write!(f, "idle"),
      NodeState::Active => write!(f, "active"),
      NodeState::Success => write!(f, "success"),
      NodeState::Fail => write!(f, "fail"),
    }
  }
}
