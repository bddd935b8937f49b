//! Scripting units executed by the engine.

use serde::Serialize;

use super::{EdgeId, NodeId, NodeState};

/// One state mutation applied by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
  /// Push a line to the front of the log.
  Log(String),
  SetNode(NodeId, NodeState),
  /// Light an edge, or clear it with `None`.
  SetEdge(Option<EdgeId>),
  /// Clear the active edge and return to `Phase::Idle`.
  Finish,
}

/// Effects applied together, published as one snapshot, then held for `hold_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
  pub effects: Vec<Effect>,
  pub hold_ms: u64,
}

impl Step {
  pub fn new(effects: Vec<Effect>, hold_ms: u64) -> Self {
    Self { effects, hold_ms }
  }

  pub fn is_final(&self) -> bool {
    self.effects.iter().any(|e| matches!(e, Effect::Finish))
  }
}
