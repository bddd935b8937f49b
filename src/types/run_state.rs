//! Observable state of the simulation, published as immutable snapshots.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{instrument, trace};

use super::{EdgeId, Effect, LogBuffer, NodeId, NodeState, Phase, SimConfig};

/// Point-in-time copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunState {
  pub phase: Phase,
  pub active_edge: Option<EdgeId>,
  /// Always holds an entry for every [NodeId].
  pub node_status: BTreeMap<NodeId, NodeState>,
  pub log: LogBuffer,
  /// Stored configuration while idle; the trigger-time snapshot while running.
  pub config: SimConfig,
}

impl Default for RunState {
  fn default() -> Self {
    Self {
      phase: Phase::Idle,
      active_edge: None,
      node_status: NodeId::ALL
        .into_iter()
        .map(|n| (n, NodeState::Idle))
        .collect(),
      log: LogBuffer::new(),
      config: SimConfig::default(),
    }
  }
}

impl RunState {
  pub fn status(&self, node: NodeId) -> NodeState {
    self.node_status.get(&node).copied().unwrap_or_default()
  }

  pub fn is_running(&self) -> bool {
    self.phase == Phase::Running
  }

  /// Resets for a new run: log cleared, every node idle except the client, which goes active.
  #[instrument(level = "trace", skip(self))]
  pub fn reset_for_run(&mut self, config: SimConfig) {
    self.phase = Phase::Running;
    self.active_edge = None;
    self.log.clear();
    self.config = config;
    for (node, status) in self.node_status.iter_mut() {
      *status = if *node == NodeId::Client {
        NodeState::Active
      } else {
        NodeState::Idle
      };
    }
  }

  /// Applies one effect. Nodes that already settled this run ignore further status changes.
  pub fn apply(&mut self, effect: &Effect) {
    match effect {
      Effect::Log(line) => self.log.push(line.clone()),
      Effect::SetNode(node, next) => {
        let current = self.status(*node);
        if current.is_terminal() {
          trace!(%node, %current, %next, "ignoring status change on settled node");
          return;
        }
        self.node_status.insert(*node, *next);
      }
      Effect::SetEdge(edge) => self.active_edge = *edge,
      Effect::Finish => {
        self.active_edge = None;
        self.phase = Phase::Idle;
      }
    }
  }
}
