//! The request path as data: an ordered list of [Step]s built from a config snapshot.
//!
//! Path: client → [auth] → gateway → (cache | database) → gateway → client.

use tracing::instrument;

use crate::types::{EdgeId, Effect, NodeId, NodeState, SimConfig, Step};

pub const PACKET_DEPLOYED: &str = "PACKET DEPLOYED";
pub const VERIFYING_IDENTITY: &str = "VERIFYING IDENTITY";
pub const GATEWAY_ROUTING: &str = "GATEWAY ROUTING";
pub const CACHE_HIT: &str = "CACHE HIT! RETURNING";
pub const FETCHING_FROM_SHARD: &str = "FETCHING FROM SHARD 01";
pub const REQUEST_COMPLETE: &str = "REQUEST COMPLETE [200 OK]";
pub const REQUEST_FAILED: &str = "REQUEST FAILED [504 TIMEOUT]";

/// How the run ends once the response reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunOutcome {
  #[default]
  Complete,
  /// Simulated upstream timeout: the client ends in [NodeState::Fail].
  Fail,
}

fn log(line: &str) -> Effect {
  Effect::Log(line.to_string())
}

fn edge(e: EdgeId) -> Effect {
  Effect::SetEdge(Some(e))
}

fn node(n: NodeId, s: NodeState) -> Effect {
  Effect::SetNode(n, s)
}

/// Builds the step script for one run. Pure; branches only on `config` and `outcome`.
#[instrument(level = "trace")]
pub fn build_script(config: SimConfig, outcome: RunOutcome) -> Vec<Step> {
  let mut steps = Vec::with_capacity(12);

  let first_hop = if config.auth_enabled {
    EdgeId::CLIENT_AUTH
  } else {
    EdgeId::CLIENT_GATEWAY
  };
  steps.push(Step::new(
    vec![
      node(NodeId::Client, NodeState::Active),
      log(PACKET_DEPLOYED),
      edge(first_hop),
    ],
    1000,
  ));

  if config.auth_enabled {
    steps.push(Step::new(
      vec![node(NodeId::Auth, NodeState::Active), log(VERIFYING_IDENTITY)],
      800,
    ));
    steps.push(Step::new(vec![edge(EdgeId::AUTH_GATEWAY)], 1000));
  }

  steps.push(Step::new(
    vec![node(NodeId::Gateway, NodeState::Active), log(GATEWAY_ROUTING)],
    500,
  ));

  if config.cache_enabled {
    steps.push(Step::new(vec![edge(EdgeId::GATEWAY_CACHE)], 1000));
    steps.push(Step::new(
      vec![node(NodeId::Cache, NodeState::Active), log(CACHE_HIT)],
      500,
    ));
    steps.push(Step::new(vec![edge(EdgeId::CACHE_GATEWAY)], 1000));
  } else {
    steps.push(Step::new(vec![edge(EdgeId::GATEWAY_DATABASE)], 1000));
    steps.push(Step::new(
      vec![
        node(NodeId::Database, NodeState::Active),
        log(FETCHING_FROM_SHARD),
      ],
      1200,
    ));
    steps.push(Step::new(vec![edge(EdgeId::DATABASE_GATEWAY)], 1000));
  }

  steps.push(Step::new(vec![edge(EdgeId::GATEWAY_CLIENT)], 1000));
  let (client_state, last_line) = match outcome {
    RunOutcome::Complete => (NodeState::Success, REQUEST_COMPLETE),
    RunOutcome::Fail => (NodeState::Fail, REQUEST_FAILED),
  };
  steps.push(Step::new(
    vec![
      node(NodeId::Client, client_state),
      log(last_line),
      Effect::Finish,
    ],
    0,
  ));

  steps
}

/// Sum of all holds: how long one run takes on the wall clock.
pub fn total_hold_ms(steps: &[Step]) -> u64 {
  steps.iter().map(|s| s.hold_ms).sum()
}
