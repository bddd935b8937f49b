//! Tests for `SimulationEngine`.

use std::time::Duration;

use futures::StreamExt;

use crate::engine::{SimulationEngine, SnapshotStream};
use crate::script::{
  CACHE_HIT, FETCHING_FROM_SHARD, GATEWAY_ROUTING, PACKET_DEPLOYED, REQUEST_COMPLETE,
  REQUEST_FAILED, RunOutcome, VERIFYING_IDENTITY, build_script,
};
use crate::types::{EdgeId, NodeId, NodeState, Phase, RunState, SimConfig};

/// Reads snapshots until the run returns to idle.
async fn collect_run(stream: &mut SnapshotStream) -> Vec<RunState> {
  let mut frames = Vec::new();
  while let Some(snapshot) = stream.next().await {
    let done = snapshot.phase == Phase::Idle;
    frames.push(snapshot);
    if done {
      break;
    }
  }
  frames
}

#[tokio::test(start_paused = true)]
async fn every_config_terminates_idle_with_client_success() {
  for (auth, cache) in [(false, false), (true, false), (false, true), (true, true)] {
    let engine = SimulationEngine::new();
    assert!(engine.configure(auth, cache));
    let final_state = engine.trigger().unwrap().finished().await.unwrap();
    assert_eq!(final_state.phase, Phase::Idle);
    assert!(final_state.active_edge.is_none());
    assert_eq!(final_state.status(NodeId::Client), NodeState::Success);
    assert_eq!(engine.state(), final_state);
  }
}

#[tokio::test(start_paused = true)]
async fn trigger_while_running_changes_nothing() {
  let engine = SimulationEngine::new();
  let handle = engine.trigger().unwrap();
  tokio::time::sleep(Duration::from_millis(1200)).await;
  let before = engine.state();
  assert!(before.is_running());
  assert!(engine.trigger().is_none());
  assert!(engine.trigger_failure().is_none());
  assert_eq!(engine.state(), before);
  handle.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn rapid_double_trigger_produces_one_run() {
  let engine = SimulationEngine::new();
  let mut stream = engine.subscribe();
  let first = engine.trigger();
  let second = engine.trigger();
  assert!(first.is_some());
  assert!(second.is_none());
  first.unwrap().finished().await.unwrap();

  let frames = collect_run(&mut stream).await;
  let steps = build_script(SimConfig::default(), RunOutcome::Complete);
  // One reset snapshot plus one per step.
  assert_eq!(frames.len(), steps.len() + 1);
  let resets = frames
    .iter()
    .filter(|f| f.is_running() && f.log.is_empty())
    .count();
  assert_eq!(resets, 1);
}

#[tokio::test(start_paused = true)]
async fn configure_rejected_mid_run_and_accepted_after() {
  let engine = SimulationEngine::new();
  assert!(engine.configure(false, false));
  let handle = engine.trigger().unwrap();
  assert!(!engine.configure(true, true));
  assert_eq!(engine.state().config, SimConfig::new(false, false));
  let final_state = handle.finished().await.unwrap();
  assert_eq!(final_state.status(NodeId::Auth), NodeState::Idle);
  assert!(engine.configure(true, true));
  assert_eq!(engine.state().config, SimConfig::new(true, true));
}

#[tokio::test(start_paused = true)]
async fn plain_run_logs_most_recent_first() {
  let engine = SimulationEngine::new();
  let mut stream = engine.subscribe();
  engine.trigger().unwrap().finished().await.unwrap();
  let frames = collect_run(&mut stream).await;

  let last = frames.last().unwrap();
  assert_eq!(
    last.log.to_vec(),
    vec![
      REQUEST_COMPLETE,
      FETCHING_FROM_SHARD,
      GATEWAY_ROUTING,
      PACKET_DEPLOYED
    ]
  );

  let db_active = frames
    .iter()
    .position(|f| f.status(NodeId::Database) == NodeState::Active)
    .unwrap();
  let client_done = frames
    .iter()
    .position(|f| f.status(NodeId::Client) == NodeState::Success)
    .unwrap();
  assert!(db_active < client_done);
  assert_eq!(client_done, frames.len() - 1);
}

#[tokio::test(start_paused = true)]
async fn auth_cache_run_never_touches_database() {
  let engine = SimulationEngine::new();
  engine.configure(true, true);
  let mut stream = engine.subscribe();
  engine.trigger().unwrap().finished().await.unwrap();
  let frames = collect_run(&mut stream).await;

  assert!(
    frames
      .iter()
      .all(|f| f.status(NodeId::Database) == NodeState::Idle)
  );
  let log = frames.last().unwrap().log.to_vec();
  assert!(log.iter().any(|l| l == VERIFYING_IDENTITY));
  assert!(log.iter().any(|l| l == CACHE_HIT));
  let edges: Vec<_> = frames.iter().filter_map(|f| f.active_edge).collect();
  assert!(edges.contains(&EdgeId::CLIENT_AUTH));
  assert!(!edges.contains(&EdgeId::CLIENT_GATEWAY));
}

#[tokio::test(start_paused = true)]
async fn settled_nodes_stay_settled() {
  let engine = SimulationEngine::new();
  engine.configure(true, false);
  let mut stream = engine.subscribe();
  engine.trigger().unwrap().finished().await.unwrap();
  let frames = collect_run(&mut stream).await;

  for node in NodeId::ALL {
    let mut settled = false;
    for f in &frames {
      let s = f.status(node);
      if settled {
        assert!(s.is_terminal(), "{node} left its settled state");
      }
      settled |= s.is_terminal();
    }
  }
}

#[tokio::test(start_paused = true)]
async fn run_takes_the_scripted_time() {
  let engine = SimulationEngine::new();
  let start = tokio::time::Instant::now();
  engine.trigger().unwrap().finished().await.unwrap();
  let elapsed = start.elapsed();
  assert!(elapsed >= Duration::from_millis(5700));
  assert!(elapsed < Duration::from_millis(5800));
}

#[tokio::test(start_paused = true)]
async fn second_run_starts_fresh() {
  let engine = SimulationEngine::new();
  engine.trigger().unwrap().finished().await.unwrap();
  engine.configure(false, true);
  let handle = engine.trigger().unwrap();
  let reset = engine.state();
  assert!(reset.is_running());
  assert!(reset.log.is_empty() || reset.log.latest() == Some(PACKET_DEPLOYED));
  assert_eq!(reset.status(NodeId::Client), NodeState::Active);
  let final_state = handle.finished().await.unwrap();
  assert_eq!(final_state.log.len(), 4);
  assert_eq!(final_state.status(NodeId::Database), NodeState::Idle);
  assert_eq!(final_state.status(NodeId::Cache), NodeState::Active);
}

#[tokio::test(start_paused = true)]
async fn failure_run_ends_with_client_fail() {
  let engine = SimulationEngine::new();
  let final_state = engine.trigger_failure().unwrap().finished().await.unwrap();
  assert_eq!(final_state.phase, Phase::Idle);
  assert!(final_state.active_edge.is_none());
  assert_eq!(final_state.status(NodeId::Client), NodeState::Fail);
  assert_eq!(final_state.log.latest(), Some(REQUEST_FAILED));
  assert!(engine.trigger().is_some());
}

#[tokio::test(start_paused = true)]
async fn configure_publishes_only_on_change() {
  let engine = SimulationEngine::new();
  let mut stream = engine.subscribe();
  assert!(engine.configure(false, false));
  assert!(engine.configure(true, false));
  let snapshot = stream.next().await.unwrap();
  assert_eq!(snapshot.config, SimConfig::new(true, false));
  assert_eq!(snapshot.phase, Phase::Idle);
}

#[test]
fn trigger_without_runtime_leaves_state_untouched() {
  let engine = SimulationEngine::new();
  let before = engine.state();
  assert!(engine.trigger().is_none());
  assert!(engine.trigger_failure().is_none());
  assert_eq!(engine.state(), before);
  assert_eq!(engine.state().phase, Phase::Idle);
  assert!(engine.configure(true, false));
}

#[test]
fn dropped_runtime_returns_engine_to_idle() {
  let engine = SimulationEngine::new();
  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_time()
    .build()
    .unwrap();
  runtime.block_on(async {
    engine.trigger().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(engine.state().is_running());
  });
  drop(runtime);

  let state = engine.state();
  assert_eq!(state.phase, Phase::Idle);
  assert!(state.active_edge.is_none());
  assert!(engine.configure(false, true));

  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_time()
    .start_paused(true)
    .build()
    .unwrap();
  let final_state = runtime
    .block_on(async { engine.trigger().unwrap().finished().await })
    .unwrap();
  assert_eq!(final_state.status(NodeId::Client), NodeState::Success);
}

#[test]
fn run_dropped_before_first_step_returns_to_idle() {
  let engine = SimulationEngine::new();
  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_time()
    .build()
    .unwrap();
  runtime.block_on(async {
    assert!(engine.trigger().is_some());
  });
  drop(runtime);
  assert_eq!(engine.state().phase, Phase::Idle);
  assert!(engine.configure(true, true));
}

#[tokio::test(start_paused = true)]
async fn handle_reports_scripted_length() {
  let engine = SimulationEngine::new();
  let handle = engine.trigger().unwrap();
  assert_eq!(handle.expected_ms(), 5700);
  handle.finished().await.unwrap();
  engine.configure(true, true);
  assert_eq!(engine.trigger().unwrap().expected_ms(), 6800);
}
