//! End-to-end scenarios through the public API: configure, trigger, subscribe, render.

use futures::StreamExt;
use request_flow_sim::render::TextSink;
use request_flow_sim::script::{
  CACHE_HIT, FETCHING_FROM_SHARD, GATEWAY_ROUTING, PACKET_DEPLOYED, REQUEST_COMPLETE,
  VERIFYING_IDENTITY,
};
use request_flow_sim::types::LOG_CAPACITY;
use request_flow_sim::{NodeId, NodeState, Phase, RunState, SimulationEngine, drive, record_run};

#[tokio::test(start_paused = true)]
async fn scenario_a_plain_request_hits_database() {
  let engine = SimulationEngine::new();
  engine.configure(false, false);
  let stream = engine.subscribe();
  engine.trigger().unwrap();
  let trace = record_run(stream).await.unwrap();

  let last = trace.final_state().unwrap();
  assert_eq!(
    last.log.to_vec(),
    vec![
      REQUEST_COMPLETE,
      FETCHING_FROM_SHARD,
      GATEWAY_ROUTING,
      PACKET_DEPLOYED
    ]
  );
  assert!(
    trace
      .frames
      .iter()
      .any(|f| f.state.status(NodeId::Database) == NodeState::Active)
  );
  assert_eq!(last.status(NodeId::Client), NodeState::Success);
}

#[tokio::test(start_paused = true)]
async fn scenario_b_auth_and_cache_skip_database() {
  let engine = SimulationEngine::new();
  engine.configure(true, true);
  let stream = engine.subscribe();
  engine.trigger().unwrap();
  let trace = record_run(stream).await.unwrap();

  assert!(
    trace
      .frames
      .iter()
      .all(|f| f.state.status(NodeId::Database) == NodeState::Idle)
  );
  let log = trace.final_state().unwrap().log.to_vec();
  assert!(log.contains(&VERIFYING_IDENTITY.to_string()));
  assert!(log.contains(&CACHE_HIT.to_string()));
  assert!(log.len() <= LOG_CAPACITY);
}

#[tokio::test(start_paused = true)]
async fn scenario_c_second_trigger_is_invisible() {
  let engine = SimulationEngine::new();
  let mut stream = engine.subscribe();
  let first = engine.trigger().unwrap();
  let before = engine.state();
  assert!(engine.trigger().is_none());
  assert_eq!(engine.state(), before);
  first.finished().await.unwrap();

  let mut frames: Vec<RunState> = Vec::new();
  while let Some(s) = stream.next().await {
    let idle = s.phase == Phase::Idle;
    frames.push(s);
    if idle {
      break;
    }
  }
  let deployed = frames
    .iter()
    .filter(|f| f.log.latest() == Some(PACKET_DEPLOYED))
    .count();
  assert_eq!(deployed, 1);

  // Accepted again once idle.
  assert!(engine.trigger().is_some());
}

#[tokio::test(start_paused = true)]
async fn text_rendering_follows_the_run() {
  let engine = SimulationEngine::new();
  engine.configure(true, false);
  let stream = engine.subscribe();
  engine.trigger().unwrap();
  let mut sink = TextSink::new(Vec::new());
  let last = drive(stream, &mut sink).await.unwrap();
  assert_eq!(last.status(NodeId::Client), NodeState::Success);

  let out = String::from_utf8(sink.into_inner()).unwrap();
  assert!(out.contains("[AUTH:active]"));
  assert!(out.contains("edge=auth→gateway"));
  assert!(out.contains("> REQUEST COMPLETE [200 OK]"));
  assert!(out.contains("(CACHE:idle)"));
}
