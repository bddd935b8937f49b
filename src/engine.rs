//! Simulation engine: owns the run state, guards against concurrent runs, and paces the
//! step script on the tokio clock.
//!
//! - [SimulationEngine::trigger]: start a run from the stored config (no-op while running).
//! - [SimulationEngine::subscribe]: every snapshot published after the call, in order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, info, instrument, warn};

use crate::error::SimError;
use crate::script::{RunOutcome, build_script, total_hold_ms};
use crate::types::{Effect, NodeId, RunState, SimConfig, Step};

/// Snapshots buffered per subscriber. A run publishes at most a dozen.
const SNAPSHOT_BUFFER: usize = 64;

/// Ordered snapshots from [SimulationEngine::subscribe].
pub type SnapshotStream = BoxStream<'static, RunState>;

struct Shared {
  state: Mutex<RunState>,
  snapshots: broadcast::Sender<RunState>,
}

impl Shared {
  fn lock(&self) -> MutexGuard<'_, RunState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Must be called with the state lock held so publish order matches mutation order.
  fn publish(&self, state: &RunState) {
    // No subscribers is fine; the snapshot is still readable through `state()`.
    let _ = self.snapshots.send(state.clone());
  }
}

/// Drives one simulated request at a time. Clones share the same state.
#[derive(Clone)]
pub struct SimulationEngine {
  shared: Arc<Shared>,
}

impl Default for SimulationEngine {
  fn default() -> Self {
    Self::new()
  }
}

impl SimulationEngine {
  pub fn new() -> Self {
    let (snapshots, _) = broadcast::channel(SNAPSHOT_BUFFER);
    Self {
      shared: Arc::new(Shared {
        state: Mutex::new(RunState::default()),
        snapshots,
      }),
    }
  }

  /// Current snapshot. No side effects.
  pub fn state(&self) -> RunState {
    self.shared.lock().clone()
  }

  pub fn subscribe(&self) -> SnapshotStream {
    BroadcastStream::new(self.shared.snapshots.subscribe())
      .filter_map(|item| async move {
        match item {
          Ok(snapshot) => Some(snapshot),
          Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "subscriber lagged; snapshots dropped");
            None
          }
        }
      })
      .boxed()
  }

  /// Stores new layer toggles. Returns `false` and changes nothing while a run is in flight.
  #[instrument(level = "debug", skip(self))]
  pub fn configure(&self, auth_enabled: bool, cache_enabled: bool) -> bool {
    let mut state = self.shared.lock();
    if state.is_running() {
      debug!("configure ignored: run in progress");
      return false;
    }
    let config = SimConfig::new(auth_enabled, cache_enabled);
    // Unchanged toggles publish nothing.
    if state.config != config {
      state.config = config;
      self.shared.publish(&state);
    }
    true
  }

  /// Starts a run that ends with `REQUEST COMPLETE`. `None` if a run is already in flight or
  /// there is no tokio runtime to pace it on; the state is left untouched in both cases.
  pub fn trigger(&self) -> Option<RunHandle> {
    self.start(RunOutcome::Complete)
  }

  /// Starts a run whose response never makes it back: the client ends in `Fail`.
  pub fn trigger_failure(&self) -> Option<RunHandle> {
    self.start(RunOutcome::Fail)
  }

  fn start(&self, outcome: RunOutcome) -> Option<RunHandle> {
    let Ok(runtime) = Handle::try_current() else {
      warn!(?outcome, "trigger ignored: no tokio runtime");
      return None;
    };
    let (config, steps) = {
      let mut state = self.shared.lock();
      if state.is_running() {
        debug!(?outcome, "trigger ignored: run in progress");
        return None;
      }
      let config = state.config;
      state.reset_for_run(config);
      self.shared.publish(&state);
      (config, build_script(config, outcome))
    };
    let expected_ms = total_hold_ms(&steps);
    info!(
      auth = config.auth_enabled,
      cache = config.cache_enabled,
      ?outcome,
      steps = steps.len(),
      expected_ms,
      "run started"
    );
    let guard = FinishOnDrop {
      shared: Arc::clone(&self.shared),
      finished: false,
    };
    Some(RunHandle {
      join: runtime.spawn(run_steps(guard, steps)),
      expected_ms,
    })
  }
}

/// Returns the engine to idle if a run is dropped before its final step, polled or not.
struct FinishOnDrop {
  shared: Arc<Shared>,
  finished: bool,
}

impl Drop for FinishOnDrop {
  fn drop(&mut self) {
    if self.finished {
      return;
    }
    let mut state = self.shared.lock();
    state.apply(&Effect::Finish);
    self.shared.publish(&state);
    warn!("run dropped before its final step; engine returned to idle");
  }
}

/// Applies each step, publishes, then holds. Returns the final snapshot.
async fn run_steps(mut guard: FinishOnDrop, steps: Vec<Step>) -> RunState {
  let shared = Arc::clone(&guard.shared);
  let mut last = RunState::default();
  for (index, step) in steps.iter().enumerate() {
    last = {
      let mut state = shared.lock();
      for effect in &step.effects {
        state.apply(effect);
      }
      shared.publish(&state);
      state.clone()
    };
    guard.finished |= step.is_final();
    debug!(
      step = index + 1,
      edge = ?last.active_edge,
      latest = ?last.log.latest(),
      hold_ms = step.hold_ms,
      "step applied"
    );
    if step.hold_ms > 0 {
      tokio::time::sleep(Duration::from_millis(step.hold_ms)).await;
    }
  }
  info!(client = %last.status(NodeId::Client), "run finished");
  last
}

/// Handle to an in-flight run.
pub struct RunHandle {
  join: JoinHandle<RunState>,
  expected_ms: u64,
}

impl RunHandle {
  /// Scripted length of the run, the sum of every step's hold.
  pub fn expected_ms(&self) -> u64 {
    self.expected_ms
  }

  /// Waits for the run to return to idle and yields its final snapshot.
  pub async fn finished(self) -> Result<RunState, SimError> {
    Ok(self.join.await?)
  }
}
