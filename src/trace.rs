//! Recorded run: every snapshot of one run with its offset from the first.

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::time::Instant;

use crate::error::SimError;
use crate::types::{RunState, SimConfig};

/// One snapshot and when it was published, relative to the run's reset.
#[derive(Debug, Clone, Serialize)]
pub struct TraceFrame {
  pub elapsed_ms: u64,
  pub state: RunState,
}

/// Every snapshot of one run, in publish order.
#[derive(Debug, Clone, Serialize)]
pub struct RunTrace {
  /// Wall-clock time the first running snapshot arrived; serialized as RFC 3339.
  pub started_at: DateTime<Utc>,
  /// Trigger-time configuration.
  pub config: SimConfig,
  pub frames: Vec<TraceFrame>,
}

impl RunTrace {
  pub fn final_state(&self) -> Option<&RunState> {
    self.frames.last().map(|f| &f.state)
  }

  /// Total run length as observed by the subscriber.
  pub fn duration_ms(&self) -> u64 {
    self.frames.last().map(|f| f.elapsed_ms).unwrap_or(0)
  }
}

/// Collects one run from a snapshot subscription. Idle snapshots before the run are skipped;
/// recording stops at the first idle snapshot after it started.
pub async fn record_run<S>(mut snapshots: S) -> Result<RunTrace, SimError>
where
  S: Stream<Item = RunState> + Unpin,
{
  let mut recording: Option<(Instant, RunTrace)> = None;
  while let Some(state) = snapshots.next().await {
    if recording.is_none() {
      if state.is_running() {
        let trace = RunTrace {
          started_at: Utc::now(),
          config: state.config,
          frames: vec![TraceFrame {
            elapsed_ms: 0,
            state,
          }],
        };
        recording = Some((Instant::now(), trace));
      }
      continue;
    }
    if let Some((began, trace)) = recording.as_mut() {
      let done = !state.is_running();
      trace.frames.push(TraceFrame {
        elapsed_ms: u64::try_from(began.elapsed().as_millis()).unwrap_or(u64::MAX),
        state,
      });
      if done {
        break;
      }
    }
  }
  match recording {
    Some((_, trace)) if trace.final_state().is_some_and(|s| !s.is_running()) => Ok(trace),
    _ => Err(SimError::StreamClosed),
  }
}
