//! Errors surfaced by run handles and snapshot sinks.
//!
//! Rejected commands (trigger or configure while a run is in flight) are not errors;
//! they return `None` / `false`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
  #[error("failed to write snapshot: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to encode snapshot: {0}")]
  Json(#[from] serde_json::Error),
  #[error("run task did not complete: {0}")]
  Join(#[from] tokio::task::JoinError),
  #[error("snapshot stream closed before the run returned to idle")]
  StreamClosed,
}
