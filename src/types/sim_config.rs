//! Layer toggles for a run.

use serde::Serialize;

/// The two feature flags a viewer can toggle. Snapshotted at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SimConfig {
  pub auth_enabled: bool,
  pub cache_enabled: bool,
}

impl SimConfig {
  pub fn new(auth_enabled: bool, cache_enabled: bool) -> Self {
    Self {
      auth_enabled,
      cache_enabled,
    }
  }
}
