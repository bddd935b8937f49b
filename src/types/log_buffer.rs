//! Bounded, most-recent-first log of run messages.

use std::collections::VecDeque;

use serde::Serialize;

/// Maximum number of log lines kept; older lines drop silently.
pub const LOG_CAPACITY: usize = 6;

/// Most-recent-first log. `push` never fails; it evicts the oldest line past [LOG_CAPACITY].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LogBuffer {
  lines: VecDeque<String>,
}

impl LogBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, line: impl Into<String>) {
    self.lines.push_front(line.into());
    self.lines.truncate(LOG_CAPACITY);
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  /// The most recently pushed line.
  pub fn latest(&self) -> Option<&str> {
    self.lines.front().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.lines.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn to_vec(&self) -> Vec<String> {
    self.lines.iter().cloned().collect()
  }
}
