//! Stages on the simulated request path.

use std::fmt;

use serde::Serialize;

/// A labeled stage in the simulated request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
  Client,
  Auth,
  Gateway,
  Cache,
  Database,
}

impl NodeId {
  /// Every node, in path order.
  pub const ALL: [NodeId; 5] = [
    NodeId::Client,
    NodeId::Auth,
    NodeId::Gateway,
    NodeId::Cache,
    NodeId::Database,
  ];

  /// Upper-case label shown on the diagram.
  pub fn label(self) -> &'static str {
    match self {
      NodeId::Client => "CLIENT",
      NodeId::Auth => "AUTH",
      NodeId::Gateway => "GATEWAY",
      NodeId::Cache => "CACHE",
      NodeId::Database => "DATABASE",
    }
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeId::Client => write!(f, "client"),
      NodeId::Auth => write!(f, "auth"),
      NodeId::Gateway => write!(f, "gateway"),
      NodeId::Cache => write!(f, "cache"),
      NodeId::Database => write!(f, "database"),
    }
  }
}
