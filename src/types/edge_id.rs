//! Directed links between nodes.

use std::fmt;

use serde::Serialize;

use super::NodeId;

/// A directed logical link, "active" while the simulated packet traverses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeId {
  pub from: NodeId,
  pub to: NodeId,
}

impl EdgeId {
  pub const CLIENT_AUTH: EdgeId = EdgeId::new(NodeId::Client, NodeId::Auth);
  pub const CLIENT_GATEWAY: EdgeId = EdgeId::new(NodeId::Client, NodeId::Gateway);
  pub const AUTH_GATEWAY: EdgeId = EdgeId::new(NodeId::Auth, NodeId::Gateway);
  pub const GATEWAY_CACHE: EdgeId = EdgeId::new(NodeId::Gateway, NodeId::Cache);
  pub const CACHE_GATEWAY: EdgeId = EdgeId::new(NodeId::Cache, NodeId::Gateway);
  pub const GATEWAY_DATABASE: EdgeId = EdgeId::new(NodeId::Gateway, NodeId::Database);
  pub const DATABASE_GATEWAY: EdgeId = EdgeId::new(NodeId::Database, NodeId::Gateway);
  pub const GATEWAY_CLIENT: EdgeId = EdgeId::new(NodeId::Gateway, NodeId::Client);

  pub const fn new(from: NodeId, to: NodeId) -> Self {
    Self { from, to }
  }
}

impl fmt::Display for EdgeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}→{}", self.from, self.to)
  }
}
