//! Diagram topology: which links and nodes a renderer draws for a given config.

use serde::Serialize;

use crate::types::{EdgeId, NodeId, RunState, SimConfig};

/// An undirected connection on the diagram. Both directions of a hop light the same link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
  ClientGateway,
  ClientAuth,
  AuthGateway,
  GatewayCache,
  GatewayDatabase,
}

impl Link {
  pub fn endpoints(self) -> (NodeId, NodeId) {
    match self {
      Link::ClientGateway => (NodeId::Client, NodeId::Gateway),
      Link::ClientAuth => (NodeId::Client, NodeId::Auth),
      Link::AuthGateway => (NodeId::Auth, NodeId::Gateway),
      Link::GatewayCache => (NodeId::Gateway, NodeId::Cache),
      Link::GatewayDatabase => (NodeId::Gateway, NodeId::Database),
    }
  }
}

impl EdgeId {
  /// The diagram link this edge travels along, if the pair is connected at all.
  pub fn link(self) -> Option<Link> {
    use NodeId::*;
    match (self.from, self.to) {
      (Client, Gateway) | (Gateway, Client) => Some(Link::ClientGateway),
      (Client, Auth) | (Auth, Client) => Some(Link::ClientAuth),
      (Auth, Gateway) | (Gateway, Auth) => Some(Link::AuthGateway),
      (Gateway, Cache) | (Cache, Gateway) => Some(Link::GatewayCache),
      (Gateway, Database) | (Database, Gateway) => Some(Link::GatewayDatabase),
      _ => None,
    }
  }
}

/// How a renderer should treat a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
  Shown,
  Dimmed,
  Hidden,
}

/// Auth disappears when disabled; the cache stays on the diagram but dimmed.
pub fn node_visibility(node: NodeId, config: SimConfig) -> Visibility {
  match node {
    NodeId::Auth if !config.auth_enabled => Visibility::Hidden,
    NodeId::Cache if !config.cache_enabled => Visibility::Dimmed,
    _ => Visibility::Shown,
  }
}

/// Links drawn for `config`. The direct client-gateway link is replaced by the auth hop.
pub fn visible_links(config: SimConfig) -> Vec<Link> {
  let mut links = if config.auth_enabled {
    vec![Link::ClientAuth, Link::AuthGateway]
  } else {
    vec![Link::ClientGateway]
  };
  links.extend([Link::GatewayCache, Link::GatewayDatabase]);
  links
}

/// The link currently carrying the packet.
pub fn lit_link(state: &RunState) -> Option<Link> {
  state.active_edge.and_then(EdgeId::link)
}
