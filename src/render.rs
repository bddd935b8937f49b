//! Presentation layer: turns snapshots into text frames or JSON lines.
//!
//! Renderers only read snapshots; commands go to the engine directly.

use std::io::Write;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tracing::{instrument, trace};

use crate::error::SimError;
use crate::topology::{Link, Visibility, lit_link, node_visibility, visible_links};
use crate::types::{NodeId, Phase, RunState};

const EMPTY_LOG: &str = "Waiting for input...";

/// Consumer of published snapshots.
#[async_trait]
pub trait SnapshotSink: Send {
  async fn render(&mut self, snapshot: &RunState) -> Result<(), SimError>;
}

fn node_cell(state: &RunState, node: NodeId) -> String {
  let status = state.status(node);
  match node_visibility(node, state.config) {
    Visibility::Shown => format!("[{}:{}]", node.label(), status),
    Visibility::Dimmed => format!("({}:{})", node.label(), status),
    Visibility::Hidden => String::new(),
  }
}

fn link_marker(lit: Option<Link>, link: Link) -> &'static str {
  if lit == Some(link) { "===" } else { "---" }
}

/// Renders one snapshot as a multi-line text frame (no trailing newline).
#[instrument(level = "trace", skip(state))]
pub fn render_frame(state: &RunState) -> String {
  let lit = lit_link(state);
  let (branches, main): (Vec<Link>, Vec<Link>) = visible_links(state.config)
    .into_iter()
    .partition(|l| *l == Link::GatewayCache);

  let mut path = main
    .first()
    .map(|l| node_cell(state, l.endpoints().0))
    .unwrap_or_default();
  for link in &main {
    let (_, to) = link.endpoints();
    path.push_str(&format!(
      " {} {}",
      link_marker(lit, *link),
      node_cell(state, to)
    ));
  }

  let mut lines = vec![path];
  lines.extend(branches.iter().map(|link| {
    let (from, to) = link.endpoints();
    format!(
      "  {} {} {}",
      from,
      link_marker(lit, *link),
      node_cell(state, to)
    )
  }));

  let phase = match state.phase {
    Phase::Idle => "idle",
    Phase::Running => "running",
  };
  let edge = state
    .active_edge
    .map(|e| e.to_string())
    .unwrap_or_else(|| "-".to_string());

  lines.push(format!("phase={phase} edge={edge}"));
  if state.log.is_empty() {
    lines.push(EMPTY_LOG.to_string());
  } else {
    lines.extend(state.log.iter().map(|l| format!("> {l}")));
  }
  lines.join("\n")
}

/// Writes a text frame per snapshot, separated by a blank line.
pub struct TextSink<W> {
  out: W,
}

impl<W: Write + Send> TextSink<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}

#[async_trait]
impl<W: Write + Send> SnapshotSink for TextSink<W> {
  async fn render(&mut self, snapshot: &RunState) -> Result<(), SimError> {
    writeln!(self.out, "{}\n", render_frame(snapshot))?;
    self.out.flush()?;
    Ok(())
  }
}

/// Writes one JSON object per snapshot per line.
pub struct JsonSink<W> {
  out: W,
}

impl<W: Write + Send> JsonSink<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}

#[async_trait]
impl<W: Write + Send> SnapshotSink for JsonSink<W> {
  async fn render(&mut self, snapshot: &RunState) -> Result<(), SimError> {
    serde_json::to_writer(&mut self.out, snapshot)?;
    writeln!(self.out)?;
    self.out.flush()?;
    Ok(())
  }
}

/// Renders snapshots until a run that was seen running returns to idle; yields that final
/// snapshot. Idle snapshots published before the run starts (config changes) are rendered too.
pub async fn drive<S, K>(mut snapshots: S, sink: &mut K) -> Result<RunState, SimError>
where
  S: Stream<Item = RunState> + Unpin,
  K: SnapshotSink + ?Sized,
{
  let mut seen_running = false;
  while let Some(snapshot) = snapshots.next().await {
    sink.render(&snapshot).await?;
    trace!(phase = ?snapshot.phase, "snapshot rendered");
    if snapshot.is_running() {
      seen_running = true;
    } else if seen_running {
      return Ok(snapshot);
    }
  }
  Err(SimError::StreamClosed)
}
