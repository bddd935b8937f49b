//! CLI: replay one simulated request and render every snapshot to stdout.
//!
//! Usage: `run_sim [--auth] [--cache] [--fail] [--json]`
//!
//! Set RUST_LOG=request_flow_sim=debug to log each applied step (logs go to stderr).

use std::env;
use std::io;
use std::process;

use clap::Parser;
use request_flow_sim::{
  JsonSink, NodeId, NodeState, SimulationEngine, SnapshotSink, TextSink, drive,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Replay one simulated request through client, auth, gateway, cache and database.
#[derive(Parser, Debug)]
#[command(name = "run_sim")]
#[command(after_help = r#"Environment variables (override the matching flag when set to 1/true/0/false):
  SIM_AUTH    Route the request through the auth layer.
  SIM_CACHE   Serve the request from the cache instead of the database.

Examples:
  run_sim --auth --cache
  run_sim --fail --json"#)]
struct Args {
  /// Route the request through the auth layer. Overridden by SIM_AUTH if set.
  #[arg(long)]
  auth: bool,

  /// Answer from the cache instead of the database. Overridden by SIM_CACHE if set.
  #[arg(long)]
  cache: bool,

  /// End the run with a simulated upstream timeout instead of 200 OK.
  #[arg(long)]
  fail: bool,

  /// Emit one JSON snapshot per line instead of text frames.
  #[arg(long)]
  json: bool,
}

fn env_flag(name: &str) -> Option<bool> {
  let value = env::var(name).ok()?;
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" => Some(false),
    _ => None,
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  let auth = env_flag("SIM_AUTH").unwrap_or(args.auth);
  let cache = env_flag("SIM_CACHE").unwrap_or(args.cache);
  info!(auth, cache, fail = args.fail, json = args.json, "options (env or flags)");

  let engine = SimulationEngine::new();
  engine.configure(auth, cache);
  let snapshots = engine.subscribe();
  let started = if args.fail {
    engine.trigger_failure()
  } else {
    engine.trigger()
  };
  let Some(handle) = started else {
    eprintln!("A run is already in progress");
    process::exit(1);
  };

  if !args.json {
    println!(
      "Replaying request (auth={}, cache={}): about {:.1}s",
      auth,
      cache,
      handle.expected_ms() as f64 / 1000.0
    );
  }

  let mut sink: Box<dyn SnapshotSink> = if args.json {
    Box::new(JsonSink::new(io::stdout()))
  } else {
    Box::new(TextSink::new(io::stdout()))
  };
  if let Err(e) = drive(snapshots, sink.as_mut()).await {
    error!(%e, "rendering failed");
    eprintln!("Render error: {}", e);
    process::exit(1);
  }

  let final_state = match handle.finished().await {
    Ok(s) => s,
    Err(e) => {
      eprintln!("Run error: {}", e);
      process::exit(1);
    }
  };

  let client = final_state.status(NodeId::Client);
  if !args.json {
    println!("Run finished: client={}", client);
  }
  if client != NodeState::Success {
    process::exit(1);
  }
}
