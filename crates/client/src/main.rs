//! Survival agent binary.
//!
//! Composition root that assembles:
//! 1. Agent configuration (TOML file, then `AGENT_*` environment overrides)
//! 2. A replay vision source and a logging input sink
//! 3. The runtime, stopped by Ctrl-C or when the replay runs out
//!
//! ```bash
//! cargo run -p agent-client -- --replay session.jsonl --config agent.toml
//! ```

mod config;
mod logging;
mod replay;
mod sink;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use runtime::{Runtime, stop_channel};

use crate::replay::ReplaySource;
use crate::sink::LoggingSink;

/// Run the survival agent's decision loop against recorded perception
#[derive(Parser, Debug)]
#[command(name = "agent")]
#[command(version, long_about = None)]
struct Args {
    /// Agent configuration file
    #[arg(long, env = "AGENT_CONFIG", default_value = "agent.toml")]
    config: PathBuf,

    /// Recorded snapshots, one JSON object per line
    #[arg(long, env = "AGENT_REPLAY")]
    replay: PathBuf,

    /// Log directory (defaults to the platform cache directory)
    #[arg(long, env = "AGENT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Session name used for the log sub-directory
    #[arg(long, env = "AGENT_SESSION_ID")]
    session: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logging::setup_logging(args.log_dir.clone(), args.session.clone())?;

    let config = config::load(&args.config)?;
    tracing::info!(
        "Starting agent at {} ticks/s (snapshot timeout {}ms)",
        config.target_ticks_per_second,
        config.snapshot_timeout_ms
    );

    // The replay stops the runner through its own handle once it is drained.
    let (replay_stop, mut replay_signal) = stop_channel();
    let source = ReplaySource::from_file(&args.replay)?.stop_when_exhausted(replay_stop);

    let runtime = Runtime::builder()
        .config(config)
        .source(source)
        .sink(LoggingSink::default())
        .build()
        .context("failed to start the agent runtime")?;
    let stop = runtime.stop_handle();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for Ctrl-C")?;
            tracing::info!("Ctrl-C received, stopping at the next tick boundary");
        }
        _ = replay_signal.stopped() => {}
    }
    stop.stop();

    let stats = runtime.wait().await?;
    tracing::info!(
        "Agent stopped: {} ticks, {} overruns, {} dropped, {:.0}% stale, {} commands ({} failed), {} node faults",
        stats.ticks,
        stats.overruns,
        stats.dropped_ticks,
        stats.stale_ratio() * 100.0,
        stats.commands_sent,
        stats.commands_failed,
        stats.node_faults
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("failed to encode stats")?
    );

    Ok(())
}
