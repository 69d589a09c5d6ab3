//! Combat agent binary.
//!
//! Reads one JSON perception frame per stdin line, runs the decision core
//! over each and forwards chosen actions to the command sink. Prints a
//! session summary as JSON when the input ends.
//!
//! # Examples
//!
//! ```bash
//! # Dry run: decisions are logged, nothing is sent
//! frames | cargo run -p combat-agent -- --config crates/agent/content/data/combat.toml
//!
//! # Drive a local input server
//! frames | cargo run -p combat-agent -- --enable-actuation --endpoint http://127.0.0.1:8765/command
//! ```

use anyhow::Result;
use clap::Parser;
use combat_agent::{Args, SessionSummary, logging, run_feed};
use runtime::{ActuationConfig, AgentRuntime, RuntimeConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _logging = logging::setup_logging(args.session_id.as_deref(), args.log_dir.as_deref())?;

    let combat = args.combat_config()?;
    let roster = args.roster()?;
    let actuation = args.actuation(ActuationConfig::from_env());
    let config = RuntimeConfig::from_env();

    tracing::info!(
        skills = roster.len(),
        endpoint = %actuation.endpoint,
        actuation = actuation.enabled,
        min_tick_ms = config.min_tick_interval.as_millis() as u64,
        "Starting combat agent"
    );

    let runtime = AgentRuntime::builder()
        .config(config)
        .actuation(actuation)
        .combat_config(combat)
        .roster(roster)
        .build()
        .await?;
    let handle = runtime.handle();

    let feed = run_feed(&handle, BufReader::new(tokio::io::stdin())).await?;

    let actuation = handle.flush_actuation().await?;
    let snapshot = handle.snapshot().await?;
    drop(handle);
    runtime.shutdown().await?;

    let summary = SessionSummary {
        feed,
        stats: snapshot.stats,
        actuation,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    tracing::info!("Combat agent shutdown complete");
    Ok(())
}
