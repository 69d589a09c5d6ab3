//! Command-line arguments.
use std::path::PathBuf;

use agent_content::{ConfigLoader, RosterLoader, default_roster};
use agent_core::{CombatConfig, Skill};
use anyhow::Result;
use clap::Parser;
use runtime::{ActuationConfig, ActuationConfigPatch};

/// Combat decision agent fed by perception frames on stdin
#[derive(Debug, Parser)]
#[command(name = "combat-agent")]
#[command(about = "Combat decision agent fed by perception frames on stdin", long_about = None)]
#[command(version)]
pub struct Args {
    /// Combat configuration (TOML, merged over defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skill roster (TOML `[[skill]]` tables); built-in preset if omitted
    #[arg(long, value_name = "FILE")]
    pub roster: Option<PathBuf>,

    /// Command sink URL, overrides ACTUATION_ENDPOINT
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Send commands to the sink instead of only logging them
    #[arg(long)]
    pub enable_actuation: bool,

    /// Session identifier used for the log directory
    #[arg(long)]
    pub session_id: Option<String>,

    /// Base directory for session logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    pub fn combat_config(&self) -> Result<CombatConfig> {
        match &self.config {
            Some(path) => ConfigLoader::load(path),
            None => Ok(CombatConfig::default()),
        }
    }

    pub fn roster(&self) -> Result<Vec<Skill>> {
        match &self.roster {
            Some(path) => RosterLoader::load(path),
            None => Ok(default_roster()),
        }
    }

    /// Applies the command-line overrides on top of `base`.
    pub fn actuation(&self, base: ActuationConfig) -> ActuationConfig {
        ActuationConfigPatch {
            endpoint: self.endpoint.clone(),
            enabled: self.enable_actuation.then_some(true),
            log_commands: None,
        }
        .applied_to(&base)
    }
}
