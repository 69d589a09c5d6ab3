//! Logging to stderr and a per-session file.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE: &str = "agent.log";

/// Keeps the file writer alive; drop it last.
pub struct LogSession {
    pub session_id: String,
    pub directory: PathBuf,
    _guard: WorkerGuard,
}

/// Platform cache directory for logs, e.g. `~/.cache/combat-agent/logs`.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "combat-agent")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/combat-agent/logs"))
}

pub fn session_id_or_default(session_id: Option<&str>) -> String {
    match session_id {
        Some(id) if !id.trim().is_empty() => id.trim().to_owned(),
        _ => {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("session_{secs}")
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` refines the filter; `info` is always enabled.
pub fn setup_logging(session_id: Option<&str>, log_dir: Option<&Path>) -> Result<LogSession> {
    let session_id = session_id_or_default(session_id);
    let directory = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_dir)
        .join(&session_id);
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let file_appender = tracing_appender::rolling::never(&directory, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(session = %session_id, "Logging initialized");
    tracing::info!("Log file: {}", directory.join(LOG_FILE).display());

    Ok(LogSession {
        session_id,
        directory,
        _guard: guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_session_id_is_trimmed() {
        assert_eq!(session_id_or_default(Some("  run-7 ")), "run-7");
    }

    #[test]
    fn test_blank_session_id_gets_timestamp() {
        assert!(session_id_or_default(Some("  ")).starts_with("session_"));
        assert!(session_id_or_default(None).starts_with("session_"));
    }
}
