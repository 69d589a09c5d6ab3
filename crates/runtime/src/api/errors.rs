//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, configuration and the command
//! sink so clients can bubble them up with consistent context. None of these
//! originate in the decision core, which never fails.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("decision worker command channel closed")]
    CommandChannelClosed,

    #[error("decision worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("actuation worker channel closed")]
    ActuationChannelClosed,

    #[error("runtime worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Failure delivering one command to the external sink.
///
/// Recorded in the actuation status and published as an event; never
/// propagated into the decision core.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sink responded with status {status}")]
    Status { status: u16 },

    #[error("command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("command rejected: {0}")]
    Rejected(String),
}
