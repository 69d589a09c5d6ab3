//! Pumps JSON-line perception frames into the runtime.
use agent_core::{CombatStats, PerceptionFrame};
use anyhow::Result;
use runtime::{ActuationStatus, AgentHandle, TickOutcome};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Per-line counters for one input stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub lines: u64,
    pub evaluated: u64,
    pub throttled: u64,
    /// Lines that did not parse as a frame.
    pub malformed: u64,
}

/// Printed on stdout when the input ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub feed: FeedSummary,
    pub stats: CombatStats,
    pub actuation: ActuationStatus,
}

/// Reads one [`PerceptionFrame`] per line until EOF and submits each.
///
/// Blank lines are ignored and malformed lines are logged and skipped. Only
/// runtime failures end the feed early.
pub async fn run_feed<R>(handle: &AgentHandle, reader: R) -> Result<FeedSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = FeedSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        summary.lines += 1;

        let frame: PerceptionFrame = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(line = summary.lines, %error, "skipping malformed frame");
                summary.malformed += 1;
                continue;
            }
        };

        match handle.submit_frame(frame).await? {
            TickOutcome::Evaluated(report) => {
                summary.evaluated += 1;
                let decision = &report.decision;
                if decision.state_changed() {
                    info!(
                        from = %decision.previous_state,
                        to = %decision.state,
                        reason = %decision.reason,
                        "decision"
                    );
                } else {
                    debug!(
                        state = %decision.state,
                        reason = %decision.reason,
                        action = decision.action.as_ref().map(|a| a.label()),
                        "decision"
                    );
                }
            }
            TickOutcome::Throttled { since_last_ms } => {
                summary.throttled += 1;
                debug!(line = summary.lines, since_last_ms, "frame throttled");
            }
        }
    }

    Ok(summary)
}
