//! Event types for different topics.

use agent_core::{AgentAction, CombatState, DecisionReason, DetectionId};
use serde::{Deserialize, Serialize};

use crate::api::SinkCommand;

/// Events produced by the decision worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecisionEvent {
    /// The combat state differs from the previous tick's.
    StateChanged {
        timestamp_ms: u64,
        from: CombatState,
        to: CombatState,
        reason: DecisionReason,
    },

    /// A non-wait action was chosen and handed to actuation.
    ActionIssued {
        timestamp_ms: u64,
        state: CombatState,
        action: AgentAction,
        target: Option<DetectionId>,
    },

    /// Enemies vanished since the previous tick (approximate kills).
    KillRecorded {
        timestamp_ms: u64,
        count: usize,
        total: u64,
    },
}

/// Events produced at the actuation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActuationEvent {
    /// A command could not be delivered.
    CommandFailed {
        command: SinkCommand,
        error: String,
    },

    /// A command succeeded after one or more failures.
    ConnectivityRestored { endpoint: String },
}
