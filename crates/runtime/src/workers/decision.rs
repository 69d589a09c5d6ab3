//! Decision worker that owns the authoritative [`CombatEngine`].
//!
//! Receives commands from [`AgentHandle`](crate::AgentHandle), runs one tick
//! per accepted perception frame, publishes decision events and hands chosen
//! actions to the actuation worker without waiting on delivery.

use std::time::Duration;

use agent_core::{
    AgentAction, CombatConfig, CombatConfigPatch, CombatEngine, CombatState, CombatStats,
    PerceptionFrame, Skill, TickReport, Vitals,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::actuation::{ActuationCommand, ActuationJob};
use crate::events::{DecisionEvent, Event, EventBus};

/// Result of submitting one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    Evaluated(Box<TickReport>),
    /// Dropped by the tick throttle.
    Throttled { since_last_ms: u64 },
}

impl TickOutcome {
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickOutcome::Evaluated(report) => Some(report),
            TickOutcome::Throttled { .. } => None,
        }
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, TickOutcome::Throttled { .. })
    }
}

/// Read-only view of the engine between ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub state: CombatState,
    pub stats: CombatStats,
    pub vitals: Vitals,
    pub config: CombatConfig,
    pub roster: Vec<Skill>,
}

/// Commands that can be sent to the decision worker
pub enum Command {
    SubmitFrame {
        frame: PerceptionFrame,
        reply: oneshot::Sender<TickOutcome>,
    },
    UpdateConfig {
        patch: CombatConfigPatch,
        reply: oneshot::Sender<CombatConfig>,
    },
    ReplaceRoster {
        roster: Vec<Skill>,
        reply: oneshot::Sender<()>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    QuerySnapshot {
        reply: oneshot::Sender<AgentSnapshot>,
    },
}

/// Background task that processes perception frames.
pub struct DecisionWorker {
    engine: CombatEngine,
    min_tick_interval: Duration,
    last_tick_ms: Option<u64>,
    started: Instant,
    command_rx: mpsc::Receiver<Command>,
    actuation_tx: mpsc::Sender<ActuationCommand>,
    event_bus: EventBus,
}

impl DecisionWorker {
    pub fn new(
        engine: CombatEngine,
        min_tick_interval: Duration,
        command_rx: mpsc::Receiver<Command>,
        actuation_tx: mpsc::Sender<ActuationCommand>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            skills = engine.skills().roster().len(),
            min_tick_ms = min_tick_interval.as_millis() as u64,
            "DecisionWorker initialized"
        );

        Self {
            engine,
            min_tick_interval,
            last_tick_ms: None,
            started: Instant::now(),
            command_rx,
            actuation_tx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }
        debug!("DecisionWorker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SubmitFrame { frame, reply } => {
                let outcome = self.handle_frame(&frame);
                if reply.send(outcome).is_err() {
                    debug!("SubmitFrame reply channel closed (caller dropped)");
                }
            }
            Command::UpdateConfig { patch, reply } => {
                self.engine.update_config(patch);
                if reply.send(self.engine.config().clone()).is_err() {
                    debug!("UpdateConfig reply channel closed (caller dropped)");
                }
            }
            Command::ReplaceRoster { roster, reply } => {
                self.engine.replace_roster(roster);
                if reply.send(()).is_err() {
                    debug!("ReplaceRoster reply channel closed (caller dropped)");
                }
            }
            Command::Reset { reply } => {
                self.engine.reset();
                self.last_tick_ms = None;
                if reply.send(()).is_err() {
                    debug!("Reset reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn handle_frame(&mut self, frame: &PerceptionFrame) -> TickOutcome {
        let now_ms = frame.timestamp_ms.unwrap_or_else(|| self.now_ms());

        if let Some(last) = self.last_tick_ms {
            let since_last_ms = now_ms.saturating_sub(last);
            if since_last_ms < self.min_tick_interval.as_millis() as u64 {
                debug!(since_last_ms, "frame throttled");
                return TickOutcome::Throttled { since_last_ms };
            }
        }
        self.last_tick_ms = Some(now_ms);

        let report = self.engine.evaluate(frame, now_ms);
        self.publish(&report);

        if let Some(action) = report.action() {
            self.dispatch(now_ms, action);
        }

        TickOutcome::Evaluated(Box::new(report))
    }

    fn publish(&self, report: &TickReport) {
        let decision = &report.decision;

        if decision.state_changed() {
            self.event_bus
                .publish(Event::Decision(DecisionEvent::StateChanged {
                    timestamp_ms: decision.timestamp_ms,
                    from: decision.previous_state,
                    to: decision.state,
                    reason: decision.reason,
                }));
        }

        if decision.kills > 0 {
            self.event_bus
                .publish(Event::Decision(DecisionEvent::KillRecorded {
                    timestamp_ms: decision.timestamp_ms,
                    count: decision.kills,
                    total: report.stats.kills,
                }));
        }

        if let Some(action) = decision.action.as_ref().filter(|a| !a.is_wait()) {
            self.event_bus
                .publish(Event::Decision(DecisionEvent::ActionIssued {
                    timestamp_ms: decision.timestamp_ms,
                    state: decision.state,
                    action: action.clone(),
                    target: decision.target.as_ref().map(|t| t.id()),
                }));
        }
    }

    /// Hands the action to the actuation worker. Never waits: a full queue
    /// drops the job, a closed one is logged.
    fn dispatch(&self, now_ms: u64, action: &AgentAction) {
        let job = ActuationJob::plan(now_ms, action, self.engine.mapper());
        if job.is_empty() {
            return;
        }

        match self.actuation_tx.try_send(ActuationCommand::Dispatch(job)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(action = action.label(), "actuation queue full, action dropped");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(action = action.label(), "actuation worker gone, action dropped");
            }
        }
    }

    fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            state: self.engine.state(),
            stats: self.engine.stats(),
            vitals: self.engine.vitals(),
            config: self.engine.config().clone(),
            roster: self.engine.skills().roster().to_vec(),
        }
    }
}
