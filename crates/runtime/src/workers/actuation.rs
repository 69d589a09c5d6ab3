//! Actuation worker: the only place that talks to the command sink.
//!
//! Jobs arrive through a bounded channel filled with `try_send`, so a slow or
//! unreachable sink never stalls the decision worker. Delivery failures are
//! recorded in [`ActuationStatus`] and published on the bus; nothing is
//! retried and nothing flows back into the decision core.

use std::sync::Arc;
use std::time::Duration;

use agent_core::{AgentAction, CoordinateMapper};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::api::{CommandSink, SinkCommand, SinkError};
use crate::config::{ActuationConfig, ActuationConfigPatch};
use crate::events::{ActuationEvent, Event, EventBus};

/// Connectivity and delivery counters at the actuation boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuationStatus {
    /// True after a successful delivery, false after a failed one.
    pub connected: bool,
    pub last_error: Option<String>,
    pub sent: u64,
    pub failed: u64,
    /// Commands discarded because actuation was disabled.
    pub skipped: u64,
}

/// Commands for one chosen action, already in normalized space.
#[derive(Clone, Debug, PartialEq)]
pub struct ActuationJob {
    pub timestamp_ms: u64,
    pub commands: Vec<SinkCommand>,
}

impl ActuationJob {
    /// Translates `action` into sink commands. `Wait` yields an empty job.
    pub fn plan(timestamp_ms: u64, action: &AgentAction, mapper: &CoordinateMapper) -> Self {
        let move_to = |point| {
            let normalized = mapper.frame_to_normalized(point);
            SinkCommand::Move {
                x: normalized.x,
                y: normalized.y,
            }
        };

        let commands = match action {
            AgentAction::UseSkill { key, .. } | AgentAction::PressKey { key } => {
                vec![SinkCommand::key(key.clone())]
            }
            AgentAction::MoveToward { target } => vec![move_to(*target)],
            AgentAction::CollectLoot { target, key } => {
                vec![move_to(*target), SinkCommand::key(key.clone())]
            }
            AgentAction::Wait => Vec::new(),
        };

        Self {
            timestamp_ms,
            commands,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

pub enum ActuationCommand {
    Dispatch(ActuationJob),
    Configure {
        patch: ActuationConfigPatch,
        reply: oneshot::Sender<ActuationConfig>,
    },
    /// Replies once every earlier message has been processed.
    Flush {
        reply: oneshot::Sender<ActuationStatus>,
    },
}

/// Background task that owns the sink and its configuration.
pub struct ActuationWorker {
    config: ActuationConfig,
    sink: Arc<dyn CommandSink>,
    timeout: Duration,
    command_rx: mpsc::Receiver<ActuationCommand>,
    status_tx: watch::Sender<ActuationStatus>,
    event_bus: EventBus,
}

impl ActuationWorker {
    pub fn new(
        config: ActuationConfig,
        sink: Arc<dyn CommandSink>,
        timeout: Duration,
        command_rx: mpsc::Receiver<ActuationCommand>,
        status_tx: watch::Sender<ActuationStatus>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            endpoint = %config.endpoint,
            enabled = config.enabled,
            timeout_ms = timeout.as_millis() as u64,
            "ActuationWorker initialized"
        );

        Self {
            config,
            sink,
            timeout,
            command_rx,
            status_tx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            match command {
                ActuationCommand::Dispatch(job) => self.dispatch(job).await,
                ActuationCommand::Configure { patch, reply } => {
                    patch.apply(&mut self.config);
                    info!(
                        endpoint = %self.config.endpoint,
                        enabled = self.config.enabled,
                        log = self.config.log_commands,
                        "actuation config updated"
                    );
                    if reply.send(self.config.clone()).is_err() {
                        debug!("Configure reply channel closed (caller dropped)");
                    }
                }
                ActuationCommand::Flush { reply } => {
                    if reply.send(self.status_tx.borrow().clone()).is_err() {
                        debug!("Flush reply channel closed (caller dropped)");
                    }
                }
            }
        }

        debug!("ActuationWorker stopped");
    }

    async fn dispatch(&mut self, job: ActuationJob) {
        if !self.config.enabled {
            if self.config.log_commands {
                info!(
                    timestamp_ms = job.timestamp_ms,
                    commands = ?job.commands,
                    "actuation disabled, commands not sent"
                );
            }
            let skipped = job.commands.len() as u64;
            self.status_tx.send_modify(|status| status.skipped += skipped);
            return;
        }

        for command in job.commands {
            if self.config.log_commands {
                info!(timestamp_ms = job.timestamp_ms, ?command, "sending command");
            }

            if let Err(error) = self.deliver(&command).await {
                warn!(%error, ?command, endpoint = %self.config.endpoint, "command delivery failed");
                let message = error.to_string();
                self.status_tx.send_modify(|status| {
                    status.connected = false;
                    status.failed += 1;
                    status.last_error = Some(message.clone());
                });
                self.event_bus
                    .publish(Event::Actuation(ActuationEvent::CommandFailed {
                        command,
                        error: message,
                    }));
                // Later commands of this job depend on this one.
                return;
            }

            let mut recovered = false;
            self.status_tx.send_modify(|status| {
                recovered = status.last_error.is_some() && !status.connected;
                status.connected = true;
                status.sent += 1;
            });
            if recovered {
                info!(endpoint = %self.config.endpoint, "actuation connectivity restored");
                self.event_bus
                    .publish(Event::Actuation(ActuationEvent::ConnectivityRestored {
                        endpoint: self.config.endpoint.clone(),
                    }));
            }
        }
    }

    async fn deliver(&self, command: &SinkCommand) -> Result<(), SinkError> {
        match tokio::time::timeout(self.timeout, self.sink.send(&self.config.endpoint, command))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SinkError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}
