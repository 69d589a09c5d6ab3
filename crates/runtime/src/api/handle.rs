//! Cloneable façade for issuing commands to the runtime.
//!
//! [`AgentHandle`] hides channel plumbing and offers async helpers for
//! submitting frames, updating configuration and streaming events.
use agent_core::{CombatConfig, CombatConfigPatch, PerceptionFrame, Skill};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::errors::{Result, RuntimeError};
use crate::config::{ActuationConfig, ActuationConfigPatch};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{ActuationCommand, ActuationStatus, AgentSnapshot, Command, TickOutcome};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct AgentHandle {
    command_tx: mpsc::Sender<Command>,
    actuation_tx: mpsc::Sender<ActuationCommand>,
    status_rx: watch::Receiver<ActuationStatus>,
    event_bus: EventBus,
}

impl AgentHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        actuation_tx: mpsc::Sender<ActuationCommand>,
        status_rx: watch::Receiver<ActuationStatus>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            command_tx,
            actuation_tx,
            status_rx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Runs one tick over `frame`, unless the throttle drops it.
    ///
    /// Returns once the decision is made; actuation happens in the
    /// background.
    pub async fn submit_frame(&self, frame: PerceptionFrame) -> Result<TickOutcome> {
        self.request(|reply| Command::SubmitFrame { frame, reply })
            .await
    }

    /// Merges a partial combat configuration and returns the result.
    pub async fn update_config(&self, patch: CombatConfigPatch) -> Result<CombatConfig> {
        self.request(|reply| Command::UpdateConfig { patch, reply })
            .await
    }

    /// Replaces the whole skill roster.
    pub async fn replace_roster(&self, roster: Vec<Skill>) -> Result<()> {
        self.request(|reply| Command::ReplaceRoster { roster, reply })
            .await
    }

    /// Returns cooldowns, counters, target memory and vitals to initial values.
    pub async fn reset(&self) -> Result<()> {
        self.request(|reply| Command::Reset { reply }).await
    }

    pub async fn snapshot(&self) -> Result<AgentSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply })
            .await
    }

    /// Merges a partial sink configuration and returns the result.
    ///
    /// The merged endpoint is validated before it reaches the worker.
    pub async fn update_actuation(&self, patch: ActuationConfigPatch) -> Result<ActuationConfig> {
        if let Some(endpoint) = patch.endpoint.as_ref() {
            ActuationConfig {
                endpoint: endpoint.clone(),
                ..ActuationConfig::default()
            }
            .validate()?;
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.actuation_tx
            .send(ActuationCommand::Configure {
                patch,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::ActuationChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Waits until every job queued so far has been delivered or failed.
    pub async fn flush_actuation(&self) -> Result<ActuationStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.actuation_tx
            .send(ActuationCommand::Flush { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::ActuationChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Latest actuation status without waiting on the worker.
    pub fn actuation_status(&self) -> ActuationStatus {
        self.status_rx.borrow().clone()
    }

    /// Receiver notified on every status change.
    pub fn watch_actuation(&self) -> watch::Receiver<ActuationStatus> {
        self.status_rx.clone()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Decision` - State changes, issued actions, kills
    /// - `Topic::Actuation` - Delivery failures and recoveries
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
