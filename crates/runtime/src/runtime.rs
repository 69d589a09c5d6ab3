//! High-level runtime orchestrator.
//!
//! The runtime owns the decision and actuation workers, wires up the
//! command channels and event bus, and exposes a builder-based API for
//! clients that feed perception frames.

use std::sync::Arc;

use agent_core::{CombatConfig, CombatEngine, CoordinateMapper, Skill};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{AgentHandle, CommandSink, HttpCommandSink, Result, RuntimeError};
use crate::config::{ActuationConfig, RuntimeConfig};
use crate::events::EventBus;
use crate::workers::{ActuationStatus, ActuationWorker, DecisionWorker};

/// Main runtime that hosts the agent workers
///
/// [`AgentHandle`] provides a cloneable façade for clients.
pub struct AgentRuntime {
    handle: AgentHandle,
    decision_worker: JoinHandle<()>,
    actuation_worker: JoinHandle<()>,
}

impl AgentRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for both workers to drain. Clones of the handle held elsewhere
    /// keep the workers alive, so drop them first.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.decision_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.actuation_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("agent runtime stopped");
        Ok(())
    }
}

/// Builder for [`AgentRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    actuation: ActuationConfig,
    combat: CombatConfig,
    roster: Option<Vec<Skill>>,
    sink: Option<Arc<dyn CommandSink>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            actuation: ActuationConfig::default(),
            combat: CombatConfig::default(),
            roster: None,
            sink: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn actuation(mut self, actuation: ActuationConfig) -> Self {
        self.actuation = actuation;
        self
    }

    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    /// Initial skill roster. Defaults to the built-in five-skill preset.
    pub fn roster(mut self, roster: Vec<Skill>) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Command sink. Defaults to [`HttpCommandSink`].
    pub fn sink(mut self, sink: impl CommandSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Build the runtime and spawn its workers
    pub async fn build(self) -> Result<AgentRuntime> {
        self.actuation.validate()?;

        let sink: Arc<dyn CommandSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(HttpCommandSink::new()?),
        };
        let roster = self.roster.unwrap_or_else(agent_content::default_roster);

        let engine = CombatEngine::new(self.combat, roster).with_mapper(CoordinateMapper::new(
            self.config.source,
            self.config.container,
        ));

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (actuation_tx, actuation_rx) = mpsc::channel(self.config.actuation_buffer_size);
        let (status_tx, status_rx) = watch::channel(ActuationStatus::default());
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = AgentHandle::new(
            command_tx,
            actuation_tx.clone(),
            status_rx,
            event_bus.clone(),
        );

        let actuation_worker = ActuationWorker::new(
            self.actuation,
            sink,
            self.config.actuation_timeout,
            actuation_rx,
            status_tx,
            event_bus.clone(),
        );
        let actuation_worker = tokio::spawn(async move {
            actuation_worker.run().await;
        });

        let decision_worker = DecisionWorker::new(
            engine,
            self.config.min_tick_interval,
            command_rx,
            actuation_tx,
            event_bus,
        );
        let decision_worker = tokio::spawn(async move {
            decision_worker.run().await;
        });

        Ok(AgentRuntime {
            handle,
            decision_worker,
            actuation_worker,
        })
    }
}
