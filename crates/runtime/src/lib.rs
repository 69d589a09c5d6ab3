//! Async host for the combat decision core.
//!
//! This crate wraps [`agent_core::CombatEngine`] in a single-writer worker,
//! forwards chosen actions to an external command sink through a second
//! worker, and publishes what happened on a topic-based event bus. Consumers
//! embed [`AgentRuntime`] and talk to it through [`AgentHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle, errors and the command sink boundary
//! - [`config`] reads runtime and actuation settings
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps the decision and actuation tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    AgentHandle, CommandSink, HttpCommandSink, Result, RuntimeError, SinkCommand, SinkError,
};
pub use config::{ActuationConfig, ActuationConfigPatch, RuntimeConfig};
pub use events::{ActuationEvent, DecisionEvent, Event, EventBus, Topic};
pub use runtime::{AgentRuntime, RuntimeBuilder};
pub use workers::{ActuationJob, ActuationStatus, AgentSnapshot, TickOutcome};
