//! Worker tasks that back the runtime orchestration.
//!
//! The decision worker owns the combat engine and runs ticks; the actuation
//! worker owns the command sink and its connectivity state.

mod actuation;
mod decision;

pub use actuation::{ActuationCommand, ActuationJob, ActuationStatus, ActuationWorker};
pub use decision::{AgentSnapshot, Command, DecisionWorker, TickOutcome};
