//! Target prioritization.
//!
//! Every enemy is scored on a weighted sum of five terms (see [`terms`]):
//! proximity, type preference, a neutral HP term, threat, and isolation.
//! Isolation is the safety bias: grouped enemies are pushed down the list
//! regardless of how close or desirable they are.

mod prioritizer;
pub mod terms;

pub use prioritizer::{PrioritizedTarget, ThreatLevel, prioritize};
pub use terms::ScoreTerms;
