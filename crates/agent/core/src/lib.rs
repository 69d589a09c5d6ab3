//! Deterministic combat decision core.
//!
//! `agent-core` turns one tick of perception output (detections plus a few
//! scalars) into at most one [`AgentAction`]. It performs no I/O, owns no
//! clock and never fails: missing inputs degrade to the searching or idle
//! branches. All mutable state lives in [`engine::CombatEngine`], which the
//! runtime drives from a single task.
pub mod action;
pub mod classify;
pub mod config;
pub mod coords;
pub mod danger;
pub mod detection;
pub mod engine;
pub mod geometry;
pub mod machine;
pub mod skills;
pub mod targeting;

pub use action::AgentAction;
pub use classify::{Category, ClassifiedFrame, Classifier, Vitals, categorize};
pub use config::{
    CombatConfig, CombatConfigPatch, KeywordConfig, PriorityWeights, PriorityWeightsPatch,
};
pub use coords::{CoordinateMapper, ViewportMapping};
pub use danger::{DangerZone, detect_zones};
pub use detection::{BoundingBox, CoordinateSpace, Detection, DetectionId, PerceptionFrame};
pub use engine::{CombatEngine, TickReport};
pub use geometry::{Point, Size};
pub use machine::{
    CombatMachine, CombatState, CombatStats, CurrentTarget, Decision, DecisionReason,
    PlayerPosition, TickContext,
};
pub use skills::{Skill, SkillScheduler};
pub use targeting::{PrioritizedTarget, ScoreTerms, ThreatLevel, prioritize};
