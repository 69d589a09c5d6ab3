//! Tick pipeline.
//!
//! The [`CombatEngine`] owns every piece of mutable decision state (skill
//! cooldowns, current target, position history, counters, previous state)
//! and runs the pipeline once per perception frame:
//!
//! classify → map to frame space → detect danger zones → prioritize → decide
//!
//! A tick is synchronous and runs to completion; callers serialize ticks.

use crate::action::AgentAction;
use crate::classify::{ClassifiedFrame, Classifier, Vitals};
use crate::config::{CombatConfig, CombatConfigPatch};
use crate::coords::CoordinateMapper;
use crate::danger::{DangerZone, detect_zones};
use crate::detection::{Detection, DetectionId, PerceptionFrame};
use crate::geometry::{Point, Size};
use crate::machine::{CombatMachine, CombatState, CombatStats, Decision, TickContext};
use crate::skills::{Skill, SkillScheduler};
use crate::targeting::{PrioritizedTarget, prioritize};

/// Everything one tick produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub decision: Decision,
    /// Prioritized targets, best first.
    pub targets: Vec<PrioritizedTarget>,
    pub zones: Vec<DangerZone>,
    pub vitals: Vitals,
    /// Evaluation origin in frame space.
    pub origin: Point,
    pub stats: CombatStats,
}

impl TickReport {
    pub fn action(&self) -> Option<&AgentAction> {
        self.decision.action.as_ref()
    }

    pub fn state(&self) -> CombatState {
        self.decision.state
    }
}

/// Single-writer orchestrator for the decision core.
#[derive(Clone, Debug)]
pub struct CombatEngine {
    config: CombatConfig,
    mapper: CoordinateMapper,
    classifier: Classifier,
    skills: SkillScheduler,
    machine: CombatMachine,
}

impl CombatEngine {
    pub fn new(config: CombatConfig, roster: Vec<Skill>) -> Self {
        Self {
            config,
            mapper: CoordinateMapper::default(),
            classifier: Classifier::new(),
            skills: SkillScheduler::new(roster),
            machine: CombatMachine::new(),
        }
    }

    pub fn with_mapper(mut self, mapper: CoordinateMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn skills(&self) -> &SkillScheduler {
        &self.skills
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn state(&self) -> CombatState {
        self.machine.state()
    }

    pub fn stats(&self) -> CombatStats {
        self.machine.stats()
    }

    pub fn vitals(&self) -> Vitals {
        self.classifier.vitals()
    }

    /// Replaces the configuration wholesale.
    pub fn set_config(&mut self, config: CombatConfig) {
        self.config = config;
    }

    /// Merges a partial configuration; unset fields keep their value.
    pub fn update_config(&mut self, patch: CombatConfigPatch) {
        patch.apply(&mut self.config);
        tracing::info!("combat config updated");
    }

    /// Replaces the skill roster, cooldown stamps included.
    pub fn replace_roster(&mut self, roster: Vec<Skill>) {
        tracing::info!(skills = roster.len(), "skill roster replaced");
        self.skills.replace_roster(roster);
    }

    pub fn set_container(&mut self, container: Option<Size>) {
        self.mapper.set_container(container);
    }

    /// Returns cooldowns, counters, current target, previous state, position
    /// history, last-seen enemy ids and vitals to their initial values.
    /// Configuration and roster are kept.
    pub fn reset(&mut self) {
        self.skills.reset();
        self.machine.reset();
        self.classifier.reset();
        tracing::info!("combat engine reset");
    }

    /// Runs one tick over `frame` at `now_ms`.
    pub fn evaluate(&mut self, frame: &PerceptionFrame, now_ms: u64) -> TickReport {
        if frame.source.is_some() && frame.source != Some(self.mapper.frame_size()) {
            self.mapper.set_source(frame.source);
        }

        if let Some(hp) = frame.player_hp {
            self.classifier.set_hp(hp);
        }
        let classified = self.classifier.classify(&frame.detections, &self.config.keywords);

        let enemies = self.to_frame_space(&classified.enemies);
        let loot = self.to_frame_space(&classified.loot);
        let player_seen = self.player_center(&classified);
        let origin = self.origin(frame, player_seen);

        let zones = detect_zones(
            &enemies,
            self.config.safety_distance,
            self.config.density_threshold,
        );
        let targets = prioritize(&enemies, origin, &zones, &self.config);
        let enemy_ids: Vec<DetectionId> = classified.enemies.iter().map(|d| d.id).collect();

        let ctx = TickContext {
            now_ms,
            origin,
            player_seen,
            player_hp: classified.vitals.hp,
            targets: &targets,
            zones: &zones,
            loot: &loot,
            enemy_ids: &enemy_ids,
        };
        let decision = self.machine.evaluate(&ctx, &self.config, &mut self.skills);

        tracing::debug!(
            state = %decision.state,
            reason = %decision.reason,
            action = decision.action.as_ref().map(AgentAction::label),
            targets = targets.len(),
            zones = zones.len(),
            "tick evaluated"
        );

        TickReport {
            decision,
            targets,
            zones,
            vitals: classified.vitals,
            origin,
            stats: self.machine.stats(),
        }
    }

    fn to_frame_space(&self, detections: &[Detection]) -> Vec<Detection> {
        detections
            .iter()
            .map(|d| self.mapper.normalize_detection(d))
            .collect()
    }

    fn player_center(&self, classified: &ClassifiedFrame) -> Option<Point> {
        classified
            .players
            .first()
            .map(|player| self.mapper.to_frame(player))
    }

    /// Player character center, else the reported player position, else the
    /// frame center.
    fn origin(&self, frame: &PerceptionFrame, player_seen: Option<Point>) -> Point {
        player_seen
            .or_else(|| {
                frame
                    .player_position
                    .map(|normalized| self.mapper.normalized_to_frame(normalized))
            })
            .unwrap_or_else(|| self.mapper.frame_size().center())
    }
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new(CombatConfig::default(), Vec::new())
    }
}
