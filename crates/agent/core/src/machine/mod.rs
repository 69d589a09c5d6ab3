//! Combat state machine: picks exactly one state and at most one action per
//! tick.
//!
//! # Rule Order
//!
//! Rules are evaluated in order; the first one that produces an outcome wins.
//!
//! 1. **Stuck** (previous state `Approaching` only): jump
//! 2. **Danger**: player within 1.5x a zone radius, move away
//! 3. **Heal**: HP at or below threshold with a heal skill ready
//! 4. **Engage** the safe target list: approach, kite, area attack or attack.
//!    A target in range with no skill ready keeps the state and the target
//!    but sends no action.
//! 5. **Loot**
//! 6. **Fallback**: search, wait for isolated targets, or idle
//!
//! The previous state only gates the stuck rule and transition bookkeeping;
//! it never restricts which state comes next.

mod state;
mod stats;
mod tracking;

pub use state::{CombatState, DecisionReason};
pub use stats::CombatStats;
pub use tracking::{KillTracker, PlayerPosition, PositionTracker};

use crate::action::AgentAction;
use crate::config::CombatConfig;
use crate::danger::DangerZone;
use crate::detection::{Detection, DetectionId};
use crate::geometry::Point;
use crate::skills::SkillScheduler;
use crate::targeting::PrioritizedTarget;

/// Everything the machine reads for one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    pub now_ms: u64,
    /// Player (or screen-center) position in frame space.
    pub origin: Point,
    /// Position of a detected player character, when one was seen.
    pub player_seen: Option<Point>,
    pub player_hp: f64,
    /// Prioritized targets, best first.
    pub targets: &'a [PrioritizedTarget],
    pub zones: &'a [DangerZone],
    /// Loot detections in frame space.
    pub loot: &'a [Detection],
    /// Ids of every enemy detected this tick, including filtered ones.
    pub enemy_ids: &'a [DetectionId],
}

/// Result of one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub timestamp_ms: u64,
    pub state: CombatState,
    pub previous_state: CombatState,
    /// `None` means nothing is sent this tick.
    pub action: Option<AgentAction>,
    pub reason: DecisionReason,
    /// Target the action is aimed at, if any.
    pub target: Option<PrioritizedTarget>,
    /// Enemies counted as killed on this tick.
    pub kills: usize,
}

impl Decision {
    pub fn state_changed(&self) -> bool {
        self.state != self.previous_state
    }
}

/// Remembered target for switch hysteresis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurrentTarget {
    pub id: DetectionId,
    /// Score at the time the target was chosen.
    pub score: f64,
}

struct Outcome {
    state: CombatState,
    action: Option<AgentAction>,
    reason: DecisionReason,
    target: Option<PrioritizedTarget>,
}

impl Outcome {
    fn new(state: CombatState, action: Option<AgentAction>, reason: DecisionReason) -> Self {
        Self {
            state,
            action,
            reason,
            target: None,
        }
    }

    fn aimed_at(mut self, target: &PrioritizedTarget) -> Self {
        self.target = Some(target.clone());
        self
    }
}

/// Mutable decision state carried between ticks.
#[derive(Clone, Debug, Default)]
pub struct CombatMachine {
    state: CombatState,
    current_target: Option<CurrentTarget>,
    positions: PositionTracker,
    kills: KillTracker,
    stats: CombatStats,
}

impl CombatMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn current_target(&self) -> Option<CurrentTarget> {
        self.current_target
    }

    pub fn stats(&self) -> CombatStats {
        self.stats
    }

    pub fn player_position(&self) -> Option<PlayerPosition> {
        self.positions.last()
    }

    /// Returns every piece of cross-tick state to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Runs one tick. Skill cooldowns are stamped in `skills` when the chosen
    /// action uses a skill.
    pub fn evaluate(
        &mut self,
        ctx: &TickContext<'_>,
        config: &CombatConfig,
        skills: &mut SkillScheduler,
    ) -> Decision {
        let previous_state = self.state;
        self.stats.ticks += 1;

        let kills = self.kills.observe(ctx.enemy_ids.iter().copied());
        self.stats.kills += kills as u64;

        if let Some(point) = ctx.player_seen {
            self.positions
                .observe(point, ctx.now_ms, CombatConfig::STUCK_MOVE_EPSILON);
        }

        let safe: Vec<&PrioritizedTarget> = ctx
            .targets
            .iter()
            .filter(|t| !(config.avoid_danger_zones && t.in_danger_zone))
            .collect();

        let roster: &SkillScheduler = skills;
        let outcome = match self.check_stuck(ctx, config, previous_state) {
            Some(outcome) => outcome,
            None => self
                .avoid_danger(ctx, config)
                .or_else(|| Self::heal(ctx, config, roster))
                .or_else(|| self.engage(ctx, config, roster, &safe))
                .or_else(|| Self::collect_loot(ctx, config))
                .unwrap_or_else(|| self.fallback(ctx, config, &safe)),
        };

        if let Some(skill_id) = outcome.action.as_ref().and_then(AgentAction::skill_id) {
            skills.mark_used(skill_id, ctx.now_ms);
        }

        if outcome.state != previous_state {
            self.stats.state_changes += 1;
            self.stats.last_transition_ms = Some(ctx.now_ms);
            tracing::info!(
                from = %previous_state,
                to = %outcome.state,
                reason = %outcome.reason,
                "combat state changed"
            );
        }
        self.state = outcome.state;

        Decision {
            timestamp_ms: ctx.now_ms,
            state: outcome.state,
            previous_state,
            action: outcome.action,
            reason: outcome.reason,
            target: outcome.target,
            kills,
        }
    }

    fn check_stuck(
        &mut self,
        ctx: &TickContext<'_>,
        config: &CombatConfig,
        previous: CombatState,
    ) -> Option<Outcome> {
        if previous != CombatState::Approaching
            || !self.positions.is_stuck(ctx.now_ms, config.stuck_timeout_ms)
        {
            return None;
        }

        tracing::debug!(timeout_ms = config.stuck_timeout_ms, "player stuck, jumping");
        self.positions.restart_timer(ctx.now_ms);
        self.stats.stuck_recoveries += 1;

        Some(Outcome::new(
            CombatState::Approaching,
            Some(AgentAction::PressKey {
                key: config.jump_key.clone(),
            }),
            DecisionReason::Stuck,
        ))
    }

    fn avoid_danger(&mut self, ctx: &TickContext<'_>, config: &CombatConfig) -> Option<Outcome> {
        if !config.avoid_danger_zones {
            return None;
        }

        let nearest = ctx
            .zones
            .iter()
            .map(|zone| (zone, zone.center.distance(ctx.origin)))
            .filter(|(zone, distance)| *distance < zone.radius * CombatConfig::DANGER_RADIUS_FACTOR)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(zone, _)| zone)?;

        let escape = ctx.origin.reflect_away_from(nearest.center, nearest.radius);
        self.stats.dangers_avoided += 1;

        tracing::debug!(
            zone_x = nearest.center.x,
            zone_y = nearest.center.y,
            escape_x = escape.x,
            escape_y = escape.y,
            "escaping danger zone"
        );

        Some(Outcome::new(
            CombatState::Avoiding,
            Some(AgentAction::MoveToward { target: escape }),
            DecisionReason::EscapeDanger,
        ))
    }

    fn heal(
        ctx: &TickContext<'_>,
        config: &CombatConfig,
        skills: &SkillScheduler,
    ) -> Option<Outcome> {
        if ctx.player_hp > config.heal_threshold {
            return None;
        }

        let skill = skills.select_heal(ctx.now_ms)?;

        Some(Outcome::new(
            CombatState::Healing,
            Some(AgentAction::UseSkill {
                skill_id: skill.id.clone(),
                key: skill.key.clone(),
            }),
            DecisionReason::Heal,
        ))
    }

    fn engage(
        &mut self,
        ctx: &TickContext<'_>,
        config: &CombatConfig,
        skills: &SkillScheduler,
        safe: &[&PrioritizedTarget],
    ) -> Option<Outcome> {
        let target = self.choose_target(safe)?;

        if target.distance > config.max_attack_range {
            return Some(
                Outcome::new(
                    CombatState::Approaching,
                    Some(AgentAction::MoveToward {
                        target: target.position,
                    }),
                    DecisionReason::Approach,
                )
                .aimed_at(target),
            );
        }

        if target.distance < config.min_attack_range && config.kite_enabled {
            let away = ctx
                .origin
                .reflect_away_from(target.position, config.min_attack_range);
            return Some(
                Outcome::new(
                    CombatState::Kiting,
                    Some(AgentAction::MoveToward { target: away }),
                    DecisionReason::Kite,
                )
                .aimed_at(target),
            );
        }

        if safe.len() >= config.aoe_threshold && !config.avoid_danger_zones {
            let Some(skill) = skills.select_skill(true, safe.len(), ctx.now_ms) else {
                return Some(Self::await_cooldown(CombatState::Aoe, target));
            };
            self.stats.area_hits += safe.len() as u64;
            return Some(
                Outcome::new(
                    CombatState::Aoe,
                    Some(AgentAction::UseSkill {
                        skill_id: skill.id.clone(),
                        key: skill.key.clone(),
                    }),
                    DecisionReason::AreaAttack,
                )
                .aimed_at(target),
            );
        }

        let Some(skill) = skills.select_skill(false, 1, ctx.now_ms) else {
            return Some(Self::await_cooldown(CombatState::Combat, target));
        };
        self.stats.skills_used += 1;
        Some(
            Outcome::new(
                CombatState::Combat,
                Some(AgentAction::UseSkill {
                    skill_id: skill.id.clone(),
                    key: skill.key.clone(),
                }),
                DecisionReason::Attack,
            )
            .aimed_at(target),
        )
    }

    /// In range with nothing ready: hold the engagement and send nothing.
    fn await_cooldown(state: CombatState, target: &PrioritizedTarget) -> Outcome {
        tracing::debug!(id = target.id().0, %state, "no skill ready");
        Outcome::new(state, None, DecisionReason::Cooldown).aimed_at(target)
    }

    /// Applies switch hysteresis: the remembered target is kept while it is
    /// still safe and the top target does not beat its score by more than
    /// [`CombatConfig::TARGET_SWITCH_FACTOR`].
    fn choose_target<'t>(&mut self, safe: &[&'t PrioritizedTarget]) -> Option<&'t PrioritizedTarget> {
        let top = *safe.first()?;

        if let Some(current) = self.current_target {
            if current.id != top.id()
                && top.score <= current.score * CombatConfig::TARGET_SWITCH_FACTOR
            {
                if let Some(kept) = safe.iter().find(|t| t.id() == current.id) {
                    return Some(*kept);
                }
            }
        }

        if self.current_target.map(|c| c.id) != Some(top.id()) {
            tracing::debug!(id = top.id().0, score = top.score, "switching target");
        }
        self.current_target = Some(CurrentTarget {
            id: top.id(),
            score: top.score,
        });
        Some(top)
    }

    fn collect_loot(ctx: &TickContext<'_>, config: &CombatConfig) -> Option<Outcome> {
        if !config.auto_loot {
            return None;
        }

        let nearest = ctx
            .loot
            .iter()
            .map(Detection::local_center)
            .min_by(|a, b| a.distance(ctx.origin).total_cmp(&b.distance(ctx.origin)))?;

        Some(Outcome::new(
            CombatState::Looting,
            Some(AgentAction::CollectLoot {
                target: nearest,
                key: config.loot_key.clone(),
            }),
            DecisionReason::Loot,
        ))
    }

    fn fallback(
        &mut self,
        ctx: &TickContext<'_>,
        config: &CombatConfig,
        safe: &[&PrioritizedTarget],
    ) -> Outcome {
        if ctx.targets.is_empty() {
            return Outcome::new(
                CombatState::Searching,
                Some(AgentAction::Wait),
                DecisionReason::Search,
            );
        }

        if safe.is_empty() && config.avoid_danger_zones {
            return Outcome::new(
                CombatState::Avoiding,
                Some(AgentAction::Wait),
                DecisionReason::WaitForIsolated,
            );
        }

        self.current_target = None;
        Outcome::new(CombatState::Idle, None, DecisionReason::Idle)
    }
}
