//! Skill roster and cooldown-aware skill selection.
//!
//! # Eligibility
//!
//! - cooldown elapsed: `now - last_used >= cooldown`
//! - area mode: the skill must be area-capable and its minimum target count,
//!   if any, must be met
//! - single-target mode: area-only skills (those with a minimum target count)
//!   are excluded
//! - heal skills are reserved for [`SkillScheduler::select_heal`]
//!
//! Among eligible skills the highest `priority` wins; ties go to the earlier
//! roster entry. No eligible skill is a no-op signal (`None`), not an error.

/// A combat ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Keybind token sent to the actuation sink.
    pub key: String,
    pub cooldown_ms: u64,
    /// Monotonic; `None` until first use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_used_ms: Option<u64>,
    /// Tie-break rank, larger wins.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_area: bool,
    /// Minimum target count for area-only skills.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_targets: Option<usize>,
    /// Effective range in frame pixels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: f64,
}

impl Skill {
    pub fn new(id: impl Into<String>, key: impl Into<String>, cooldown_ms: u64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            key: key.into(),
            cooldown_ms,
            last_used_ms: None,
            priority: 0,
            is_area: false,
            min_targets: None,
            range: 0.0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    /// Marks the skill area-capable, optionally area-only above a target count.
    pub fn area(mut self, min_targets: Option<usize>) -> Self {
        self.is_area = true;
        self.min_targets = min_targets;
        self
    }

    pub fn used_at(mut self, now_ms: u64) -> Self {
        self.last_used_ms = Some(now_ms);
        self
    }

    pub fn is_ready(&self, now_ms: u64) -> bool {
        self.remaining_cooldown(now_ms) == 0
    }

    pub fn remaining_cooldown(&self, now_ms: u64) -> u64 {
        match self.last_used_ms {
            Some(last) => self.cooldown_ms.saturating_sub(now_ms.saturating_sub(last)),
            None => 0,
        }
    }

    pub fn is_heal(&self) -> bool {
        self.name.to_ascii_lowercase().contains("heal")
    }

    fn fits(&self, area_needed: bool, target_count: usize) -> bool {
        if area_needed {
            self.is_area && self.min_targets.is_none_or(|min| target_count >= min)
        } else {
            self.min_targets.is_none()
        }
    }
}

/// Owns the roster and every skill's cooldown stamp.
#[derive(Clone, Debug, Default)]
pub struct SkillScheduler {
    roster: Vec<Skill>,
}

impl SkillScheduler {
    pub fn new(roster: Vec<Skill>) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &[Skill] {
        &self.roster
    }

    /// Replaces the whole roster.
    pub fn replace_roster(&mut self, roster: Vec<Skill>) {
        self.roster = roster;
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.roster.iter().find(|skill| skill.id == id)
    }

    /// Best eligible offensive skill for the requested mode.
    pub fn select_skill(&self, area_needed: bool, target_count: usize, now_ms: u64) -> Option<&Skill> {
        best_by_priority(self.roster.iter().filter(|skill| {
            !skill.is_heal() && skill.is_ready(now_ms) && skill.fits(area_needed, target_count)
        }))
    }

    /// Best heal skill that is off cooldown.
    pub fn select_heal(&self, now_ms: u64) -> Option<&Skill> {
        best_by_priority(
            self.roster
                .iter()
                .filter(|skill| skill.is_heal() && skill.is_ready(now_ms)),
        )
    }

    /// Stamps `last_used_ms`. Timestamps never move backwards.
    pub fn mark_used(&mut self, id: &str, now_ms: u64) -> bool {
        match self.roster.iter_mut().find(|skill| skill.id == id) {
            Some(skill) => {
                let stamped = skill.last_used_ms.map_or(now_ms, |last| last.max(now_ms));
                skill.last_used_ms = Some(stamped);
                true
            }
            None => false,
        }
    }

    /// Clears every cooldown stamp.
    pub fn reset(&mut self) {
        for skill in &mut self.roster {
            skill.last_used_ms = None;
        }
    }
}

/// First skill with the strictly highest priority.
fn best_by_priority<'a>(skills: impl Iterator<Item = &'a Skill>) -> Option<&'a Skill> {
    skills.fold(None, |best: Option<&Skill>, skill| match best {
        Some(current) if current.priority >= skill.priority => Some(current),
        _ => Some(skill),
    })
}
