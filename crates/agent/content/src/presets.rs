//! Built-in skill rosters.

use agent_core::Skill;

/// A five-skill melee roster bound to the number row.
///
/// | id | key | cooldown | notes |
/// |---|---|---|---|
/// | `basic_attack` | 1 | 0.5s | filler |
/// | `power_strike` | 2 | 6s | preferred single target |
/// | `cleave` | 3 | 8s | area, needs 3 targets |
/// | `whirlwind` | 4 | 12s | area, any count |
/// | `heal` | 5 | 15s | heal rule only |
pub fn default_roster() -> Vec<Skill> {
    vec![
        Skill::new("basic_attack", "1", 500)
            .named("Basic Attack")
            .with_range(150.0),
        Skill::new("power_strike", "2", 6_000)
            .named("Power Strike")
            .with_priority(2)
            .with_range(150.0),
        Skill::new("cleave", "3", 8_000)
            .named("Cleave")
            .with_priority(3)
            .with_range(200.0)
            .area(Some(3)),
        Skill::new("whirlwind", "4", 12_000)
            .named("Whirlwind")
            .with_priority(1)
            .with_range(180.0)
            .area(None),
        Skill::new("heal", "5", 15_000).named("Heal"),
    ]
}

#[cfg(test)]
mod tests {
    use agent_core::SkillScheduler;

    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let roster = default_roster();
        let mut ids: Vec<&str> = roster.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), roster.len());
    }

    #[test]
    fn test_single_target_prefers_power_strike() {
        let scheduler = SkillScheduler::new(default_roster());
        let skill = scheduler.select_skill(false, 1, 0).expect("ready skill");
        assert_eq!(skill.id, "power_strike");
    }

    #[test]
    fn test_area_selection_depends_on_count() {
        let scheduler = SkillScheduler::new(default_roster());
        assert_eq!(
            scheduler.select_skill(true, 3, 0).map(|s| s.id.as_str()),
            Some("cleave")
        );
        assert_eq!(
            scheduler.select_skill(true, 2, 0).map(|s| s.id.as_str()),
            Some("whirlwind")
        );
    }

    #[test]
    fn test_heal_is_reserved() {
        let scheduler = SkillScheduler::new(default_roster());
        assert_eq!(scheduler.select_heal(0).map(|s| s.id.as_str()), Some("heal"));
    }
}
