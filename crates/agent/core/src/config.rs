//! Tunable combat policy.
//!
//! [`CombatConfig`] is owned by the engine and read by every stage each tick.
//! It is replaced wholesale or merged field-by-field through
//! [`CombatConfigPatch`]. Values are not validated: weights summing far from
//! one, a zero radius or a zero density threshold all degrade predictably
//! rather than being rejected.

use std::collections::BTreeMap;

use crate::classify::Category;

/// Weights of the five prioritization terms. Used as given, never normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PriorityWeights {
    pub distance: f64,
    pub type_preference: f64,
    pub hp: f64,
    pub threat: f64,
    pub isolation: f64,
}

impl PriorityWeights {
    pub fn sum(&self) -> f64 {
        self.distance + self.type_preference + self.hp + self.threat + self.isolation
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            distance: 0.3,
            type_preference: 0.2,
            hp: 0.1,
            threat: 0.15,
            isolation: 0.25,
        }
    }
}

/// Keyword sets per canonical category, matched as lowercase substrings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct KeywordConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lowercase_sets"))]
    pub sets: BTreeMap<Category, Vec<String>>,
}

#[cfg(feature = "serde")]
fn lowercase_sets<'de, D>(deserializer: D) -> Result<BTreeMap<Category, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mut sets: BTreeMap<Category, Vec<String>> = serde::Deserialize::deserialize(deserializer)?;
    sets.values_mut()
        .flatten()
        .for_each(|keyword| keyword.make_ascii_lowercase());
    Ok(sets)
}

impl KeywordConfig {
    pub fn keywords(&self, category: Category) -> &[String] {
        self.sets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces the keyword list of one category (stored lowercase).
    pub fn set(&mut self, category: Category, keywords: impl IntoIterator<Item = String>) {
        let keywords = keywords
            .into_iter()
            .map(|k| k.to_ascii_lowercase())
            .collect();
        self.sets.insert(category, keywords);
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let defaults: [(Category, &[&str]); 6] = [
            (Category::Health, &["player_hp", "hp_bar", "health_bar"]),
            (Category::Mana, &["player_mana", "mana_bar", "mp_bar"]),
            (Category::Player, &["player_character", "player_char", "self"]),
            (
                Category::Enemy,
                &["enemy", "enemy_nameplate", "hostile", "mob"],
            ),
            (Category::Loot, &["loot", "corpse", "item_drop", "chest"]),
            (Category::Resource, &["resource", "ore", "herb", "node"]),
        ];

        let sets = defaults
            .into_iter()
            .map(|(category, words)| {
                (category, words.iter().map(|w| (*w).to_owned()).collect())
            })
            .collect();

        Self { sets }
    }
}

/// Combat policy parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub weights: PriorityWeights,
    /// Ordered preference list; earlier entries score higher.
    pub preferred_types: Vec<String>,
    /// Targets farther than this are dropped.
    pub max_target_distance: f64,
    pub min_attack_range: f64,
    pub max_attack_range: f64,
    /// Clustering radius and neighbor radius.
    pub safety_distance: f64,
    /// A cluster needs strictly more members than this to be a danger zone.
    pub density_threshold: usize,
    /// Safe target count at which area skills are considered.
    pub aoe_threshold: usize,
    /// HP percentage at or below which the heal rule fires.
    pub heal_threshold: f64,
    pub stuck_timeout_ms: u64,
    pub auto_loot: bool,
    pub kite_enabled: bool,
    pub avoid_danger_zones: bool,
    pub jump_key: String,
    pub loot_key: String,
    pub keywords: KeywordConfig,
}

impl CombatConfig {
    /// Player movement below this distance counts as standing still.
    pub const STUCK_MOVE_EPSILON: f64 = 5.0;
    /// Danger avoidance triggers inside this multiple of a zone's radius.
    pub const DANGER_RADIUS_FACTOR: f64 = 1.5;
    /// A challenger must beat the current target's score by this factor.
    pub const TARGET_SWITCH_FACTOR: f64 = 1.2;

    pub fn new() -> Self {
        Self {
            weights: PriorityWeights::default(),
            preferred_types: Vec::new(),
            max_target_distance: 800.0,
            min_attack_range: 50.0,
            max_attack_range: 250.0,
            safety_distance: 150.0,
            density_threshold: 2,
            aoe_threshold: 3,
            heal_threshold: 30.0,
            stuck_timeout_ms: 3_000,
            auto_loot: true,
            kite_enabled: true,
            avoid_danger_zones: true,
            jump_key: "space".to_owned(),
            loot_key: "f".to_owned(),
            keywords: KeywordConfig::default(),
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-field weight overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PriorityWeightsPatch {
    pub distance: Option<f64>,
    pub type_preference: Option<f64>,
    pub hp: Option<f64>,
    pub threat: Option<f64>,
    pub isolation: Option<f64>,
}

/// Partial update; `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfigPatch {
    pub weights: Option<PriorityWeightsPatch>,
    pub preferred_types: Option<Vec<String>>,
    pub max_target_distance: Option<f64>,
    pub min_attack_range: Option<f64>,
    pub max_attack_range: Option<f64>,
    pub safety_distance: Option<f64>,
    pub density_threshold: Option<usize>,
    pub aoe_threshold: Option<usize>,
    pub heal_threshold: Option<f64>,
    pub stuck_timeout_ms: Option<u64>,
    pub auto_loot: Option<bool>,
    pub kite_enabled: Option<bool>,
    pub avoid_danger_zones: Option<bool>,
    pub jump_key: Option<String>,
    pub loot_key: Option<String>,
    /// Categories present here replace that category's keyword list.
    pub keywords: Option<BTreeMap<Category, Vec<String>>>,
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl CombatConfigPatch {
    pub fn apply(self, config: &mut CombatConfig) {
        if let Some(weights) = self.weights {
            merge(&mut config.weights.distance, weights.distance);
            merge(&mut config.weights.type_preference, weights.type_preference);
            merge(&mut config.weights.hp, weights.hp);
            merge(&mut config.weights.threat, weights.threat);
            merge(&mut config.weights.isolation, weights.isolation);
        }

        merge(&mut config.preferred_types, self.preferred_types);
        merge(&mut config.max_target_distance, self.max_target_distance);
        merge(&mut config.min_attack_range, self.min_attack_range);
        merge(&mut config.max_attack_range, self.max_attack_range);
        merge(&mut config.safety_distance, self.safety_distance);
        merge(&mut config.density_threshold, self.density_threshold);
        merge(&mut config.aoe_threshold, self.aoe_threshold);
        merge(&mut config.heal_threshold, self.heal_threshold);
        merge(&mut config.stuck_timeout_ms, self.stuck_timeout_ms);
        merge(&mut config.auto_loot, self.auto_loot);
        merge(&mut config.kite_enabled, self.kite_enabled);
        merge(&mut config.avoid_danger_zones, self.avoid_danger_zones);
        merge(&mut config.jump_key, self.jump_key);
        merge(&mut config.loot_key, self.loot_key);

        if let Some(keywords) = self.keywords {
            for (category, words) in keywords {
                config.keywords.set(category, words);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_unspecified_fields() {
        let mut config = CombatConfig::default();
        let patch = CombatConfigPatch {
            heal_threshold: Some(45.0),
            weights: Some(PriorityWeightsPatch {
                isolation: Some(2.0),
                ..Default::default()
            }),
            ..Default::default()
        };

        patch.apply(&mut config);

        assert_eq!(config.heal_threshold, 45.0);
        assert_eq!(config.weights.isolation, 2.0);
        assert_eq!(config.weights.distance, PriorityWeights::default().distance);
        assert_eq!(config.safety_distance, 150.0);
        assert!(config.avoid_danger_zones);
    }

    #[test]
    fn test_patch_replaces_keyword_category_only() {
        let mut config = CombatConfig::default();
        let mut keywords = BTreeMap::new();
        keywords.insert(Category::Enemy, vec!["Goblin".to_owned()]);

        CombatConfigPatch {
            keywords: Some(keywords),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.keywords.keywords(Category::Enemy), ["goblin"]);
        assert!(!config.keywords.keywords(Category::Loot).is_empty());
    }

    #[test]
    fn test_weights_are_not_normalized() {
        let mut config = CombatConfig::default();
        CombatConfigPatch {
            weights: Some(PriorityWeightsPatch {
                distance: Some(10.0),
                ..Default::default()
            }),
            ..Default::default()
        }
        .apply(&mut config);

        assert!(config.weights.sum() > 10.0);
    }

    #[test]
    fn test_empty_patch() {
        assert!(CombatConfigPatch::default().is_empty());
    }
}
