use std::cmp::Ordering;

use crate::config::CombatConfig;
use crate::danger::DangerZone;
use crate::detection::{Detection, DetectionId};
use crate::geometry::Point;

use super::terms::{self, ScoreTerms};

/// Display-only threat label.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    /// Targets farther than this fraction of the max distance are `Low`.
    pub const FAR_FRACTION: f64 = 0.7;

    pub fn classify(kind: &str, distance: f64, max_distance: f64) -> Self {
        if terms::is_elite(kind) {
            ThreatLevel::High
        } else if distance > max_distance * Self::FAR_FRACTION {
            ThreatLevel::Low
        } else {
            ThreatLevel::Medium
        }
    }
}

/// An enemy annotated with this tick's decision data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrioritizedTarget {
    pub detection: Detection,
    /// Center in frame space.
    pub position: Point,
    pub score: f64,
    pub terms: ScoreTerms,
    /// Distance to the evaluation origin.
    pub distance: f64,
    pub threat: ThreatLevel,
    /// Other enemies within the safety distance.
    pub neighbor_count: usize,
    pub in_danger_zone: bool,
    /// `neighbor_count <= 1`.
    pub is_isolated: bool,
}

impl PrioritizedTarget {
    pub fn id(&self) -> DetectionId {
        self.detection.id
    }
}

/// Scores every enemy, drops those beyond `max_target_distance`, and sorts
/// descending by score. The sort is stable, so equal scores keep input order.
pub fn prioritize(
    enemies: &[Detection],
    origin: Point,
    zones: &[DangerZone],
    config: &CombatConfig,
) -> Vec<PrioritizedTarget> {
    let centers: Vec<Point> = enemies.iter().map(Detection::local_center).collect();

    let mut targets: Vec<PrioritizedTarget> = enemies
        .iter()
        .zip(&centers)
        .enumerate()
        .filter_map(|(index, (detection, &position))| {
            let distance = origin.distance(position);
            if distance > config.max_target_distance {
                return None;
            }

            let neighbor_count = centers
                .iter()
                .enumerate()
                .filter(|&(other, &center)| {
                    other != index && position.distance(center) <= config.safety_distance
                })
                .count();

            let terms = ScoreTerms {
                distance: terms::distance_score(distance, config.max_target_distance),
                type_preference: terms::type_score(&detection.kind, &config.preferred_types),
                hp: terms::NEUTRAL_HP_SCORE,
                threat: terms::threat_score(&detection.kind),
                isolation: terms::isolation_score(neighbor_count, config.density_threshold),
            };

            let in_danger_zone = zones
                .iter()
                .any(|zone| zone.has_member(detection.id) || zone.contains(position));

            Some(PrioritizedTarget {
                detection: detection.clone(),
                position,
                score: terms.weighted(&config.weights),
                terms,
                distance,
                threat: ThreatLevel::classify(
                    &detection.kind,
                    distance,
                    config.max_target_distance,
                ),
                neighbor_count,
                in_danger_zone,
                is_isolated: neighbor_count <= 1,
            })
        })
        .collect();

    targets.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    for target in &targets {
        tracing::debug!(
            id = target.id().0,
            kind = %target.detection.kind,
            score = target.score,
            distance = target.distance,
            neighbors = target.neighbor_count,
            danger = target.in_danger_zone,
            "target scored"
        );
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::danger::detect_zones;

    fn enemy(id: u64, kind: &str, x: f64, y: f64) -> Detection {
        Detection::at_pixel(id, kind, Point::new(x, y), 20.0)
    }

    #[test]
    fn test_sorted_descending_and_filtered() {
        let config = CombatConfig {
            max_target_distance: 500.0,
            ..CombatConfig::default()
        };
        let enemies = [
            enemy(1, "enemy", 400.0, 0.0),
            enemy(2, "enemy", 50.0, 0.0),
            enemy(3, "enemy", 900.0, 0.0),
        ];

        let targets = prioritize(&enemies, Point::ORIGIN, &[], &config);

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id(), DetectionId(2));
        assert_eq!(targets[1].id(), DetectionId(1));
        assert!(targets[0].score >= targets[1].score);
    }

    #[test]
    fn test_isolation_flag_tracks_neighbor_count() {
        let config = CombatConfig::default();
        let enemies = [
            enemy(1, "enemy", 0.0, 0.0),
            enemy(2, "enemy", 100.0, 0.0),
            enemy(3, "enemy", 200.0, 0.0),
            enemy(4, "enemy", 700.0, 0.0),
        ];

        let targets = prioritize(&enemies, Point::ORIGIN, &[], &config);

        for target in &targets {
            assert_eq!(target.is_isolated, target.neighbor_count <= 1);
        }
        let middle = targets.iter().find(|t| t.id() == DetectionId(2)).unwrap();
        assert_eq!(middle.neighbor_count, 2);
        assert!(!middle.is_isolated);
    }

    #[test]
    fn test_scores_within_weight_bounds() {
        let config = CombatConfig {
            preferred_types: vec!["elite_enemy".to_owned()],
            ..CombatConfig::default()
        };
        let enemies: Vec<_> = (0..20)
            .map(|i| {
                let kind = if i % 3 == 0 { "elite_enemy" } else { "enemy_minion" };
                enemy(i, kind, (i * 37 % 700) as f64, (i * 53 % 400) as f64)
            })
            .collect();
        let zones = detect_zones(&enemies, config.safety_distance, config.density_threshold);

        for target in prioritize(&enemies, Point::new(10.0, 10.0), &zones, &config) {
            assert!(target.score >= 0.0);
            assert!(target.score <= config.weights.sum() + 1e-9);
        }
    }

    #[test]
    fn test_cluster_members_are_in_danger() {
        let config = CombatConfig {
            safety_distance: 150.0,
            density_threshold: 2,
            ..CombatConfig::default()
        };
        let enemies = [
            enemy(1, "enemy", 500.0, 500.0),
            enemy(2, "enemy", 560.0, 500.0),
            enemy(3, "enemy", 500.0, 560.0),
            enemy(4, "enemy", 560.0, 560.0),
        ];
        let zones = detect_zones(&enemies, config.safety_distance, config.density_threshold);
        let targets = prioritize(&enemies, Point::new(400.0, 400.0), &zones, &config);

        assert_eq!(zones.len(), 1);
        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|t| t.in_danger_zone));
        assert!(targets.iter().all(|t| t.terms.isolation == 0.1));
    }

    #[test]
    fn test_threat_labels() {
        assert_eq!(ThreatLevel::classify("boss", 900.0, 100.0), ThreatLevel::High);
        assert_eq!(ThreatLevel::classify("enemy", 71.0, 100.0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::classify("enemy", 70.0, 100.0), ThreatLevel::Medium);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let config = CombatConfig::default();
        let enemies = [
            enemy(7, "enemy", 0.0, 100.0),
            enemy(3, "enemy", 100.0, 0.0),
        ];
        let targets = prioritize(&enemies, Point::ORIGIN, &[], &config);
        assert_eq!(targets[0].id(), DetectionId(7));
        assert_eq!(targets[1].id(), DetectionId(3));
    }
}
