//! Danger-zone detection: greedy single-pass clustering of enemies.
//!
//! Enemies are visited in input order. Each unassigned enemy seeds a cluster
//! made of every unassigned enemy (itself included) within `safety_distance`
//! of it. A cluster with more than `density_threshold` members becomes a
//! [`DangerZone`] and all of its members are marked assigned, so they never
//! seed another cluster. Seed order decides membership when clusters could
//! overlap; the result is an approximation, not an optimal clustering.
//!
//! Enemies must already be in frame space (see
//! [`CoordinateMapper::normalize_detection`](crate::coords::CoordinateMapper::normalize_detection)).

use crate::detection::{Detection, DetectionId};
use crate::geometry::Point;

/// A dense enemy cluster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DangerZone {
    /// Centroid of the members.
    pub center: Point,
    /// The configured safety distance.
    pub radius: f64,
    pub member_count: usize,
    pub members: Vec<DetectionId>,
}

impl DangerZone {
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius
    }

    pub fn has_member(&self, id: DetectionId) -> bool {
        self.members.contains(&id)
    }
}

/// Clusters `enemies` into danger zones. Members of an emitted zone are
/// excluded from later clusters, so zones never share members.
pub fn detect_zones(
    enemies: &[Detection],
    safety_distance: f64,
    density_threshold: usize,
) -> Vec<DangerZone> {
    let centers: Vec<Point> = enemies.iter().map(Detection::local_center).collect();
    let mut assigned = vec![false; enemies.len()];
    let mut zones = Vec::new();

    for (seed, &seed_center) in centers.iter().enumerate() {
        if assigned[seed] {
            continue;
        }

        let cluster: Vec<usize> = centers
            .iter()
            .enumerate()
            .filter(|&(index, &center)| {
                !assigned[index] && seed_center.distance(center) <= safety_distance
            })
            .map(|(index, _)| index)
            .collect();

        if cluster.len() <= density_threshold {
            continue;
        }

        for &member in &cluster {
            assigned[member] = true;
        }

        let Some(center) = Point::centroid(cluster.iter().map(|&i| centers[i])) else {
            continue;
        };

        tracing::debug!(
            x = center.x,
            y = center.y,
            members = cluster.len(),
            "danger zone detected"
        );

        zones.push(DangerZone {
            center,
            radius: safety_distance,
            member_count: cluster.len(),
            members: cluster.iter().map(|&i| enemies[i].id).collect(),
        });
    }

    zones
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(id: u64, x: f64, y: f64) -> Detection {
        Detection::at_pixel(id, "enemy", Point::new(x, y), 20.0)
    }

    #[test]
    fn test_tight_group_forms_one_zone() {
        let enemies = [
            enemy(1, 100.0, 100.0),
            enemy(2, 150.0, 100.0),
            enemy(3, 100.0, 150.0),
            enemy(4, 150.0, 150.0),
        ];

        let zones = detect_zones(&enemies, 150.0, 2);

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].member_count, 4);
        assert_eq!(zones[0].center, Point::new(125.0, 125.0));
        assert_eq!(zones[0].radius, 150.0);
    }

    #[test]
    fn test_below_threshold_yields_nothing() {
        let enemies = [enemy(1, 0.0, 0.0), enemy(2, 10.0, 0.0)];
        assert!(detect_zones(&enemies, 150.0, 2).is_empty());
    }

    #[test]
    fn test_lone_enemy_only_forms_zone_at_zero_threshold() {
        assert_eq!(detect_zones(&[enemy(1, 0.0, 0.0)], 150.0, 0).len(), 1);
        assert!(detect_zones(&[enemy(1, 0.0, 0.0)], 150.0, 1).is_empty());
    }

    #[test]
    fn test_zero_threshold_flags_everything() {
        let enemies = [enemy(1, 0.0, 0.0), enemy(2, 10.0, 0.0), enemy(3, 1000.0, 0.0)];
        let zones = detect_zones(&enemies, 50.0, 0);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].member_count, 2);
        assert_eq!(zones[1].member_count, 1);
    }

    #[test]
    fn test_seed_order_decides_membership() {
        // B sits between A and C; A seeds first and claims B.
        let enemies = [
            enemy(1, 0.0, 0.0),
            enemy(2, 100.0, 0.0),
            enemy(3, 200.0, 0.0),
            enemy(4, 300.0, 0.0),
        ];
        let zones = detect_zones(&enemies, 100.0, 1);

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].members, vec![DetectionId(1), DetectionId(2)]);
        assert_eq!(zones[1].members, vec![DetectionId(3), DetectionId(4)]);
    }

    #[test]
    fn test_every_zone_exceeds_threshold() {
        let enemies: Vec<_> = (0..12)
            .map(|i| enemy(i, (i % 4) as f64 * 60.0, (i / 4) as f64 * 60.0))
            .collect();
        for threshold in 0..6 {
            for zone in detect_zones(&enemies, 90.0, threshold) {
                assert!(zone.member_count > threshold);
            }
        }
    }
}
