//! The five prioritization terms.
//!
//! Every term lies in `[0, 1]`, so a weighted sum lies in
//! `[0, PriorityWeights::sum()]`.
//!
//! | Term | Value |
//! |---|---|
//! | distance | `1 - min(d / max, 1)` |
//! | type | `1 - index / len` for a preferred type, else `0.1` |
//! | hp | `0.5` (per-enemy HP is not observable) |
//! | threat | `1.0` elite/boss, `0.3` add/minion, else `0.5` |
//! | isolation | `1.0` alone, `0.5` up to the density threshold, else `0.1` |

use crate::config::PriorityWeights;

pub const UNPREFERRED_TYPE_SCORE: f64 = 0.1;
pub const NEUTRAL_HP_SCORE: f64 = 0.5;

pub fn distance_score(distance: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 {
        return 0.0;
    }
    1.0 - (distance / max_distance).min(1.0)
}

pub fn type_score(kind: &str, preferred: &[String]) -> f64 {
    match preferred.iter().position(|p| p == kind) {
        Some(index) => 1.0 - index as f64 / preferred.len() as f64,
        None => UNPREFERRED_TYPE_SCORE,
    }
}

pub fn is_elite(kind: &str) -> bool {
    let kind = kind.to_ascii_lowercase();
    kind.contains("elite") || kind.contains("boss")
}

pub fn threat_score(kind: &str) -> f64 {
    let lower = kind.to_ascii_lowercase();
    if lower.contains("elite") || lower.contains("boss") {
        1.0
    } else if lower.contains("add") || lower.contains("minion") {
        0.3
    } else {
        0.5
    }
}

pub fn isolation_score(neighbor_count: usize, density_threshold: usize) -> f64 {
    if neighbor_count <= 1 {
        1.0
    } else if neighbor_count <= density_threshold {
        0.5
    } else {
        0.1
    }
}

/// Per-term breakdown kept for debugging and overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTerms {
    pub distance: f64,
    pub type_preference: f64,
    pub hp: f64,
    pub threat: f64,
    pub isolation: f64,
}

impl ScoreTerms {
    pub fn weighted(&self, weights: &PriorityWeights) -> f64 {
        self.distance * weights.distance
            + self.type_preference * weights.type_preference
            + self.hp * weights.hp
            + self.threat * weights.threat
            + self.isolation * weights.isolation
    }
}
