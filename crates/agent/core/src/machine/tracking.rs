//! Cross-tick bookkeeping: player position history and enemy id tracking.

use std::collections::BTreeSet;

use crate::detection::DetectionId;
use crate::geometry::Point;

/// Last known player position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerPosition {
    pub point: Point,
    pub timestamp_ms: u64,
}

/// Tracks player movement for stuck detection.
///
/// The anchor is the position where the player last moved at least
/// `epsilon`; the player counts as stuck once it has stayed near the anchor
/// for longer than the timeout.
#[derive(Clone, Debug, Default)]
pub struct PositionTracker {
    last: Option<PlayerPosition>,
    anchor: Option<PlayerPosition>,
}

impl PositionTracker {
    pub fn last(&self) -> Option<PlayerPosition> {
        self.last
    }

    pub fn observe(&mut self, point: Point, now_ms: u64, epsilon: f64) {
        let sample = PlayerPosition {
            point,
            timestamp_ms: now_ms,
        };

        let moved = self
            .anchor
            .is_none_or(|anchor| anchor.point.distance(point) >= epsilon);
        if moved {
            self.anchor = Some(sample);
        }
        self.last = Some(sample);
    }

    /// True when the player has not moved for longer than `timeout_ms`.
    /// Never true before the first observation.
    pub fn is_stuck(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.anchor
            .is_some_and(|anchor| now_ms.saturating_sub(anchor.timestamp_ms) > timeout_ms)
    }

    /// Restarts the stationary timer without moving the anchor.
    pub fn restart_timer(&mut self, now_ms: u64) {
        if let Some(anchor) = self.anchor.as_mut() {
            anchor.timestamp_ms = now_ms;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Counts enemy ids present last tick and absent this tick.
#[derive(Clone, Debug, Default)]
pub struct KillTracker {
    previous: BTreeSet<DetectionId>,
}

impl KillTracker {
    /// Records this tick's ids and returns how many disappeared.
    pub fn observe(&mut self, current: impl IntoIterator<Item = DetectionId>) -> usize {
        let current: BTreeSet<DetectionId> = current.into_iter().collect();
        let vanished = self.previous.difference(&current).count();
        self.previous = current;
        vanished
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }
}
