//! Perception input types.
//!
//! A [`Detection`] is one entity perceived in a single frame. Detections are
//! produced fresh every tick by the perception boundary and are never mutated
//! by the core; ids are only meaningful within the frame that produced them.

use crate::geometry::{Point, Size};

/// Frame-local detection identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DetectionId(pub u64);

/// Coordinate space a detection's box is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CoordinateSpace {
    /// Percentage of the frame (0-100 on both axes).
    #[default]
    Percent,
    /// Raw source pixels.
    Pixel,
}

/// Axis-aligned box, top-left anchored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One perceived entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    pub id: DetectionId,
    /// Free-text type label from the detector, e.g. `enemy_nameplate`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(rename = "box"))]
    pub bbox: BoundingBox,
    #[cfg_attr(feature = "serde", serde(default))]
    pub space: CoordinateSpace,
    /// Detector confidence in `[0, 100]`.
    pub confidence: f64,
    /// Precomputed center in the detection's own space.
    #[cfg_attr(feature = "serde", serde(default))]
    pub center: Option<Point>,
    /// Raw pixel width, when the detector reports it (used for vitals bars).
    #[cfg_attr(feature = "serde", serde(default))]
    pub raw_width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub raw_height: Option<f64>,
}

impl Detection {
    /// Creates a percentage-space detection with full confidence.
    pub fn new(id: u64, kind: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            id: DetectionId(id),
            kind: kind.into(),
            bbox,
            space: CoordinateSpace::Percent,
            confidence: 100.0,
            center: None,
            raw_width: None,
            raw_height: None,
        }
    }

    /// Creates a pixel-space detection centered on `center` with a square box.
    pub fn at_pixel(id: u64, kind: impl Into<String>, center: Point, extent: f64) -> Self {
        Self {
            space: CoordinateSpace::Pixel,
            center: Some(center),
            ..Self::new(
                id,
                kind,
                BoundingBox::new(
                    center.x - extent / 2.0,
                    center.y - extent / 2.0,
                    extent,
                    extent,
                ),
            )
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_raw_width(mut self, raw_width: f64) -> Self {
        self.raw_width = Some(raw_width);
        self
    }

    /// Center in the detection's declared space; the precomputed center wins.
    pub fn local_center(&self) -> Point {
        self.center.unwrap_or_else(|| self.bbox.center())
    }

    /// Case-insensitive substring test against the type label.
    pub fn kind_contains(&self, needle: &str) -> bool {
        self.kind.to_ascii_lowercase().contains(needle)
    }
}

/// One tick's worth of perception output.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerceptionFrame {
    /// Capture time in milliseconds. The runtime supplies a clock reading
    /// when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp_ms: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub detections: Vec<Detection>,
    /// Player HP estimate from an out-of-band reading, in `[0, 100]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub player_hp: Option<f64>,
    /// Player (or screen-center) position, normalized to `[0, 1]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub player_position: Option<Point>,
    /// Intrinsic source size, when the stream reports it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<Size>,
}

impl PerceptionFrame {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            ..Self::default()
        }
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn with_player_position(mut self, normalized: Point) -> Self {
        self.player_position = Some(normalized);
        self
    }

    pub fn with_player_hp(mut self, hp: f64) -> Self {
        self.player_hp = Some(hp);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_center_prefers_precomputed() {
        let mut det = Detection::new(1, "enemy", BoundingBox::new(10.0, 10.0, 10.0, 10.0));
        assert_eq!(det.local_center(), Point::new(15.0, 15.0));

        det.center = Some(Point::new(1.0, 2.0));
        assert_eq!(det.local_center(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_kind_contains_ignores_case() {
        let det = Detection::new(1, "Elite_Boss", BoundingBox::default());
        assert!(det.kind_contains("boss"));
        assert!(!det.kind_contains("minion"));
    }
}
