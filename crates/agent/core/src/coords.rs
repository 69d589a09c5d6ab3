//! Coordinate mapping between detection space, the display viewport, frame
//! pixels and the normalized `[0, 1]` space used for actuation.
//!
//! # Letterboxing
//!
//! The video source is fitted into its display container preserving aspect
//! ratio:
//!
//! ```text
//! source wider than container  -> width pinned, bars top/bottom (offset_y)
//! otherwise                    -> height pinned, bars left/right (offset_x)
//! ```
//!
//! Until the stream reports its intrinsic size the mapper falls back to a
//! 1920x1080 source at 1:1 scale instead of failing.

use crate::detection::{BoundingBox, CoordinateSpace, Detection};
use crate::geometry::{Point, Size};

/// Letterbox-adjusted placement of the source inside its container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMapping {
    pub display_width: f64,
    pub display_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// `display_width / source_width`.
    pub scale: f64,
}

impl ViewportMapping {
    pub const DEFAULT_WIDTH: f64 = 1920.0;
    pub const DEFAULT_HEIGHT: f64 = 1080.0;

    /// Stable mapping used while the source size is unknown.
    pub const fn fallback() -> Self {
        Self {
            display_width: Self::DEFAULT_WIDTH,
            display_height: Self::DEFAULT_HEIGHT,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }

    /// Computes the mapping for a source of `source` size shown in `container`.
    pub fn compute(source: Size, container: Size) -> Self {
        if source.is_degenerate() || container.is_degenerate() {
            return Self::fallback();
        }

        let source_aspect = source.aspect();
        let container_aspect = container.aspect();

        let (display_width, display_height, offset_x, offset_y) =
            if source_aspect > container_aspect {
                let height = container.width / source_aspect;
                (
                    container.width,
                    height,
                    0.0,
                    (container.height - height) / 2.0,
                )
            } else {
                let width = container.height * source_aspect;
                (
                    width,
                    container.height,
                    (container.width - width) / 2.0,
                    0.0,
                )
            };

        Self {
            display_width,
            display_height,
            offset_x,
            offset_y,
            scale: display_width / source.width,
        }
    }

    /// Box center (percentage space) to viewport pixels.
    pub fn detection_to_viewport(&self, bbox: &BoundingBox) -> Point {
        let center = bbox.center();
        Point::new(
            center.x / 100.0 * self.display_width + self.offset_x,
            center.y / 100.0 * self.display_height + self.offset_y,
        )
    }

    /// Viewport pixels to `[0, 1]` over the full container extent.
    pub fn viewport_to_normalized(&self, point: Point) -> Point {
        Point::new(
            point.x / (self.display_width + 2.0 * self.offset_x),
            point.y / (self.display_height + 2.0 * self.offset_y),
        )
    }

    pub fn detection_to_normalized(&self, bbox: &BoundingBox) -> Point {
        self.viewport_to_normalized(self.detection_to_viewport(bbox))
    }
}

impl Default for ViewportMapping {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Maps detections into frame space and frame points into normalized space.
///
/// Frame space is source pixels; every distance computed by the decision core
/// is measured there.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateMapper {
    source: Option<Size>,
    container: Option<Size>,
    viewport: ViewportMapping,
}

impl CoordinateMapper {
    pub fn new(source: Option<Size>, container: Option<Size>) -> Self {
        let mut mapper = Self {
            source: None,
            container,
            viewport: ViewportMapping::fallback(),
        };
        mapper.set_source(source);
        mapper
    }

    /// Updates the intrinsic source size (e.g. once the stream is ready).
    pub fn set_source(&mut self, source: Option<Size>) {
        self.source = source.filter(|s| !s.is_degenerate());
        self.recompute();
    }

    pub fn set_container(&mut self, container: Option<Size>) {
        self.container = container.filter(|c| !c.is_degenerate());
        self.recompute();
    }

    fn recompute(&mut self) {
        let source = self.frame_size();
        let container = self.container.unwrap_or(source);
        self.viewport = ViewportMapping::compute(source, container);
    }

    /// Effective source size, falling back to 1920x1080.
    pub fn frame_size(&self) -> Size {
        self.source.unwrap_or(Size::new(
            ViewportMapping::DEFAULT_WIDTH,
            ViewportMapping::DEFAULT_HEIGHT,
        ))
    }

    pub fn viewport(&self) -> &ViewportMapping {
        &self.viewport
    }

    /// Resolves a detection's center into frame space.
    pub fn to_frame(&self, detection: &Detection) -> Point {
        let center = detection.local_center();
        match detection.space {
            CoordinateSpace::Pixel => center,
            CoordinateSpace::Percent => {
                let frame = self.frame_size();
                Point::new(
                    center.x / 100.0 * frame.width,
                    center.y / 100.0 * frame.height,
                )
            }
        }
    }

    /// Returns a frame-space copy of `detection` (pixel box, resolved center).
    pub fn normalize_detection(&self, detection: &Detection) -> Detection {
        let center = self.to_frame(detection);
        let bbox = match detection.space {
            CoordinateSpace::Pixel => detection.bbox,
            CoordinateSpace::Percent => {
                let frame = self.frame_size();
                BoundingBox::new(
                    detection.bbox.x / 100.0 * frame.width,
                    detection.bbox.y / 100.0 * frame.height,
                    detection.bbox.width / 100.0 * frame.width,
                    detection.bbox.height / 100.0 * frame.height,
                )
            }
        };

        Detection {
            bbox,
            space: CoordinateSpace::Pixel,
            center: Some(center),
            ..detection.clone()
        }
    }

    /// Frame pixels to `[0, 1]`, clamped so commands never leave the screen.
    pub fn frame_to_normalized(&self, point: Point) -> Point {
        let frame = self.frame_size();
        Point::new(
            (point.x / frame.width).clamp(0.0, 1.0),
            (point.y / frame.height).clamp(0.0, 1.0),
        )
    }

    pub fn normalized_to_frame(&self, point: Point) -> Point {
        let frame = self.frame_size();
        Point::new(point.x * frame.width, point.y * frame.height)
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_missing_source_uses_fallback() {
        let mapping = ViewportMapping::compute(Size::new(0.0, 0.0), Size::new(800.0, 600.0));
        assert_eq!(mapping, ViewportMapping::fallback());
        assert_eq!(mapping.scale, 1.0);
    }

    #[test]
    fn test_wide_source_letterboxes_vertically() {
        // 16:9 into 4:3 -> width pinned
        let mapping =
            ViewportMapping::compute(Size::new(1920.0, 1080.0), Size::new(800.0, 600.0));
        assert_eq!(mapping.display_width, 800.0);
        assert_eq!(mapping.display_height, 450.0);
        assert_eq!(mapping.offset_x, 0.0);
        assert_eq!(mapping.offset_y, 75.0);
        assert!((mapping.scale - 800.0 / 1920.0).abs() < EPS);
    }

    #[test]
    fn test_tall_source_pillarboxes_horizontally() {
        let mapping =
            ViewportMapping::compute(Size::new(1080.0, 1080.0), Size::new(1600.0, 900.0));
        assert_eq!(mapping.display_height, 900.0);
        assert_eq!(mapping.display_width, 900.0);
        assert_eq!(mapping.offset_x, 350.0);
        assert_eq!(mapping.offset_y, 0.0);
    }

    #[test]
    fn test_detection_viewport_normalized_round_trip() {
        let mapping =
            ViewportMapping::compute(Size::new(1920.0, 1080.0), Size::new(800.0, 600.0));
        let bbox = BoundingBox::new(20.0, 40.0, 10.0, 10.0);

        let viewport = mapping.detection_to_viewport(&bbox);
        let normalized = mapping.viewport_to_normalized(viewport);
        let back = Point::new(
            normalized.x * (mapping.display_width + 2.0 * mapping.offset_x),
            normalized.y * (mapping.display_height + 2.0 * mapping.offset_y),
        );

        assert!(approx(back, viewport));
        assert!(approx(mapping.detection_to_normalized(&bbox), normalized));
    }

    #[test]
    fn test_percent_detection_to_frame() {
        let mapper = CoordinateMapper::new(Some(Size::new(1000.0, 500.0)), None);
        let det = Detection::new(1, "enemy", BoundingBox::new(40.0, 40.0, 20.0, 20.0));
        assert!(approx(mapper.to_frame(&det), Point::new(500.0, 250.0)));

        let normalized = mapper.normalize_detection(&det);
        assert_eq!(normalized.space, CoordinateSpace::Pixel);
        assert_eq!(normalized.bbox, BoundingBox::new(400.0, 200.0, 200.0, 100.0));
        assert_eq!(normalized.id, det.id);
    }

    #[test]
    fn test_frame_to_normalized_clamps() {
        let mapper = CoordinateMapper::default();
        assert_eq!(
            mapper.frame_to_normalized(Point::new(960.0, 540.0)),
            Point::new(0.5, 0.5)
        );
        assert_eq!(
            mapper.frame_to_normalized(Point::new(-50.0, 5000.0)),
            Point::new(0.0, 1.0)
        );
    }
}
