//! Planar geometry shared by every stage of the tick pipeline.

/// A point in frame space (source pixels) or normalized space, depending on
/// the producer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Reflects `from` through `self`: the point on the far side of `self`
    /// at the same offset. Used for escape and kite vectors.
    ///
    /// When `from` coincides with `self` the direction is undefined; the +x
    /// axis is used with the given fallback magnitude.
    pub fn reflect_away_from(self, from: Point, fallback: f64) -> Point {
        let dx = self.x - from.x;
        let dy = self.y - from.y;
        if dx == 0.0 && dy == 0.0 {
            return Point::new(self.x + fallback, self.y);
        }
        Point::new(self.x + dx, self.y + dy)
    }

    /// Arithmetic mean of a point set, or `None` when empty.
    pub fn centroid<I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = Point>,
    {
        let (sum, count) = points
            .into_iter()
            .fold((Point::ORIGIN, 0usize), |(acc, n), p| {
                (Point::new(acc.x + p.x, acc.y + p.y), n + 1)
            });

        (count > 0).then(|| Point::new(sum.x / count as f64, sum.y / count as f64))
    }
}

/// Width/height pair for frames and display containers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}
