use crate::detection::Detection;

/// Player HP and mana as percentages.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hp: f64,
    pub mana: f64,
}

impl Vitals {
    /// Assumed on-screen width of a full vitals bar, in pixels.
    pub const MAX_BAR_WIDTH: f64 = 200.0;

    /// Reads a bar detection as a percentage in `[0, 100]`.
    ///
    /// A raw pixel width is interpreted against [`Self::MAX_BAR_WIDTH`];
    /// otherwise the box width is taken as a percentage directly.
    pub fn read_bar(detection: &Detection) -> f64 {
        let value = match detection.raw_width {
            Some(raw) => raw / Self::MAX_BAR_WIDTH * 100.0,
            None => detection.bbox.width,
        };
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, 100.0)
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hp: 100.0,
            mana: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;

    #[test]
    fn test_raw_width_is_fraction_of_bar() {
        let bar = Detection::new(1, "hp_bar", BoundingBox::default()).with_raw_width(50.0);
        assert_eq!(Vitals::read_bar(&bar), 25.0);
    }

    #[test]
    fn test_readings_are_clamped() {
        let bar = Detection::new(1, "hp_bar", BoundingBox::default()).with_raw_width(900.0);
        assert_eq!(Vitals::read_bar(&bar), 100.0);

        let bar = Detection::new(2, "hp_bar", BoundingBox::new(0.0, 0.0, 130.0, 2.0));
        assert_eq!(Vitals::read_bar(&bar), 100.0);
    }
}
