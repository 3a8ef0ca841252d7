// THEORY:
// A `ColorRange` is the fixed, configuration-time definition of one target
// color: an inclusive lower/upper box in 8-bit HSV space. A `TrackedColor`
// pairs that range with the overlay colors used to draw its detections.
//
// Ranges are immutable for the life of the process. A range whose lower bound
// exceeds its upper bound on some channel is not rejected; it simply matches
// nothing, which yields an empty mask downstream.

use image::Rgb;

/// An inclusive HSV box identifying one target color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRange {
    pub name: String,
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    pub fn new(name: impl Into<String>, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    /// True iff every channel of `hsv` lies within `[lower, upper]`.
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

/// Overlay colors (RGB) used when rendering one tracked color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Outline of the minimum enclosing circle.
    pub circle: Rgb<u8>,
    /// The filled dot marking the centroid.
    pub centroid: Rgb<u8>,
    pub trail: Rgb<u8>,
}

/// A color the pipeline tracks, plus how to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedColor {
    pub range: ColorRange,
    pub palette: Palette,
}

impl TrackedColor {
    pub fn new(range: ColorRange, palette: Palette) -> Self {
        Self { range, palette }
    }

    pub fn name(&self) -> &str {
        &self.range.name
    }

    /// Magenta-ish "red" target.
    pub fn red() -> Self {
        Self::new(
            ColorRange::new("red", [128, 128, 0], [235, 206, 135]),
            Palette {
                circle: Rgb([255, 255, 0]),
                centroid: Rgb([255, 0, 0]),
                trail: Rgb([255, 0, 0]),
            },
        )
    }

    pub fn green() -> Self {
        Self::new(
            ColorRange::new("green", [29, 86, 6], [64, 255, 255]),
            Palette {
                circle: Rgb([0, 255, 0]),
                centroid: Rgb([0, 0, 255]),
                trail: Rgb([0, 0, 255]),
            },
        )
    }

    /// Dark, blue-cast "black" target.
    pub fn black() -> Self {
        Self::new(
            ColorRange::new("black", [102, 0, 0], [255, 178, 102]),
            Palette {
                circle: Rgb([255, 0, 0]),
                centroid: Rgb([0, 255, 0]),
                trail: Rgb([0, 255, 0]),
            },
        )
    }

    /// The three targets the tracker follows out of the box.
    pub fn defaults() -> Vec<Self> {
        vec![Self::red(), Self::green(), Self::black()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::hsv::rgb_to_hsv;

    #[test]
    fn test_bounds_are_inclusive() {
        let range = ColorRange::new("t", [10, 20, 30], [40, 50, 60]);
        assert!(range.contains([10, 20, 30]));
        assert!(range.contains([40, 50, 60]));
        assert!(!range.contains([9, 20, 30]));
        assert!(!range.contains([40, 51, 60]));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = ColorRange::new("inverted", [100, 0, 0], [50, 255, 255]);
        for h in 0..=255u8 {
            assert!(!range.contains([h, 128, 128]));
        }
    }

    #[test]
    fn test_default_targets_do_not_claim_white() {
        let white = rgb_to_hsv(255, 255, 255);
        for color in TrackedColor::defaults() {
            assert!(!color.range.contains(white), "{} matched white", color.name());
        }
    }

    #[test]
    fn test_default_targets_are_mutually_exclusive_on_reference_swatches() {
        let swatches = [
            ("red", rgb_to_hsv(130, 30, 130)),
            ("green", rgb_to_hsv(0, 200, 0)),
            ("black", rgb_to_hsv(40, 50, 80)),
        ];
        for color in TrackedColor::defaults() {
            for (name, hsv) in swatches {
                assert_eq!(color.range.contains(hsv), color.name() == name, "{} vs swatch {}", color.name(), name);
            }
        }
    }
}
