// THEORY:
// The `blob` module holds the per-frame result of the spatial analysis stage.
// A `Blob` is the single largest foreground region the locator found in one
// color's mask, summarized by its outer contour, its area, its centroid and
// its minimum enclosing circle.
//
// Key architectural principles:
// 1.  **Stateless Data Container**: A `Blob` is a "dumb" snapshot of one frame.
//     It has no memory of where the same color was in earlier frames; that
//     history lives in the `TrailBuffer`.
// 2.  **Derived, Not Stored Twice**: Everything on a `Blob` is derived from the
//     contour in one pass by the locator. Nothing on it is mutated afterwards.
// 3.  **Size Gate Travels With the Data**: The locator computes the centroid
//     for every blob, but records whether the blob clears the minimum radius.
//     Downstream stages (drawing, trail) consult `meets_min_size` instead of
//     re-deriving the threshold.

/// An integer pixel coordinate in frame space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<imageproc::point::Point<i32>> for Point {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// The smallest circle covering every point of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnclosingCircle {
    /// Circle center in sub-pixel frame coordinates.
    pub center: (f32, f32),
    pub radius: f32,
}

/// The largest outer region of a color mask in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// Ordered outer boundary points, as produced by border following.
    pub contour: Vec<Point>,
    /// The enclosed area of the contour polygon (moment M00).
    pub area: f64,
    /// M10/M00, M01/M00 truncated toward zero.
    pub centroid: Point,
    pub circle: EnclosingCircle,
    /// `true` when the enclosing radius is strictly above the configured minimum.
    /// Only such blobs are drawn and fed into the trail.
    pub meets_min_size: bool,
}
