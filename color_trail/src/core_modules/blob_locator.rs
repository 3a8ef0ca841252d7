// THEORY:
// The `BlobLocator` is the spatial stage of the tracker. It looks at one color's
// binary mask and answers a single question: where is the biggest patch of
// that color, and how large is it?
//
// Key architectural principles & algorithm steps:
// 1.  **Outer Contours Only**: Border following (Suzuki-Abe) traces every
//     boundary in the mask. Holes, and regions nested inside holes, are ignored;
//     only outermost outer borders are candidates. The mask is traced inside a
//     one-pixel background frame so regions touching the image edge still have
//     an outer border.
// 2.  **Polygon Moments**: For each candidate, the zeroth and first-order
//     moments (M00, M10, M01) of the contour polygon are computed with Green's
//     theorem. M00 is the enclosed area and ranks the candidates.
// 3.  **Largest Wins**: The candidate with the largest area is selected. Ties
//     keep the first contour in tracing order.
// 4.  **Degenerate Guard**: A contour that encloses no area (a single pixel or a
//     one-pixel-wide line) has M00 = 0 and therefore no defined centroid. Such a
//     region is reported as "no blob", never divided through.
// 5.  **Derived Geometry**: The centroid is (M10/M00, M01/M00) truncated to a
//     pixel; the minimum enclosing circle is computed over the contour points.
//     The size gate (`radius > min_radius`) is recorded on the blob rather than
//     used to discard it.
// 6.  **Stateless Utility**: Like the segmenter, the locator has no memory of
//     previous frames.

use crate::core_modules::blob::{Blob, Point};
use crate::core_modules::color_segmenter::Mask;
use crate::core_modules::enclosing_circle::min_enclosing_circle;

/// Zeroth and first-order spatial moments of a closed contour polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContourMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl ContourMoments {
    /// Moments of the polygon through `points`, orientation-normalized so that
    /// `m00 >= 0`.
    pub fn of_polygon(points: &[Point]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;
        let mut prev = points[n - 1];
        for &curr in points {
            let (xp, yp) = (prev.x as f64, prev.y as f64);
            let (xc, yc) = (curr.x as f64, curr.y as f64);
            let cross = xp * yc - xc * yp;
            a00 += cross;
            a10 += cross * (xp + xc);
            a01 += cross * (yp + yc);
            prev = curr;
        }

        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Self {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// The centroid, or `None` when the polygon encloses no area.
    pub fn centroid(&self) -> Option<Point> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point {
            x: (self.m10 / self.m00) as i32,
            y: (self.m01 / self.m00) as i32,
        })
    }
}

pub mod blob_locator {
    use super::*;
    use image::imageops;
    use imageproc::contours::{BorderType, find_contours};
    use tracing::trace;

    /// Finds the largest outer region in `mask` and derives its geometry.
    ///
    /// Returns `None` when the mask has no foreground or when the largest
    /// region is degenerate (zero enclosed area).
    pub fn locate(mask: &Mask, min_radius: f32) -> Option<Blob> {
        // --- 1. Outer Contours ---
        let contours: Vec<Vec<Point>> = outer_contours(mask);
        if contours.is_empty() {
            trace!("mask has no contours");
            return None;
        }

        // --- 2 & 3. Moments and Largest-Area Selection ---
        let mut best: Option<(Vec<Point>, ContourMoments)> = None;
        for contour in contours {
            let moments = ContourMoments::of_polygon(&contour);
            let is_larger = match &best {
                Some((_, current)) => moments.m00 > current.m00,
                None => true,
            };
            if is_larger {
                best = Some((contour, moments));
            }
        }
        let (contour, moments) = best?;

        // --- 4. Degenerate Guard ---
        let Some(centroid) = moments.centroid() else {
            trace!(points = contour.len(), "largest contour encloses no area");
            return None;
        };

        // --- 5. Derived Geometry ---
        let circle = min_enclosing_circle(&contour)?;
        Some(Blob {
            area: moments.m00,
            centroid,
            meets_min_size: circle.radius > min_radius,
            circle,
            contour,
        })
    }

    /// The outermost outer borders of `mask`, in tracing order.
    pub fn outer_contours(mask: &Mask) -> Vec<Vec<Point>> {
        let mut padded = Mask::new(mask.width() + 2, mask.height() + 2);
        imageops::replace(&mut padded, mask, 1, 1);

        find_contours::<i32>(&padded)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| c.points.into_iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::blob_locator::*;
    use super::*;
    use image::Luma;

    fn mask_with<F: Fn(u32, u32) -> bool>(w: u32, h: u32, f: F) -> Mask {
        Mask::from_fn(w, h, |x, y| Luma([if f(x, y) { 255 } else { 0 }]))
    }

    #[test]
    fn test_empty_mask_has_no_blob() {
        let mask = Mask::new(50, 40);
        assert!(locate(&mask, 10.0).is_none());
    }

    #[test]
    fn test_single_pixel_is_degenerate_not_a_fault() {
        let mask = mask_with(20, 20, |x, y| x == 10 && y == 10);
        assert!(locate(&mask, 0.0).is_none());
    }

    #[test]
    fn test_one_pixel_line_is_degenerate() {
        let mask = mask_with(30, 30, |x, y| y == 15 && (5..25).contains(&x));
        assert!(locate(&mask, 0.0).is_none());
    }

    #[test]
    fn test_rectangle_moments() {
        let square = [Point::new(0, 0), Point::new(10, 0), Point::new(10, 4), Point::new(0, 4)];
        let m = ContourMoments::of_polygon(&square);
        assert!((m.m00 - 40.0).abs() < 1e-9);
        assert_eq!(m.centroid(), Some(Point::new(5, 2)));

        // Reversed orientation gives the same moments.
        let reversed: Vec<Point> = square.iter().rev().copied().collect();
        assert_eq!(ContourMoments::of_polygon(&reversed), m);
    }

    #[test]
    fn test_largest_region_is_selected() {
        let mask = mask_with(100, 60, |x, y| {
            let small = (5..15).contains(&x) && (5..15).contains(&y);
            let large = (40..80).contains(&x) && (20..50).contains(&y);
            small || large
        });
        let blob = locate(&mask, 10.0).unwrap();
        // Pixel-center contour of the 40x30 block spans 39x29.
        assert!((blob.area - 39.0 * 29.0).abs() < 1e-9);
        assert_eq!(blob.centroid, Point::new(59, 34));
        assert!(blob.meets_min_size);
    }

    #[test]
    fn test_region_inside_a_hole_is_ignored() {
        // A thick ring with a small island in its hole.
        let mask = mask_with(80, 80, |x, y| {
            let ring = (10..70).contains(&x) && (10..70).contains(&y) && !((20..60).contains(&x) && (20..60).contains(&y));
            let island = (35..45).contains(&x) && (35..45).contains(&y);
            ring || island
        });
        let outer = outer_contours(&mask);
        assert_eq!(outer.len(), 1);
        let blob = locate(&mask, 10.0).unwrap();
        assert_eq!(blob.centroid, Point::new(39, 39));
    }

    #[test]
    fn test_small_blob_keeps_centroid_but_fails_size_gate() {
        let mask = mask_with(40, 40, |x, y| (10..16).contains(&x) && (10..16).contains(&y));
        let blob = locate(&mask, 10.0).unwrap();
        assert!(!blob.meets_min_size);
        assert!(blob.circle.radius < 10.0);
        assert_eq!(blob.centroid, Point::new(12, 12));
    }

    #[test]
    fn test_regions_touching_the_border_are_located() {
        // 10x10 squares flush against each edge in turn, plus the top-left corner.
        let cases: [(u32, u32, Point); 5] = [
            (0, 25, Point::new(4, 29)),
            (50, 25, Point::new(54, 29)),
            (25, 0, Point::new(29, 4)),
            (25, 50, Point::new(29, 54)),
            (0, 0, Point::new(4, 4)),
        ];
        for (left, top, expected) in cases {
            let mask = mask_with(60, 60, |x, y| (left..left + 10).contains(&x) && (top..top + 10).contains(&y));
            let outer = outer_contours(&mask);
            assert_eq!(outer.len(), 1, "square at ({}, {})", left, top);
            assert!(outer[0].iter().all(|p| p.x >= 0 && p.y >= 0 && p.x < 60 && p.y < 60));

            let blob = locate(&mask, 0.0).unwrap();
            assert!((blob.area - 81.0).abs() < 1e-9, "square at ({}, {})", left, top);
            assert_eq!(blob.centroid, expected);
        }
    }

    #[test]
    fn test_full_mask_is_one_blob() {
        let mask = mask_with(50, 40, |_, _| true);
        let blob = locate(&mask, 10.0).unwrap();
        assert!((blob.area - 49.0 * 39.0).abs() < 1e-9);
        assert_eq!(blob.centroid, Point::new(24, 19));
        assert!(blob.meets_min_size);
    }

    #[test]
    fn test_locate_is_deterministic() {
        let mask = mask_with(64, 64, |x, y| {
            let dx = x as i32 - 30;
            let dy = y as i32 - 33;
            dx * dx + dy * dy <= 15 * 15
        });
        assert_eq!(locate(&mask, 10.0), locate(&mask, 10.0));
    }
}
