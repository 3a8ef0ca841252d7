// THEORY:
// Smallest circle covering a point set (Welzl's incremental algorithm).
//
// The circle is grown point by point: whenever a point falls outside the
// current circle, that point must lie on the boundary of the answer for the
// prefix seen so far, so the circle is rebuilt with it pinned, then with two
// points pinned, then three. Processing the points in a random order gives
// expected linear time; contour points arrive in boundary order, which is close
// to the worst case, so they are visited in a fixed pseudo-random permutation.
// The permutation is seeded identically on every call, keeping results
// deterministic for identical input.

use crate::core_modules::blob::{EnclosingCircle, Point};

const CONTAINMENT_EPSILON: f64 = 1e-7;
const SHUFFLE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy)]
struct Circle {
    x: f64,
    y: f64,
    radius: f64,
}

impl Circle {
    fn at(p: (f64, f64)) -> Self {
        Self { x: p.0, y: p.1, radius: 0.0 }
    }

    fn from_diameter(a: (f64, f64), b: (f64, f64)) -> Self {
        let x = (a.0 + b.0) / 2.0;
        let y = (a.1 + b.1) / 2.0;
        Self { x, y, radius: distance((x, y), a).max(distance((x, y), b)) }
    }

    /// Circumcircle of three points, or the widest diameter circle when they are collinear.
    fn from_triangle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);

        if d.abs() < f64::EPSILON {
            let candidates = [Self::from_diameter(a, b), Self::from_diameter(a, c), Self::from_diameter(b, c)];
            return candidates
                .into_iter()
                .fold(Self::at(a), |widest, circle| if circle.radius > widest.radius { circle } else { widest });
        }

        let b_sq = bx * bx + by * by;
        let c_sq = cx * cx + cy * cy;
        let ux = (cy * b_sq - by * c_sq) / d;
        let uy = (bx * c_sq - cx * b_sq) / d;
        let center = (a.0 + ux, a.1 + uy);
        Self {
            x: center.0,
            y: center.1,
            radius: distance(center, a).max(distance(center, b)).max(distance(center, c)),
        }
    }

    fn contains(&self, p: (f64, f64)) -> bool {
        distance((self.x, self.y), p) <= self.radius + CONTAINMENT_EPSILON * self.radius.max(1.0)
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Fisher-Yates over indices driven by a fixed-seed xorshift generator.
fn shuffled_order(len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    let mut state = SHUFFLE_SEED;
    for i in (1..len).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        order.swap(i, j);
    }
    order
}

/// Returns the minimum enclosing circle of `points`, or `None` for an empty set.
pub fn min_enclosing_circle(points: &[Point]) -> Option<EnclosingCircle> {
    if points.is_empty() {
        return None;
    }

    let pts: Vec<(f64, f64)> = shuffled_order(points.len())
        .into_iter()
        .map(|i| (points[i].x as f64, points[i].y as f64))
        .collect();

    let mut circle = Circle::at(pts[0]);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::at(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::from_triangle(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    Some(EnclosingCircle {
        center: (circle.x as f32, circle.y as f32),
        radius: circle.radius as f32,
    })
}
