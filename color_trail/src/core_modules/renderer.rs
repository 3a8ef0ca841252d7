// THEORY:
// The `Renderer` turns the numbers produced by the analysis stages into the
// overlay a viewer sees. It draws onto the display frame in place and then
// produces the mirrored image that is actually presented.
//
// What gets drawn:
// - Every blob that clears the size gate: its enclosing circle outline and a
//   filled dot on its centroid, in the color's palette.
// - Every trail segment: a line whose thickness tapers with distance from the
//   newest observation, `round(sqrt(capacity / (i + 1)) * scale)`, so recent
//   motion is bold and older motion fades into a thin tail.
//
// Presentation mirrors the frame horizontally so a camera pointed at the user
// reads like a mirror. This is fixed, not configurable.

use crate::core_modules::blob::{Blob, Point};
use crate::core_modules::color_range::Palette;
use crate::core_modules::trail_buffer::TrailBuffer;
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as PolyPoint;

pub const DEFAULT_THICKNESS_SCALE: f64 = 2.5;
/// Outline width of the enclosing circle, in pixels.
pub const CIRCLE_THICKNESS: i32 = 2;
pub const CENTROID_DOT_RADIUS: i32 = 5;

/// Line thickness of the trail segment whose older endpoint sits at `index`.
/// Never thinner than one pixel.
pub fn segment_thickness(capacity: usize, index: usize, scale: f64) -> u32 {
    let thickness = (capacity as f64 / (index + 1) as f64).sqrt() * scale;
    thickness.round().max(1.0) as u32
}

#[derive(Debug, Clone)]
pub struct Renderer {
    thickness_scale: f64,
}

impl Renderer {
    pub fn new(thickness_scale: f64) -> Self {
        Self { thickness_scale }
    }

    /// Draws the enclosing circle and centroid dot of a qualifying blob.
    /// Blobs below the size gate are left undrawn.
    pub fn draw_blob(&self, frame: &mut RgbImage, blob: &Blob, palette: &Palette) {
        if !blob.meets_min_size {
            return;
        }

        let center = (blob.circle.center.0 as i32, blob.circle.center.1 as i32);
        let radius = blob.circle.radius as i32;
        for offset in 0..CIRCLE_THICKNESS {
            let r = radius - offset;
            if r < 0 {
                break;
            }
            draw_hollow_circle_mut(frame, center, r, palette.circle);
        }

        draw_filled_circle_mut(frame, (blob.centroid.x, blob.centroid.y), CENTROID_DOT_RADIUS, palette.centroid);
    }

    /// Draws every segment of `trail` with tapering thickness.
    pub fn draw_trail(&self, frame: &mut RgbImage, trail: &TrailBuffer, color: Rgb<u8>) {
        for segment in trail.segments() {
            let thickness = segment_thickness(trail.capacity(), segment.index, self.thickness_scale);
            draw_thick_line(frame, segment.newer, segment.older, thickness, color);
        }
    }

    /// The frame as it should be shown: mirrored left-to-right.
    pub fn present(&self, frame: &RgbImage) -> RgbImage {
        imageops::flip_horizontal(frame)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_THICKNESS_SCALE)
    }
}

/// A line exactly `thickness` pixels wide: a quad across the segment, with
/// discs no wider than the line at both ends to close the joints.
fn draw_thick_line(frame: &mut RgbImage, from: Point, to: Point, thickness: u32, color: Rgb<u8>) {
    let line = (from.x as f32, from.y as f32, to.x as f32, to.y as f32);
    if thickness <= 1 {
        draw_line_segment_mut(frame, (line.0, line.1), (line.2, line.3), color);
        return;
    }

    let cap = ((thickness - 1) / 2) as i32;
    draw_filled_circle_mut(frame, (from.x, from.y), cap, color);
    draw_filled_circle_mut(frame, (to.x, to.y), cap, color);

    let (dx, dy) = (line.2 - line.0, line.3 - line.1);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return;
    }

    // Unit normal, split so the two sides plus the center row cover `thickness` pixels.
    let (nx, ny) = (-dy / length, dx / length);
    let near = ((thickness - 1) / 2) as f32;
    let far = (thickness - 1) as f32 - near;
    let corner = |x: f32, y: f32, side: f32| PolyPoint::new((x + nx * side).round() as i32, (y + ny * side).round() as i32);
    let quad = [
        corner(line.0, line.1, near),
        corner(line.2, line.3, near),
        corner(line.2, line.3, -far),
        corner(line.0, line.1, -far),
    ];
    if quad[0] == quad[3] {
        draw_line_segment_mut(frame, (line.0, line.1), (line.2, line.3), color);
        return;
    }
    draw_polygon_mut(frame, &quad, color);
}
