// THEORY:
// The `hsv` module converts RGB frames into the 8-bit hue/saturation/value
// space the color ranges are expressed in. Hue is largely invariant to
// lighting changes, which makes range thresholds far more robust than in RGB.
//
// The encoding follows the common 8-bit convention used by camera tooling:
// - Hue is stored as half-degrees so the full wheel fits a byte (0..=179).
// - Saturation and value are scaled to 0..=255.
// Ranges captured with other OpenCV-style tools therefore transfer unchanged.

use image::{ImageBuffer, Rgb, RgbImage};

pub type Channel = u8;
pub type HueDegrees = f32;

/// A frame whose three channels are (H, S, V) rather than (R, G, B).
pub type HsvImage = ImageBuffer<Rgb<Channel>, Vec<Channel>>;

/// Converts a single RGB pixel into 8-bit (H, S, V).
#[inline]
pub fn rgb_to_hsv(red: Channel, green: Channel, blue: Channel) -> [Channel; 3] {
    let maximum_channel = red.max(green.max(blue));
    let minimum_channel = red.min(green.min(blue));
    let chroma = maximum_channel - minimum_channel;

    let value = maximum_channel;
    let saturation = if maximum_channel == 0 {
        0
    } else {
        (255.0 * chroma as f32 / maximum_channel as f32).round() as Channel
    };

    if chroma == 0 {
        return [0, saturation, value];
    }

    let inverse_chroma = 1.0 / chroma as f32;
    let (base_difference, sector_offset) = if maximum_channel == red {
        (green as f32 - blue as f32, 0.0)
    } else if maximum_channel == green {
        (blue as f32 - red as f32, 2.0)
    } else {
        (red as f32 - green as f32, 4.0)
    };

    let mut hue_degrees: HueDegrees = (base_difference * inverse_chroma + sector_offset) * 60.0;
    if hue_degrees < 0.0 {
        hue_degrees += 360.0;
    }

    // Half-degree encoding; 360° wraps back to 0.
    let hue = (hue_degrees / 2.0).round() as u16 % 180;
    [hue as Channel, saturation, value]
}

/// Converts an entire RGB frame into HSV.
pub fn to_hsv(frame: &RgbImage) -> HsvImage {
    let mut hsv = HsvImage::new(frame.width(), frame.height());
    for (source, target) in frame.pixels().zip(hsv.pixels_mut()) {
        let [red, green, blue] = source.0;
        *target = Rgb(rgb_to_hsv(red, green, blue));
    }
    hsv
}
