// THEORY:
// The `ColorSegmenter` is the first analytical stage of the tracker. It turns an
// HSV frame and one `ColorRange` into a binary `Mask` that marks every pixel
// whose (H, S, V) falls inside the range on all three channels.
//
// Key architectural principles & algorithm steps:
// 1.  **Range Threshold**: Each pixel is tested independently against the
//     inclusive HSV box. Foreground pixels become 255, everything else 0.
// 2.  **Speckle Removal (Erosion)**: A few rounds of 3x3 erosion strip isolated
//     foreground pixels and thin bridges that sensor noise and similar hues in
//     the background leave behind.
// 3.  **Shape Recovery (Dilation)**: The same number of 3x3 dilations regrows
//     the surviving regions to roughly their original extent and closes small
//     gaps inside them.
// 4.  **Stateless Utility**: Segmentation is a pure function of (frame, range).
//     It has no memory of previous frames and never fails; the worst outcome is
//     an all-zero mask.

use crate::core_modules::color_range::ColorRange;
use crate::core_modules::hsv::HsvImage;
use image::{GrayImage, Luma};

/// A single-channel binary image: 255 for foreground, 0 for background.
pub type Mask = GrayImage;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

pub mod color_segmenter {
    use super::*;
    use imageproc::distance_transform::Norm;
    use imageproc::morphology::{dilate_mut, erode_mut};

    /// Produces the cleaned mask for `range` over an HSV frame.
    pub fn segment(hsv: &HsvImage, range: &ColorRange, iterations: u8) -> Mask {
        // --- 1. Range Threshold ---
        let mut mask = in_range(hsv, range);

        // --- 2. Erosion then 3. Dilation ---
        // L-infinity radius 1 is a 3x3 square structuring element.
        for _ in 0..iterations {
            erode_mut(&mut mask, Norm::LInf, 1);
        }
        for _ in 0..iterations {
            dilate_mut(&mut mask, Norm::LInf, 1);
        }

        mask
    }

    /// The raw threshold with no morphological cleanup.
    pub fn in_range(hsv: &HsvImage, range: &ColorRange) -> Mask {
        let mut mask = Mask::new(hsv.width(), hsv.height());
        for (source, target) in hsv.pixels().zip(mask.pixels_mut()) {
            let value = if range.contains(source.0) { FOREGROUND } else { BACKGROUND };
            *target = Luma([value]);
        }
        mask
    }

    /// Number of foreground pixels in a mask.
    pub fn foreground_count(mask: &Mask) -> usize {
        mask.pixels().filter(|p| p.0[0] != BACKGROUND).count()
    }
}
