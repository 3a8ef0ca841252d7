//! Shared synthetic frames and in-memory collaborators for integration tests.
//!
//! Every frame is deterministic: a white background (outside every default
//! range) with solid discs painted in reference swatches that fall inside
//! exactly one default range each.

#![allow(dead_code)]

use color_trail::{DisplaySink, FrameSource, TrackError};
use image::{Rgb, RgbImage};
use std::collections::VecDeque;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
/// HSV (150, 196, 130): inside "red" only.
pub const RED_SWATCH: Rgb<u8> = Rgb([130, 30, 130]);
/// HSV (60, 255, 200): inside "green" only.
pub const GREEN_SWATCH: Rgb<u8> = Rgb([0, 200, 0]);
/// HSV (113, 128, 80): inside "black" only.
pub const BLACK_SWATCH: Rgb<u8> = Rgb([40, 50, 80]);

pub fn blank_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}

/// Paints a solid disc of `radius` centered on `(cx, cy)`; pixels off-frame are skipped.
pub fn paint_disc(frame: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            if x >= 0 && y >= 0 && (x as u32) < frame.width() && (y as u32) < frame.height() {
                frame.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Replays a fixed list of frames, then reports end of stream.
pub struct VecSource {
    frames: VecDeque<RgbImage>,
    pub released: bool,
}

impl VecSource {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into(),
            released: false,
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackError> {
        Ok(self.frames.pop_front())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// A live source that never ends and fails after `fail_after` frames.
pub struct FailingSource {
    pub served: usize,
    pub fail_after: usize,
    pub released: bool,
}

impl FrameSource for FailingSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackError> {
        if self.served == self.fail_after {
            return Err(TrackError::acquisition("device unplugged"));
        }
        self.served += 1;
        Ok(Some(blank_frame(64, 48)))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Records presented frames; requests quit once `quit_after` frames were shown.
pub struct RecordingSink {
    pub presented: Vec<RgbImage>,
    pub quit_after: Option<usize>,
    pub closed: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            presented: Vec::new(),
            quit_after: None,
            closed: false,
        }
    }

    pub fn quitting_after(frames: usize) -> Self {
        Self {
            quit_after: Some(frames),
            ..Self::new()
        }
    }
}

impl DisplaySink for RecordingSink {
    fn present(&mut self, frame: &RgbImage) -> Result<(), TrackError> {
        self.presented.push(frame.clone());
        Ok(())
    }

    fn poll_quit(&mut self) -> Result<bool, TrackError> {
        Ok(self.quit_after.is_some_and(|n| self.presented.len() >= n))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
