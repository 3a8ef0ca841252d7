// THEORY:
// The tracker does not own a camera or a window. It talks to two collaborators
// through narrow capability traits, so the pipeline can be driven by OpenCV in
// the viewer binary and by in-memory frame lists in tests.
//
// - A `FrameSource` hands out frames one at a time and signals the end of a
//   finite stream with `Ok(None)`. Any `Err` is fatal; there is no retry.
// - A `DisplaySink` shows a finished frame and reports whether the user asked
//   to quit.
//
// Both calls are blocking and synchronous. `release`/`close` are invoked once
// when the run stops so implementations can free devices and windows.

use crate::error::TrackError;
use image::RgbImage;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supplies sequential frames from a camera or a file.
pub trait FrameSource {
    /// The next frame, or `Ok(None)` once a finite source is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackError>;

    /// Frees the underlying device or file. Called once on stop.
    fn release(&mut self) {}
}

/// Presents frames and polls for a quit request.
pub trait DisplaySink {
    fn present(&mut self, frame: &RgbImage) -> Result<(), TrackError>;

    /// `true` when the user asked to stop. Must not block for long.
    fn poll_quit(&mut self) -> Result<bool, TrackError>;

    /// Tears down any windows. Called once on stop.
    fn close(&mut self) {}
}

/// Where frames come from: a live capture device or a video file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelector {
    Device(i32),
    File(PathBuf),
}

impl SourceSelector {
    /// Live devices never run out of frames; files do.
    pub fn is_live(&self) -> bool {
        matches!(self, SourceSelector::Device(_))
    }
}

impl Default for SourceSelector {
    fn default() -> Self {
        SourceSelector::Device(0)
    }
}

impl FromStr for SourceSelector {
    type Err = TrackError;

    /// An integer selects a device index; anything else is a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TrackError::InvalidConfig {
                field: "source",
                message: "source must be a device index or a file path".to_string(),
            });
        }
        match trimmed.parse::<i32>() {
            Ok(index) if index >= 0 => Ok(SourceSelector::Device(index)),
            Ok(index) => Err(TrackError::InvalidConfig {
                field: "source",
                message: format!("device index {} is negative", index),
            }),
            Err(_) => Ok(SourceSelector::File(PathBuf::from(trimmed))),
        }
    }
}

impl fmt::Display for SourceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelector::Device(index) => write!(f, "device {}", index),
            SourceSelector::File(path) => write!(f, "file {}", path.display()),
        }
    }
}
