//! Error types for the color tracker.
//!
//! Only conditions that end the run abnormally are errors. Running out of
//! frames, an empty mask and a zero-area contour are ordinary outcomes and are
//! reported through `Option`s and `StopReason` instead.

use thiserror::Error;

/// Fatal conditions raised by the tracker or by its frame/display collaborators.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The frame source could not be opened or failed mid-stream.
    #[error("Frame acquisition failed: {message}")]
    Acquisition { message: String },

    /// The display sink could not present a frame or poll for input.
    #[error("Display failed: {message}")]
    Display { message: String },

    /// A configuration value is outside its accepted domain.
    #[error("Invalid configuration for `{field}`: {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// `process_frames` was given a number of frames other than one per tracked color.
    #[error("Expected {expected} frames, one per tracked color, got {actual}")]
    FrameCount { expected: usize, actual: usize },

    /// `run` was called on a pipeline that has already reached its terminal state.
    #[error("Pipeline has already stopped")]
    Stopped,
}

impl TrackError {
    pub fn acquisition(message: impl Into<String>) -> Self {
        Self::Acquisition { message: message.into() }
    }

    pub fn display(message: impl Into<String>) -> Self {
        Self::Display { message: message.into() }
    }
}
