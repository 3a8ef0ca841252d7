// THEORY:
// This file is the main entry point for the `color_trail` library crate.
// It exposes the `TrackingPipeline` and its associated data structures
// (`TrackerConfig`, `FrameReport`, `RunSummary`, etc.) as the high-level
// interface for the color tracker. The per-stage building blocks live in
// `core_modules` and are public so each stage can be driven and tested on
// its own, but a frontend only needs the pipeline plus the two capability
// traits (`FrameSource`, `DisplaySink`) it must implement.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use crate::core_modules::color_range::{ColorRange, Palette, TrackedColor};
pub use crate::core_modules::frame_io::{DisplaySink, FrameSource, SourceSelector};
pub use crate::error::TrackError;
pub use crate::pipeline::{FrameReport, FrameSampling, RunSummary, StopReason, TrackerConfig, TrackingPipeline};
