// THEORY:
// The `pipeline` module is the top-level API of the tracker. It owns one
// `ColorTrack` (target color + trail) per tracked color and runs the full
// per-frame stack: resize -> HSV -> segment -> locate -> buffer -> render.
//
// It also owns the run loop, a two-state machine:
// - RUNNING: acquire, process, present, poll for quit.
// - STOPPED: entered on end of input, on a quit request, or on a fatal error.
//   The frame source is released and the display closed exactly once. STOPPED
//   is terminal.
//
// Everything is single-threaded and synchronous; each iteration completes
// before the next frame is requested.

use crate::core_modules::blob::Blob;
use crate::core_modules::blob_locator::blob_locator;
use crate::core_modules::color_range::TrackedColor;
use crate::core_modules::color_segmenter::color_segmenter;
use crate::core_modules::frame_io::{DisplaySink, FrameSource};
use crate::core_modules::hsv::{HsvImage, to_hsv};
use crate::core_modules::renderer::{DEFAULT_THICKNESS_SCALE, Renderer};
use crate::core_modules::trail_buffer::{DEFAULT_TRAIL_CAPACITY, TrackPoint, TrailBuffer};
use crate::error::TrackError;
use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::{debug, info, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::blob::{EnclosingCircle, Point};
pub use crate::core_modules::trail_buffer::TrailSegment;

pub const DEFAULT_MORPH_ITERATIONS: u8 = 2;
/// Blobs must have an enclosing radius strictly above this to be drawn or trailed.
pub const DEFAULT_MIN_RADIUS: f32 = 10.0;
pub const DEFAULT_FRAME_WIDTH: u32 = 500;

/// How frames are drawn from the source for each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameSampling {
    /// One frame per iteration, segmented once per color.
    #[default]
    Shared,
    /// One frame per color per iteration, each color tracked on its own sample.
    /// Overlays are drawn on the first color's frame.
    PerColor,
}

/// Configuration for the TrackingPipeline, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Capacity N of every color's trail.
    pub trail_capacity: usize,
    /// Erosion rounds, followed by the same number of dilation rounds.
    pub morph_iterations: u8,
    pub min_radius: f32,
    /// Trail segments are `round(sqrt(N / (i + 1)) * thickness_scale)` pixels wide.
    pub thickness_scale: f64,
    /// Working width every frame is resized to (aspect preserved); `None` keeps
    /// frames at their native size.
    pub frame_width: Option<u32>,
    pub sampling: FrameSampling,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            morph_iterations: DEFAULT_MORPH_ITERATIONS,
            min_radius: DEFAULT_MIN_RADIUS,
            thickness_scale: DEFAULT_THICKNESS_SCALE,
            frame_width: Some(DEFAULT_FRAME_WIDTH),
            sampling: FrameSampling::Shared,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.trail_capacity == 0 {
            return Err(TrackError::InvalidConfig {
                field: "trail_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if !self.min_radius.is_finite() || self.min_radius < 0.0 {
            return Err(TrackError::InvalidConfig {
                field: "min_radius",
                message: format!("{} is not a non-negative radius", self.min_radius),
            });
        }
        if !self.thickness_scale.is_finite() || self.thickness_scale <= 0.0 {
            return Err(TrackError::InvalidConfig {
                field: "thickness_scale",
                message: format!("{} is not a positive scale", self.thickness_scale),
            });
        }
        if self.frame_width == Some(0) {
            return Err(TrackError::InvalidConfig {
                field: "frame_width",
                message: "must be positive; use None to keep native size".to_string(),
            });
        }
        Ok(())
    }
}

/// A tracked color together with its position history.
#[derive(Debug, Clone)]
pub struct ColorTrack {
    pub color: TrackedColor,
    pub trail: TrailBuffer,
}

/// What the pipeline saw for one color in one frame.
#[derive(Debug, Clone)]
pub struct ColorObservation {
    pub name: String,
    /// The largest blob, if any, whether or not it met the size gate.
    pub blob: Option<Blob>,
    /// The value pushed into the trail: the centroid of a qualifying blob, else absent.
    pub point: TrackPoint,
}

/// The primary output of the pipeline for a single iteration.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame_index: u64,
    /// One entry per tracked color, in tracking order.
    pub observations: Vec<ColorObservation>,
    /// The working frame with all overlays drawn, not yet mirrored.
    pub display: RgbImage,
}

impl FrameReport {
    pub fn observation(&self, name: &str) -> Option<&ColorObservation> {
        self.observations.iter().find(|o| o.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A finite source ran out of frames.
    EndOfInput,
    /// The display reported a quit request.
    QuitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub stop_reason: StopReason,
}

/// The main, top-level struct for the color tracker.
pub struct TrackingPipeline {
    config: TrackerConfig,
    tracks: Vec<ColorTrack>,
    renderer: Renderer,
    state: RunState,
    frame_count: u64,
}

impl TrackingPipeline {
    pub fn new(config: TrackerConfig, colors: Vec<TrackedColor>) -> Result<Self, TrackError> {
        config.validate()?;
        if colors.is_empty() {
            return Err(TrackError::InvalidConfig {
                field: "colors",
                message: "at least one color must be tracked".to_string(),
            });
        }

        let tracks = colors
            .into_iter()
            .map(|color| ColorTrack {
                color,
                trail: TrailBuffer::new(config.trail_capacity),
            })
            .collect();

        Ok(Self {
            renderer: Renderer::new(config.thickness_scale),
            config,
            tracks,
            state: RunState::Running,
            frame_count: 0,
        })
    }

    /// A pipeline tracking the three default colors.
    pub fn with_default_colors(config: TrackerConfig) -> Result<Self, TrackError> {
        Self::new(config, TrackedColor::defaults())
    }

    /// Runs one iteration over a single frame shared by every color.
    pub fn process_frame(&mut self, frame: RgbImage) -> FrameReport {
        let frame = self.prepare(frame);
        let hsv = to_hsv(&frame);

        let observations = self
            .tracks
            .iter_mut()
            .map(|track| observe(track, &hsv, &self.config))
            .collect();

        self.finish(frame, observations)
    }

    /// Runs one iteration where each color is tracked on its own frame.
    /// `frames` holds one frame per tracked color, in tracking order.
    pub fn process_frames(&mut self, frames: Vec<RgbImage>) -> Result<FrameReport, TrackError> {
        if frames.len() != self.tracks.len() {
            return Err(TrackError::FrameCount {
                expected: self.tracks.len(),
                actual: frames.len(),
            });
        }

        let prepared: Vec<RgbImage> = frames.into_iter().map(|f| self.prepare(f)).collect();
        let observations = self
            .tracks
            .iter_mut()
            .zip(prepared.iter())
            .map(|(track, frame)| observe(track, &to_hsv(frame), &self.config))
            .collect();

        let display = prepared.into_iter().next().ok_or_else(|| TrackError::acquisition("no frames supplied"))?;
        Ok(self.finish(display, observations))
    }

    /// Drives the loop until end of input, a quit request or a fatal error,
    /// then releases the source and closes the display.
    pub fn run<S, D>(&mut self, source: &mut S, sink: &mut D) -> Result<RunSummary, TrackError>
    where
        S: FrameSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        if self.state == RunState::Stopped {
            return Err(TrackError::Stopped);
        }

        info!(colors = self.tracks.len(), sampling = ?self.config.sampling, "tracking started");
        let start_count = self.frame_count;
        let outcome = self.run_until_stopped(source, sink, start_count);

        // --- STOPPED ---
        self.state = RunState::Stopped;
        source.release();
        sink.close();

        match &outcome {
            Ok(summary) => info!(frames = summary.frames_processed, reason = ?summary.stop_reason, "tracking stopped"),
            Err(e) => warn!(error = %e, "tracking aborted"),
        }
        outcome
    }

    fn run_until_stopped<S, D>(&mut self, source: &mut S, sink: &mut D, start_count: u64) -> Result<RunSummary, TrackError>
    where
        S: FrameSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        loop {
            let report = match self.config.sampling {
                FrameSampling::Shared => match source.next_frame()? {
                    Some(frame) => self.process_frame(frame),
                    None => return Ok(self.summary(start_count, StopReason::EndOfInput)),
                },
                FrameSampling::PerColor => {
                    let mut frames = Vec::with_capacity(self.tracks.len());
                    for _ in 0..self.tracks.len() {
                        match source.next_frame()? {
                            Some(frame) => frames.push(frame),
                            None => return Ok(self.summary(start_count, StopReason::EndOfInput)),
                        }
                    }
                    self.process_frames(frames)?
                }
            };

            sink.present(&self.renderer.present(&report.display))?;
            if sink.poll_quit()? {
                return Ok(self.summary(start_count, StopReason::QuitRequested));
            }
        }
    }

    fn summary(&self, start_count: u64, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            frames_processed: self.frame_count - start_count,
            stop_reason,
        }
    }

    /// Resizes a frame to the configured working width, preserving aspect.
    fn prepare(&self, frame: RgbImage) -> RgbImage {
        match self.config.frame_width {
            Some(width) if width != frame.width() && frame.width() > 0 => {
                let height = ((frame.height() as f64 * width as f64 / frame.width() as f64).round() as u32).max(1);
                imageops::resize(&frame, width, height, FilterType::Triangle)
            }
            _ => frame,
        }
    }

    /// Draws every overlay onto `display` and packages the iteration's report.
    fn finish(&mut self, mut display: RgbImage, observations: Vec<ColorObservation>) -> FrameReport {
        for (track, observation) in self.tracks.iter().zip(observations.iter()) {
            if let Some(blob) = &observation.blob {
                self.renderer.draw_blob(&mut display, blob, &track.color.palette);
            }
        }
        for track in &self.tracks {
            self.renderer.draw_trail(&mut display, &track.trail, track.color.palette.trail);
        }

        let frame_index = self.frame_count;
        self.frame_count += 1;
        FrameReport {
            frame_index,
            observations,
            display,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn tracks(&self) -> &[ColorTrack] {
        &self.tracks
    }

    pub fn trail(&self, name: &str) -> Option<&TrailBuffer> {
        self.tracks.iter().find(|t| t.color.name() == name).map(|t| &t.trail)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Segments and locates one color, then records the outcome in its trail.
fn observe(track: &mut ColorTrack, hsv: &HsvImage, config: &TrackerConfig) -> ColorObservation {
    let mask = color_segmenter::segment(hsv, &track.color.range, config.morph_iterations);
    let blob = blob_locator::locate(&mask, config.min_radius);

    let point = blob.as_ref().filter(|b| b.meets_min_size).map(|b| b.centroid);
    track.trail.push_front(point);

    match &blob {
        Some(b) => debug!(
            color = track.color.name(),
            x = b.centroid.x,
            y = b.centroid.y,
            radius = b.circle.radius,
            tracked = b.meets_min_size,
            "blob located"
        ),
        None => debug!(color = track.color.name(), "no blob"),
    }

    ColorObservation {
        name: track.color.name().to_string(),
        blob,
        point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn native_size() -> TrackerConfig {
        TrackerConfig {
            frame_width: None,
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_thresholds() {
        let config = TrackerConfig::default();
        assert_eq!(config.trail_capacity, 32);
        assert_eq!(config.morph_iterations, 2);
        assert_eq!(config.min_radius, 10.0);
        assert_eq!(config.thickness_scale, 2.5);
        assert_eq!(config.frame_width, Some(500));
        assert_eq!(config.sampling, FrameSampling::Shared);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero_capacity = TrackerConfig { trail_capacity: 0, ..TrackerConfig::default() };
        assert!(matches!(
            TrackingPipeline::with_default_colors(zero_capacity),
            Err(TrackError::InvalidConfig { field: "trail_capacity", .. })
        ));

        let zero_width = TrackerConfig { frame_width: Some(0), ..TrackerConfig::default() };
        assert!(zero_width.validate().is_err());

        assert!(TrackingPipeline::new(TrackerConfig::default(), Vec::new()).is_err());
    }

    #[test]
    fn test_frames_are_resized_to_working_width() {
        let mut pipeline = TrackingPipeline::with_default_colors(TrackerConfig::default()).unwrap();
        let report = pipeline.process_frame(RgbImage::from_pixel(1000, 600, Rgb([255, 255, 255])));
        assert_eq!(report.display.dimensions(), (500, 300));
    }

    #[test]
    fn test_blank_frame_pushes_absent_points() {
        let mut pipeline = TrackingPipeline::with_default_colors(native_size()).unwrap();
        let report = pipeline.process_frame(RgbImage::from_pixel(120, 90, Rgb([255, 255, 255])));

        assert_eq!(report.frame_index, 0);
        assert_eq!(report.observations.len(), 3);
        for observation in &report.observations {
            assert!(observation.blob.is_none());
            assert!(observation.point.is_none());
        }
        for track in pipeline.tracks() {
            assert_eq!(track.trail.len(), 1);
            assert_eq!(track.trail.latest(), Some(None));
        }
        assert_eq!(pipeline.frame_count(), 1);
    }

    #[test]
    fn test_process_frames_requires_one_frame_per_color() {
        let mut pipeline = TrackingPipeline::with_default_colors(native_size()).unwrap();
        let frame = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        assert!(matches!(
            pipeline.process_frames(vec![frame.clone()]),
            Err(TrackError::FrameCount { expected: 3, actual: 1 })
        ));
        assert!(pipeline.process_frames(vec![frame.clone(), frame.clone(), frame]).is_ok());
    }

    fn paint_square(frame: &mut RgbImage, left: u32, top: u32, side: u32, color: Rgb<u8>) {
        for y in top..(top + side).min(frame.height()) {
            for x in left..(left + side).min(frame.width()) {
                frame.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn test_undersized_blob_is_observed_but_not_tracked_or_drawn() {
        let mut pipeline = TrackingPipeline::with_default_colors(native_size()).unwrap();
        let mut frame = RgbImage::from_pixel(80, 80, Rgb([255, 255, 255]));
        // Pure green (HSV 60, 255, 200) falls only inside the green range.
        paint_square(&mut frame, 34, 34, 12, Rgb([0, 200, 0]));

        let report = pipeline.process_frame(frame.clone());
        let green = report.observation("green").unwrap();
        let blob = green.blob.as_ref().expect("small square is still located");
        assert!(!blob.meets_min_size);
        assert!((blob.centroid.x - 39).abs() <= 1 && (blob.centroid.y - 39).abs() <= 1);
        assert!(green.point.is_none());
        assert_eq!(pipeline.trail("green").unwrap().latest(), Some(None));

        // Nothing drawn: no circle, no centroid dot, no trail.
        assert_eq!(report.display, frame);
    }

    #[test]
    fn test_blob_on_left_edge_is_tracked() {
        let mut pipeline = TrackingPipeline::with_default_colors(native_size()).unwrap();
        let mut frame = RgbImage::from_pixel(120, 100, Rgb([255, 255, 255]));
        paint_square(&mut frame, 0, 30, 30, Rgb([0, 200, 0]));

        let report = pipeline.process_frame(frame);
        let point = report.observation("green").unwrap().point.expect("edge blob is tracked");
        assert!((point.x - 14).abs() <= 1 && (point.y - 44).abs() <= 1, "{:?}", point);
        assert_eq!(pipeline.trail("green").unwrap().latest(), Some(Some(point)));
    }
}
