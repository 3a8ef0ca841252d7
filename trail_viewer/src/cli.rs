use clap::Parser;
use color_trail::pipeline::DEFAULT_FRAME_WIDTH;
use color_trail::{FrameSampling, SourceSelector, TrackerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trail_viewer")]
#[command(about = "Tracks colored objects in a camera or video feed and draws their motion trails")]
#[command(long_about = "Segments each frame by fixed HSV ranges for three target colors, marks the largest blob of each with its enclosing circle and centroid, and draws a tapering trail of recent centroids. The output is mirrored and shown full-screen; press 'q' to quit.")]
pub struct Args {
    #[arg(
        short = 's',
        long = "source",
        default_value = "0",
        help = "Capture device index or path to a video file"
    )]
    pub source: SourceSelector,

    #[arg(
        long = "video",
        conflicts_with = "source",
        help = "Path to a video file (shorthand for --source <PATH>)"
    )]
    pub video: Option<PathBuf>,

    #[arg(
        short = 'b',
        long = "buffer",
        default_value = "32",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        help = "Number of recent positions kept in each color's trail"
    )]
    pub trail_capacity: usize,

    #[arg(
        short = 'w',
        long = "width",
        default_value_t = DEFAULT_FRAME_WIDTH,
        help = "Working frame width in pixels (0 keeps the native size)"
    )]
    pub width: u32,

    #[arg(
        long = "per-color-frames",
        help = "Read a separate frame for each tracked color instead of sharing one"
    )]
    pub per_color_frames: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase verbosity level (use multiple times for more verbose output)"
    )]
    pub verbose: u8,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn source(&self) -> SourceSelector {
        match &self.video {
            Some(path) => SourceSelector::File(path.clone()),
            None => self.source.clone(),
        }
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            trail_capacity: self.trail_capacity,
            frame_width: (self.width > 0).then_some(self.width),
            sampling: if self.per_color_frames {
                FrameSampling::PerColor
            } else {
                FrameSampling::Shared
            },
            ..TrackerConfig::default()
        }
    }

    pub fn setup_logging(&self) {
        use tracing_subscriber::{EnvFilter, FmtSubscriber};

        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
    }
}
