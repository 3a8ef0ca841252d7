mod capture;
mod cli;
mod display;

use anyhow::{Context, Result};
use capture::OpenCvCapture;
use cli::Args;
use color_trail::TrackingPipeline;
use display::HighGuiDisplay;
use tracing::{error, info};

const WINDOW_NAME: &str = "Frame";
const QUIT_KEY: char = 'q';

fn main() {
    let args = Args::parse_args();
    args.setup_logging();

    info!("Starting trail_viewer");

    if let Err(e) = run_application(args) {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_application(args: Args) -> Result<()> {
    // --- 1. Pipeline Initialization ---
    let config = args.tracker_config();
    let mut pipeline = TrackingPipeline::with_default_colors(config).context("Invalid tracker configuration")?;

    // --- 2. Video I/O Initialization ---
    let source = args.source();
    let mut capture = OpenCvCapture::open(&source).with_context(|| format!("Failed to open {}", source))?;
    let mut window = HighGuiDisplay::open(WINDOW_NAME, QUIT_KEY).context("Failed to open display window")?;

    // --- 3. Main Processing Loop ---
    let summary = pipeline.run(&mut capture, &mut window)?;

    info!(
        "Processing complete: {} frames, stopped by {:?}",
        summary.frames_processed, summary.stop_reason
    );
    Ok(())
}
