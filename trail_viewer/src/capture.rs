use anyhow::{Context, Result, bail};
use color_trail::{FrameSource, SourceSelector, TrackError};
use image::RgbImage;
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{debug, info, warn};

/// Camera or video-file frames delivered as RGB images.
pub struct OpenCvCapture {
    cap: VideoCapture,
    live: bool,
    frame: Mat,
    rgb: Mat,
    frames_read: u64,
}

impl OpenCvCapture {
    pub fn open(source: &SourceSelector) -> Result<Self> {
        let cap = match source {
            SourceSelector::Device(index) => VideoCapture::new(*index, videoio::CAP_ANY)
                .with_context(|| format!("Failed to create capture for device {}", index))?,
            SourceSelector::File(path) => {
                let path_str = path.to_str().with_context(|| format!("Non UTF-8 video path: {:?}", path))?;
                VideoCapture::from_file(path_str, videoio::CAP_ANY)
                    .with_context(|| format!("Failed to create capture for {}", path.display()))?
            }
        };

        if !cap.is_opened()? {
            bail!("Unable to open {}", source);
        }

        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        let fps = cap.get(videoio::CAP_PROP_FPS)?;
        info!("Opened {} ({}x{} @ {:.1} fps)", source, width, height, fps);

        Ok(Self {
            cap,
            live: source.is_live(),
            frame: Mat::default(),
            rgb: Mat::default(),
            frames_read: 0,
        })
    }

    /// Converts the last BGR frame read into an owned RGB image.
    fn to_rgb_image(&mut self) -> opencv::Result<Option<RgbImage>> {
        imgproc::cvt_color(&self.frame, &mut self.rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let width = self.rgb.cols() as u32;
        let height = self.rgb.rows() as u32;
        let buffer: Vec<u8> = self.rgb.data_bytes()?.to_vec();
        Ok(RgbImage::from_raw(width, height, buffer))
    }
}

impl FrameSource for OpenCvCapture {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackError> {
        let grabbed = self
            .cap
            .read(&mut self.frame)
            .map_err(|e| TrackError::acquisition(format!("read failed: {}", e)))?;

        if !grabbed || self.frame.empty() {
            if self.live {
                return Err(TrackError::acquisition("camera returned no frame"));
            }
            debug!(frames = self.frames_read, "end of video");
            return Ok(None);
        }

        let image = self
            .to_rgb_image()
            .map_err(|e| TrackError::acquisition(format!("color conversion failed: {}", e)))?
            .ok_or_else(|| TrackError::acquisition("frame buffer does not match its dimensions"))?;

        self.frames_read += 1;
        Ok(Some(image))
    }

    fn release(&mut self) {
        if let Err(e) = self.cap.release() {
            warn!("Failed to release capture: {}", e);
        }
        debug!(frames = self.frames_read, "capture released");
    }
}
