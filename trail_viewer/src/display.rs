use anyhow::Result;
use color_trail::{DisplaySink, TrackError};
use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
};
use tracing::warn;

/// A full-screen highgui window that quits on a single key.
pub struct HighGuiDisplay {
    window: String,
    quit_key: char,
    rgb: Mat,
    bgr: Mat,
}

impl HighGuiDisplay {
    pub fn open(window: &str, quit_key: char) -> Result<Self> {
        highgui::named_window(window, highgui::WINDOW_NORMAL)?;
        highgui::set_window_property(window, highgui::WND_PROP_FULLSCREEN, highgui::WINDOW_FULLSCREEN as f64)?;
        Ok(Self {
            window: window.to_string(),
            quit_key,
            rgb: Mat::default(),
            bgr: Mat::default(),
        })
    }

    /// Copies an RGB image into a BGR Mat for highgui.
    fn load(&mut self, frame: &RgbImage) -> opencv::Result<()> {
        let (width, height) = frame.dimensions();
        if self.rgb.cols() != width as i32 || self.rgb.rows() != height as i32 {
            self.rgb = Mat::new_rows_cols_with_default(height as i32, width as i32, core::CV_8UC3, Scalar::all(0.0))?;
        }
        self.rgb.data_bytes_mut()?.copy_from_slice(frame.as_raw());
        imgproc::cvt_color(&self.rgb, &mut self.bgr, imgproc::COLOR_RGB2BGR, 0)
    }
}

impl DisplaySink for HighGuiDisplay {
    fn present(&mut self, frame: &RgbImage) -> Result<(), TrackError> {
        self.load(frame)
            .and_then(|_| highgui::imshow(&self.window, &self.bgr))
            .map_err(|e| TrackError::display(e.to_string()))
    }

    fn poll_quit(&mut self) -> Result<bool, TrackError> {
        let key = highgui::wait_key(1).map_err(|e| TrackError::display(e.to_string()))?;
        Ok(key >= 0 && (key & 0xFF) == self.quit_key as i32)
    }

    fn close(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            warn!("Failed to close display windows: {}", e);
        }
    }
}
