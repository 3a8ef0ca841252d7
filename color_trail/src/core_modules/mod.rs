pub mod blob;
pub mod blob_locator;
pub mod color_range;
pub mod color_segmenter;
pub mod enclosing_circle;
pub mod frame_io;
pub mod hsv;
pub mod renderer;
pub mod trail_buffer;
