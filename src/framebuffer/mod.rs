//! Pixel store: framebuffers and the viewports opened over them

mod buffer;
mod color;
mod ppm;
mod viewport;

pub use buffer::*;
pub use color::*;
pub use ppm::{read_header, read_pixels_into, write_region, ImageFileError, MAX_PPM_PIXELS};
pub use viewport::*;
