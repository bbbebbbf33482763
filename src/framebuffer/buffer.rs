//! Framebuffer: a row-major array of packed RGB pixels
//!
//! Coordinates act like screen coordinates: +x to the right, +y downward,
//! row 0 is the top row. Every access is bounds-checked; a bad coordinate
//! is logged and absorbed (reads give black, writes are dropped).

use std::fmt;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use super::color::Color;
use super::ppm::{self, ImageFileError};
use super::viewport::{Viewport, ViewportHandle};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one framebuffer instance; viewport handles carry it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    fn next() -> Self {
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    id: StoreId,
    width: usize,
    height: usize,
    pixels: Vec<u32>, // 0xRRGGBB, width * height entries
    background: Color,
    cleared: bool,
    /// Viewport table; slot 0 is the default viewport
    pub(super) viewports: Vec<Viewport>,
}

impl Framebuffer {
    /// All-black framebuffer whose default viewport is the whole buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, Color::BLACK)
    }

    /// Framebuffer cleared to `background`
    pub fn with_background(width: usize, height: usize, background: Color) -> Self {
        let mut fb = Self::blank(width, height, background);
        fb.clear_with(background);
        fb
    }

    /// Independent copy of another framebuffer's pixels
    pub fn from_framebuffer(source: &Framebuffer) -> Self {
        let mut fb = Self::blank(source.width, source.height, source.background);
        for y in 0..source.height as i32 {
            for x in 0..source.width as i32 {
                fb.set_pixel(x, y, source.get_pixel(x, y));
            }
        }
        fb
    }

    /// Independent copy of one viewport's pixels; the new buffer takes the
    /// viewport's size and background color
    pub fn from_viewport(source: &Framebuffer, vp: ViewportHandle) -> Self {
        let width = vp.width(source).max(0);
        let height = vp.height(source).max(0);
        let background = vp.background(source);

        let mut fb = Self::blank(width as usize, height as usize, background);
        for y in 0..height {
            for x in 0..width {
                fb.set_pixel(x, y, vp.get_pixel(source, x, y));
            }
        }
        fb
    }

    /// Load a binary PPM (P6) file
    pub fn from_ppm_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageFileError> {
        let file = std::fs::File::open(path)?;
        Self::from_ppm_reader(BufReader::new(file))
    }

    /// Decode a binary PPM (P6) stream
    pub fn from_ppm_reader<R: Read>(mut reader: R) -> Result<Self, ImageFileError> {
        let (width, height) = ppm::read_header(&mut reader)?;
        let mut fb = Self::blank(width, height, Color::BLACK);
        ppm::read_pixels_into(&mut reader, &mut fb, 0, 0, width, height)?;
        Ok(fb)
    }

    /// Storage with a default viewport but no pixel writes yet
    fn blank(width: usize, height: usize, background: Color) -> Self {
        let default_vp = Viewport::new(0, 0, width as i32, height as i32, background);
        Self {
            id: StoreId::next(),
            width,
            height,
            pixels: vec![Color::BLACK.to_rgb(); width * height],
            background,
            cleared: false,
            viewports: vec![default_vp],
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw packed pixels, row-major, top row first
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Change the background color. Does not touch any pixel; call
    /// [`Framebuffer::clear`] for that.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// True only while the whole buffer holds an untouched clear
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Fill with the background color
    pub fn clear(&mut self) {
        self.clear_with(self.background);
    }

    /// Fill every pixel with `color`
    pub fn clear_with(&mut self, color: Color) {
        self.pixels.fill(color.to_rgb());
        self.cleared = true;

        let (w, h) = (self.width as i32, self.height as i32);
        for vp in &mut self.viewports {
            if vp.ul_x >= 0 && vp.ul_y >= 0 && vp.lr_x < w && vp.lr_y < h {
                vp.cleared = true;
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Color at (x, y); black (with a warning) when out of range
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        match self.index(x, y) {
            Some(idx) => Color::from_rgb(self.pixels[idx]),
            None => {
                log::warn!(
                    "FrameBuffer: bad pixel coordinate ({}, {}) [w={}, h={}]",
                    x, y, self.width, self.height
                );
                Color::BLACK
            }
        }
    }

    /// Write (x, y); dropped (with a warning) when out of range
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some(idx) = self.index(x, y) else {
            log::warn!(
                "FrameBuffer: bad pixel coordinate ({}, {}) [w={}, h={}]",
                x, y, self.width, self.height
            );
            return;
        };

        self.pixels[idx] = color.to_rgb();
        self.cleared = false;
        for vp in &mut self.viewports {
            if vp.contains(x, y) {
                vp.cleared = false;
            }
        }
    }

    // ========================================================================
    // Channel planes
    // ========================================================================

    fn map_pixels(&self, f: impl Fn(Color) -> Color) -> Framebuffer {
        let mut fb = Self::new(self.width, self.height);
        fb.background = self.background;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                fb.set_pixel(x, y, f(self.get_pixel(x, y)));
            }
        }
        fb
    }

    /// New framebuffer holding only the red channel
    pub fn red_plane(&self) -> Framebuffer {
        self.map_pixels(Color::red_only)
    }

    /// New framebuffer holding only the green channel
    pub fn green_plane(&self) -> Framebuffer {
        self.map_pixels(Color::green_only)
    }

    /// New framebuffer holding only the blue channel
    pub fn blue_plane(&self) -> Framebuffer {
        self.map_pixels(Color::blue_only)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Write the whole buffer as binary PPM
    pub fn write_ppm<W: std::io::Write>(&self, writer: W) -> Result<(), ImageFileError> {
        ppm::write_region(
            self,
            0,
            0,
            self.width as i32 - 1,
            self.height as i32 - 1,
            writer,
        )
    }

    /// Save the whole buffer to a PPM file
    pub fn dump_to_ppm<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageFileError> {
        self.dump_region_to_ppm(0, 0, self.width as i32 - 1, self.height as i32 - 1, path)
    }

    /// Save the inclusive rectangle (ul_x, ul_y)-(lr_x, lr_y) to a PPM file
    pub fn dump_region_to_ppm<P: AsRef<Path>>(
        &self,
        ul_x: i32,
        ul_y: i32,
        lr_x: i32,
        lr_y: i32,
        path: P,
    ) -> Result<(), ImageFileError> {
        let file = std::fs::File::create(path)?;
        ppm::write_region(self, ul_x, ul_y, lr_x, lr_y, std::io::BufWriter::new(file))
    }

    /// Save the whole buffer through the external encoder ("png", "jpg", "bmp")
    pub fn dump_to_image<P: AsRef<Path>>(
        &self,
        path: P,
        format_name: &str,
    ) -> Result<(), ImageFileError> {
        self.dump_region_to_image(
            0,
            0,
            self.width as i32 - 1,
            self.height as i32 - 1,
            path,
            format_name,
        )
    }

    /// Save the inclusive rectangle through the external encoder
    pub fn dump_region_to_image<P: AsRef<Path>>(
        &self,
        ul_x: i32,
        ul_y: i32,
        lr_x: i32,
        lr_y: i32,
        path: P,
        format_name: &str,
    ) -> Result<(), ImageFileError> {
        ppm::encode_region(self, ul_x, ul_y, lr_x, lr_y, path.as_ref(), format_name)
    }
}

/// Text grid of `r g b |` cells; only useful for very small buffers
impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FrameBuffer [w={}, h={}]", self.width, self.height)?;
        for _ in 0..self.width {
            write!(f, " r   g   b |")?;
        }
        writeln!(f)?;
        for row in self.pixels.chunks(self.width.max(1)) {
            for &rgb in row {
                let c = Color::from_rgb(rgb);
                write!(f, "{:3} {:3} {:3}|", c.r, c.g, c.b)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framebuffer")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("cleared", &self.cleared)
            .field("viewports", &self.viewports.len())
            .finish()
    }
}
