//! Viewports: rectangular sub-regions of a framebuffer
//!
//! A framebuffer keeps a table of [`Viewport`] records; callers hold a
//! [`ViewportHandle`] (store id + slot) and pass the framebuffer in
//! explicitly for every access. Viewport pixels are framebuffer pixels, so
//! overlapping viewports see each other's writes.
//!
//! Rectangles are not checked against the framebuffer's bounds. The parts
//! of a viewport that fall outside are absorbed by the framebuffer's
//! bounds-checked accessors.

use std::io::{BufReader, Write};
use std::path::Path;

use super::buffer::{Framebuffer, StoreId};
use super::color::Color;
use super::ppm::{self, ImageFileError};

/// Viewport rectangle (inclusive corners, framebuffer coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub ul_x: i32,
    pub ul_y: i32,
    pub lr_x: i32,
    pub lr_y: i32,
    pub background: Color,
    /// Hint: region still holds an untouched clear
    pub cleared: bool,
}

impl Viewport {
    /// Rectangle from its upper-left corner and size
    pub fn new(ul_x: i32, ul_y: i32, width: i32, height: i32, background: Color) -> Self {
        Self {
            ul_x,
            ul_y,
            lr_x: ul_x.saturating_add(width).saturating_sub(1),
            lr_y: ul_y.saturating_add(height).saturating_sub(1),
            background,
            cleared: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.lr_x.saturating_sub(self.ul_x).saturating_add(1)
    }

    pub fn height(&self) -> i32 {
        self.lr_y.saturating_sub(self.ul_y).saturating_add(1)
    }

    /// Whether framebuffer pixel (x, y) lies in this rectangle. The border
    /// counts as inside, so a write on the edge also resets `cleared`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.ul_x && x <= self.lr_x && y >= self.ul_y && y <= self.lr_y
    }

    fn reshape(&mut self, ul_x: i32, ul_y: i32, width: i32, height: i32) {
        self.ul_x = ul_x;
        self.ul_y = ul_y;
        self.lr_x = ul_x.saturating_add(width).saturating_sub(1);
        self.lr_y = ul_y.saturating_add(height).saturating_sub(1);
    }
}

/// Handle to a viewport record inside one specific framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportHandle {
    store: StoreId,
    slot: usize,
}

// ============================================================================
// Creation (framebuffer side)
// ============================================================================

impl Framebuffer {
    /// Handle of the default viewport (initially the whole buffer)
    pub fn default_viewport(&self) -> ViewportHandle {
        ViewportHandle { store: self.id(), slot: 0 }
    }

    /// Reshape the default viewport to cover the whole buffer again
    pub fn reset_default_viewport(&mut self) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.viewports[0].reshape(0, 0, w, h);
    }

    /// Reshape the default viewport
    pub fn set_default_viewport(&mut self, ul_x: i32, ul_y: i32, width: i32, height: i32) {
        self.viewports[0].reshape(ul_x, ul_y, width, height);
    }

    /// Open a viewport using the framebuffer's background color. Pixels are
    /// not touched.
    pub fn new_viewport(&mut self, ul_x: i32, ul_y: i32, width: i32, height: i32) -> ViewportHandle {
        let background = self.background();
        self.new_viewport_with_background(ul_x, ul_y, width, height, background)
    }

    /// Open a viewport with its own background color. Pixels are not touched.
    pub fn new_viewport_with_background(
        &mut self,
        ul_x: i32,
        ul_y: i32,
        width: i32,
        height: i32,
        background: Color,
    ) -> ViewportHandle {
        let handle = ViewportHandle { store: self.id(), slot: self.viewports.len() };
        self.viewports.push(Viewport::new(ul_x, ul_y, width, height, background));
        handle
    }

    /// Open a viewport at (ul_x, ul_y) sized like `source` and copy its pixels in
    pub fn viewport_from_framebuffer(
        &mut self,
        ul_x: i32,
        ul_y: i32,
        source: &Framebuffer,
    ) -> ViewportHandle {
        let (w, h) = (source.width() as i32, source.height() as i32);
        let vp = self.new_viewport_with_background(ul_x, ul_y, w, h, source.background());
        for y in 0..h {
            for x in 0..w {
                vp.set_pixel(self, x, y, source.get_pixel(x, y));
            }
        }
        vp
    }

    /// Open a viewport at (ul_x, ul_y) that copies another viewport of this
    /// framebuffer
    pub fn viewport_from_viewport(
        &mut self,
        ul_x: i32,
        ul_y: i32,
        source: ViewportHandle,
    ) -> ViewportHandle {
        let (w, h) = (source.width(self), source.height(self));
        let background = source.background(self);
        let vp = self.new_viewport_with_background(ul_x, ul_y, w, h, background);
        for y in 0..h {
            for x in 0..w {
                let c = source.get_pixel(self, x, y);
                vp.set_pixel(self, x, y, c);
            }
        }
        vp
    }

    /// Open a viewport at (ul_x, ul_y) sized like a PPM image and load it
    pub fn viewport_from_ppm_file<P: AsRef<Path>>(
        &mut self,
        ul_x: i32,
        ul_y: i32,
        path: P,
    ) -> Result<ViewportHandle, ImageFileError> {
        let mut reader = BufReader::new(std::fs::File::open(path)?);
        let (w, h) = ppm::read_header(&mut reader)?;
        let vp = self.new_viewport(ul_x, ul_y, w as i32, h as i32);
        ppm::read_pixels_into(&mut reader, self, ul_x, ul_y, w, h)?;
        Ok(vp)
    }

    /// Record behind a handle, if the handle belongs to this framebuffer
    pub fn viewport(&self, handle: ViewportHandle) -> Option<&Viewport> {
        if handle.store != self.id() {
            log::warn!(
                "Viewport: handle {:?} does not belong to framebuffer {:?}",
                handle, self.id()
            );
            return None;
        }
        self.viewports.get(handle.slot)
    }

    fn viewport_mut(&mut self, handle: ViewportHandle) -> Option<&mut Viewport> {
        if handle.store != self.id() {
            log::warn!(
                "Viewport: handle {:?} does not belong to framebuffer {:?}",
                handle, self.id()
            );
            return None;
        }
        self.viewports.get_mut(handle.slot)
    }
}

// ============================================================================
// Access (handle side)
// ============================================================================

impl ViewportHandle {
    pub fn store(self) -> StoreId {
        self.store
    }

    /// Width in pixels; 0 for a foreign handle
    pub fn width(self, fb: &Framebuffer) -> i32 {
        fb.viewport(self).map_or(0, Viewport::width)
    }

    /// Height in pixels; 0 for a foreign handle
    pub fn height(self, fb: &Framebuffer) -> i32 {
        fb.viewport(self).map_or(0, Viewport::height)
    }

    pub fn background(self, fb: &Framebuffer) -> Color {
        fb.viewport(self).map_or(Color::BLACK, |vp| vp.background)
    }

    /// Change the background color without clearing
    pub fn set_background(self, fb: &mut Framebuffer, color: Color) {
        if let Some(vp) = fb.viewport_mut(self) {
            vp.background = color;
        }
    }

    pub fn is_cleared(self, fb: &Framebuffer) -> bool {
        fb.viewport(self).is_some_and(|vp| vp.cleared)
    }

    /// Move/resize this viewport within its framebuffer
    pub fn set_viewport(self, fb: &mut Framebuffer, ul_x: i32, ul_y: i32, width: i32, height: i32) {
        if let Some(vp) = fb.viewport_mut(self) {
            vp.reshape(ul_x, ul_y, width, height);
        }
    }

    /// Color at viewport-local (x, y)
    pub fn get_pixel(self, fb: &Framebuffer, x: i32, y: i32) -> Color {
        match fb.viewport(self) {
            Some(vp) => fb.get_pixel(vp.ul_x.saturating_add(x), vp.ul_y.saturating_add(y)),
            None => Color::BLACK,
        }
    }

    /// Write viewport-local (x, y); lands in the framebuffer at the offset
    pub fn set_pixel(self, fb: &mut Framebuffer, x: i32, y: i32, color: Color) {
        let Some(&vp) = fb.viewport(self) else {
            return;
        };
        fb.set_pixel(vp.ul_x.saturating_add(x), vp.ul_y.saturating_add(y), color);
    }

    /// Fill with the viewport's background color
    pub fn clear(self, fb: &mut Framebuffer) {
        let background = self.background(fb);
        self.clear_with(fb, background);
    }

    /// Fill every pixel of the viewport with `color`
    pub fn clear_with(self, fb: &mut Framebuffer, color: Color) {
        let Some(&vp) = fb.viewport(self) else {
            return;
        };
        for y in 0..vp.height() {
            for x in 0..vp.width() {
                fb.set_pixel(vp.ul_x.saturating_add(x), vp.ul_y.saturating_add(y), color);
            }
        }
        if let Some(vp) = fb.viewport_mut(self) {
            vp.cleared = true;
        }
    }

    /// Copy this viewport into a new, independent framebuffer
    pub fn to_framebuffer(self, fb: &Framebuffer) -> Framebuffer {
        Framebuffer::from_viewport(fb, self)
    }

    /// Write this viewport's pixels as binary PPM
    pub fn write_ppm<W: Write>(self, fb: &Framebuffer, writer: W) -> Result<(), ImageFileError> {
        let vp = fb.viewport(self).copied().ok_or(ImageFileError::ForeignViewport)?;
        ppm::write_region(fb, vp.ul_x, vp.ul_y, vp.lr_x, vp.lr_y, writer)
    }

    /// Save this viewport to a PPM file
    pub fn dump_to_ppm<P: AsRef<Path>>(self, fb: &Framebuffer, path: P) -> Result<(), ImageFileError> {
        let vp = fb.viewport(self).copied().ok_or(ImageFileError::ForeignViewport)?;
        fb.dump_region_to_ppm(vp.ul_x, vp.ul_y, vp.lr_x, vp.lr_y, path)
    }

    /// Save this viewport through the external encoder
    pub fn dump_to_image<P: AsRef<Path>>(
        self,
        fb: &Framebuffer,
        path: P,
        format_name: &str,
    ) -> Result<(), ImageFileError> {
        let vp = fb.viewport(self).copied().ok_or(ImageFileError::ForeignViewport)?;
        fb.dump_region_to_image(vp.ul_x, vp.ul_y, vp.lr_x, vp.lr_y, path, format_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport_is_whole_buffer() {
        let fb = Framebuffer::new(8, 6);
        let vp = fb.default_viewport();
        assert_eq!(vp.width(&fb), 8);
        assert_eq!(vp.height(&fb), 6);
        assert!(vp.is_cleared(&fb));
    }

    #[test]
    fn test_viewport_write_is_offset_framebuffer_write() {
        let mut fb = Framebuffer::new(10, 10);
        let vp = fb.new_viewport(3, 4, 5, 5);
        vp.set_pixel(&mut fb, 1, 2, Color::RED);

        assert_eq!(fb.get_pixel(4, 6), Color::RED);
        assert_eq!(vp.get_pixel(&fb, 1, 2), Color::RED);
    }

    #[test]
    fn test_overlapping_viewports_share_pixels() {
        let mut fb = Framebuffer::new(10, 10);
        let a = fb.new_viewport(0, 0, 6, 6);
        let b = fb.new_viewport(2, 2, 6, 6);
        a.set_pixel(&mut fb, 3, 3, Color::GREEN);
        assert_eq!(b.get_pixel(&fb, 1, 1), Color::GREEN);
    }

    #[test]
    fn test_cleared_flag_tracks_region_writes() {
        let mut fb = Framebuffer::new(10, 10);
        let a = fb.new_viewport(0, 0, 4, 4);
        let b = fb.new_viewport(6, 6, 4, 4);
        a.clear_with(&mut fb, Color::RED);
        b.clear_with(&mut fb, Color::BLUE);
        assert!(a.is_cleared(&fb));
        assert!(b.is_cleared(&fb));

        // A write outside `a` leaves it alone; one inside `b` resets it
        fb.set_pixel(7, 7, Color::WHITE);
        assert!(a.is_cleared(&fb));
        assert!(!b.is_cleared(&fb));

        // Writes through an overlapping viewport count too
        let c = fb.new_viewport(2, 2, 4, 4);
        c.set_pixel(&mut fb, 0, 0, Color::WHITE);
        assert!(!a.is_cleared(&fb));
    }

    #[test]
    fn test_border_write_resets_cleared() {
        let mut fb = Framebuffer::new(10, 10);
        let vp = fb.new_viewport(2, 2, 4, 4);
        vp.clear_with(&mut fb, Color::RED);

        fb.set_pixel(1, 1, Color::WHITE);
        assert!(vp.is_cleared(&fb));

        // Lower-right corner is part of the rectangle
        fb.set_pixel(5, 5, Color::WHITE);
        assert!(!vp.is_cleared(&fb));
    }

    #[test]
    fn test_extreme_offsets_are_absorbed() {
        let mut fb = Framebuffer::new(4, 4);
        let vp = fb.new_viewport(i32::MAX - 1, i32::MIN, i32::MAX, 3);
        vp.set_pixel(&mut fb, i32::MAX, -5, Color::WHITE);
        assert_eq!(vp.get_pixel(&fb, i32::MAX, i32::MIN), Color::BLACK);
        assert!(fb.pixels().iter().all(|&p| p == Color::BLACK.to_rgb()));
    }

    #[test]
    fn test_clear_viewport_leaves_rest_of_buffer() {
        let mut fb = Framebuffer::new(6, 6);
        let vp = fb.new_viewport_with_background(1, 1, 2, 2, Color::ORANGE);
        vp.clear(&mut fb);

        assert_eq!(fb.get_pixel(1, 1), Color::ORANGE);
        assert_eq!(fb.get_pixel(2, 2), Color::ORANGE);
        assert_eq!(fb.get_pixel(3, 3), Color::BLACK);
        assert_eq!(fb.get_pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_out_of_range_viewport_degrades() {
        let mut fb = Framebuffer::new(4, 4);
        let vp = fb.new_viewport(2, 2, 4, 4);
        vp.clear_with(&mut fb, Color::RED);

        assert_eq!(fb.get_pixel(3, 3), Color::RED);
        assert_eq!(vp.get_pixel(&fb, 3, 3), Color::BLACK);
    }

    #[test]
    fn test_foreign_handle_is_ignored() {
        let mut a = Framebuffer::new(4, 4);
        let b = Framebuffer::new(4, 4);
        let foreign = b.default_viewport();

        foreign.set_pixel(&mut a, 0, 0, Color::WHITE);
        assert_eq!(a.get_pixel(0, 0), Color::BLACK);
        assert_eq!(foreign.width(&a), 0);
    }

    #[test]
    fn test_copy_viewport_into_viewport() {
        let mut fb = Framebuffer::new(12, 12);
        let src = fb.new_viewport(0, 0, 3, 3);
        src.set_pixel(&mut fb, 2, 1, Color::BLUE);

        let dst = fb.viewport_from_viewport(8, 8, src);
        assert_eq!(dst.width(&fb), 3);
        assert_eq!(dst.get_pixel(&fb, 2, 1), Color::BLUE);
        assert_eq!(fb.get_pixel(10, 9), Color::BLUE);
    }

    #[test]
    fn test_viewport_from_framebuffer_and_back() {
        let mut small = Framebuffer::new(2, 2);
        small.set_pixel(1, 0, Color::GREEN);

        let mut big = Framebuffer::with_background(6, 6, Color::ORANGE);
        let vp = big.viewport_from_framebuffer(3, 3, &small);
        assert_eq!(big.get_pixel(4, 3), Color::GREEN);
        assert_eq!(big.get_pixel(2, 2), Color::ORANGE);

        let copy = vp.to_framebuffer(&big);
        assert_eq!(copy.width(), 2);
        assert_eq!(copy.height(), 2);
        assert_eq!(copy.get_pixel(1, 0), Color::GREEN);
        assert_eq!(copy.get_pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_resize_default_viewport() {
        let mut fb = Framebuffer::new(10, 10);
        fb.set_default_viewport(2, 2, 4, 3);
        let vp = fb.default_viewport();
        assert_eq!((vp.width(&fb), vp.height(&fb)), (4, 3));

        fb.reset_default_viewport();
        assert_eq!((vp.width(&fb), vp.height(&fb)), (10, 10));
    }
}
