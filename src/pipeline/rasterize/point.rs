//! Point rasterization

use super::{round_half_up, RasterTarget};
use crate::scene::Vertex;

/// Rasterize a pixel-plane point as the (2r+1) x (2r+1) square of logical
/// pixels centered on its nearest logical pixel
pub fn rasterize_point(v: Vertex, radius: i32, target: &mut RasterTarget<'_>) {
    if !v.x.is_finite() || !v.y.is_finite() {
        target
            .logger
            .message(&format!("Point ({}, {}) is not finite, nothing to draw", v.x, v.y));
        return;
    }
    let (w, h) = (target.w as i64, target.h as i64);
    let r = radius as i64;

    let x = round_half_up(v.x) as i64;
    let y = round_half_up(v.y) as i64;

    for y_ in y.saturating_sub(r)..=y.saturating_add(r) {
        for x_ in x.saturating_sub(r)..=x.saturating_add(r) {
            // Tested in the pixel-plane: logical pixels 1..=w, 1..=h
            let keep = !target.config.clipping || (x_ > 0 && x_ <= w && y_ > 0 && y_ <= h);

            let (x_vp, y_vp) = (x_.saturating_sub(1), h.saturating_sub(y_));
            target
                .logger
                .pixel(!keep, x_ as f64, y_ as f64, x_vp, y_vp, &*target.fb, target.vp);
            if keep {
                target.write(x_vp, y_vp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::lit_pixels;
    use super::*;
    use crate::framebuffer::Framebuffer;
    use crate::pipeline::{PipelineLogger, RenderConfig};
    use crate::scene::Vec3;

    fn draw(fb: &mut Framebuffer, v: Vec3, radius: i32, clipping: bool) {
        let vp = fb.default_viewport();
        let config = RenderConfig::default().with_clipping(clipping);
        let mut target = RasterTarget::new(fb, vp, config, PipelineLogger::default());
        rasterize_point(v, radius, &mut target);
    }

    #[test]
    fn test_single_pixel() {
        let mut fb = Framebuffer::new(8, 8);
        draw(&mut fb, Vec3::new(3.4, 2.5, 0.0), 0, true);
        // (3, 3) in the pixel-plane -> viewport (2, 5)
        assert_eq!(lit_pixels(&fb), vec![(2, 5)]);
    }

    #[test]
    fn test_radius_draws_square() {
        let mut fb = Framebuffer::new(10, 10);
        draw(&mut fb, Vec3::new(5.0, 5.0, 0.0), 1, true);

        let lit = lit_pixels(&fb);
        assert_eq!(lit.len(), 9);
        // Corners of the square are lit, so it is not a disk
        assert!(lit.contains(&(3, 4)));
        assert!(lit.contains(&(5, 6)));
    }

    #[test]
    fn test_clipped_at_edges() {
        let mut fb = Framebuffer::new(6, 6);
        draw(&mut fb, Vec3::new(1.0, 1.0, 0.0), 2, true);
        // Only logical pixels 1..=3 x 1..=3 survive
        let lit = lit_pixels(&fb);
        assert_eq!(lit.len(), 9);
        assert!(lit.iter().all(|&(x, y)| x <= 2 && y >= 3));
    }

    #[test]
    fn test_far_outside_i32_range() {
        for &(x, y) in &[(-3e9, 5.0), (5.0, 3e9), (3e9, -3e9), (-9.3e18, 9.3e18)] {
            let mut fb = Framebuffer::new(8, 8);
            draw(&mut fb, Vec3::new(x, y, 0.0), 1, true);
            assert!(lit_pixels(&fb).is_empty());

            let mut fb = Framebuffer::new(8, 8);
            draw(&mut fb, Vec3::new(x, y, 0.0), 1, false);
            assert!(lit_pixels(&fb).is_empty());
        }
    }

    #[test]
    fn test_non_finite_center_draws_nothing() {
        for &(x, y) in &[(f64::NAN, 1.0), (f64::INFINITY, 4.0), (4.0, f64::NEG_INFINITY)] {
            let mut fb = Framebuffer::new(8, 8);
            draw(&mut fb, Vec3::new(x, y, 0.0), 2, true);
            assert!(lit_pixels(&fb).is_empty());
        }
    }

    #[test]
    fn test_unclipped_edges_dropped_by_framebuffer() {
        let mut fb = Framebuffer::new(6, 6);
        draw(&mut fb, Vec3::new(1.0, 1.0, 0.0), 2, false);
        assert_eq!(lit_pixels(&fb).len(), 9);
    }
}
