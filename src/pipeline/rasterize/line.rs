//! Line segment rasterization
//!
//! Simple DDA along the major axis (Shirley, "Fundamentals of Computer
//! Graphics", 3rd ed., pp. 163-165). Endpoints are first snapped to the
//! nearest logical pixel. The major coordinate then steps by exactly one
//! pixel while the minor coordinate accumulates the slope and is rounded at
//! each step.
//!
//! With clipping on, the walk along the major axis is limited to the
//! viewport's logical pixels 1..=size, so a segment reaching far outside
//! costs no more than one crossing the viewport.

use super::{round_half_up, RasterTarget};
use crate::scene::Vertex;

/// Major-axis steps to walk: `first..=last`, cut down to `1..=size` when
/// clipping
fn major_range(first: i64, last: i64, size: i64, clipping: bool) -> (i64, i64) {
    if clipping {
        (first.max(1), last.min(size))
    } else {
        (first, last)
    }
}

/// Rasterize the pixel-plane segment v0-v1 into the target viewport
pub fn rasterize_line(v0: Vertex, v1: Vertex, target: &mut RasterTarget<'_>) {
    if ![v0.x, v0.y, v1.x, v1.y].iter().all(|c| c.is_finite()) {
        target.logger.message(&format!(
            "Segment ({}, {})-({}, {}) is not finite, nothing to draw",
            v0.x, v0.y, v1.x, v1.y
        ));
        return;
    }
    let h = target.h as i64;
    let clipping = target.config.clipping;

    let mut x0 = round_half_up(v0.x);
    let mut y0 = round_half_up(v0.y);
    let mut x1 = round_half_up(v1.x);
    let mut y1 = round_half_up(v1.y);

    // Degenerate segment: both ends on the same logical pixel
    if x0 == x1 && y0 == y1 {
        let x_vp = (x0 as i64).saturating_sub(1);
        let y_vp = h.saturating_sub(y0 as i64);
        target.plot(x0, y0, x_vp, y_vp);
        return;
    }

    if (y1 - y0).abs() <= (x1 - x0).abs() {
        // |slope| <= 1: walk x from left to right
        if x1 < x0 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let m = (y1 - y0) / (x1 - x0);
        if target.logger.is_enabled() {
            target.logger.message(&format!("Slope m = {}", m));
            target.logger.message(&format!(
                "(x0_vp, y0_vp) = ({:9.4}, {:9.4})",
                x0 - 1.0,
                h as f64 - y0
            ));
            target.logger.message(&format!(
                "(x1_vp, y1_vp) = ({:9.4}, {:9.4})",
                x1 - 1.0,
                h as f64 - y1
            ));
        }

        let (first, last) = major_range(x0 as i64, x1 as i64, target.w as i64, clipping);
        let mut y = if first == x0 as i64 { y0 } else { y0 + m * (first as f64 - x0) };
        for x in first..=last {
            let x_vp = x.saturating_sub(1);
            let y_vp = h.saturating_sub(round_half_up(y) as i64);
            target.plot(x as f64, y, x_vp, y_vp);
            y += m;
        }
    } else {
        // |slope| > 1: walk y from bottom to top
        if y1 < y0 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let m = (x1 - x0) / (y1 - y0);
        if target.logger.is_enabled() {
            target.logger.message(&format!("Slope m = {} (so 1/m = {})", m, 1.0 / m));
            target.logger.message(&format!(
                "(x0_vp, y0_vp) = ({:9.4}, {:9.4})",
                x0 - 1.0,
                h as f64 - y0
            ));
            target.logger.message(&format!(
                "(x1_vp, y1_vp) = ({:9.4}, {:9.4})",
                x1 - 1.0,
                h as f64 - y1
            ));
        }

        let (first, last) = major_range(y0 as i64, y1 as i64, h, clipping);
        let mut x = if first == y0 as i64 { x0 } else { x0 + m * (first as f64 - y0) };
        for y in first..=last {
            let x_vp = (round_half_up(x) as i64).saturating_sub(1);
            let y_vp = h.saturating_sub(y);
            target.plot(x, y as f64, x_vp, y_vp);
            x += m;
        }
    }
}
