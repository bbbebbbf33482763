//! Stage 4: rasterize pixel-plane primitives into a viewport
//!
//! Logical pixel (x, y) in the pixel-plane becomes viewport pixel
//! (x - 1, h - y): the vertical axis flips so that increasing pixel-plane y
//! moves toward the top of the viewport. Every primitive is drawn in white.
//!
//! Clipping is per pixel: nothing is trimmed geometrically, each candidate
//! pixel is tested against the viewport and kept or dropped. With clipping
//! off, pixels outside the framebuffer are still dropped (with a warning) by
//! the framebuffer itself.

mod line;
mod point;

use std::fmt;

use super::config::RenderConfig;
use super::logger::PipelineLogger;
use crate::framebuffer::{Color, Framebuffer, ViewportHandle};
use crate::scene::{Model, Primitive, Vertex};

pub use line::rasterize_line;
pub use point::rasterize_point;

/// Why a primitive could not be rasterized
#[derive(Debug, Clone, PartialEq)]
pub enum RasterizeError {
    VertexIndexOutOfRange {
        primitive: Primitive,
        index: usize,
        vertex_count: usize,
    },
}

impl fmt::Display for RasterizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterizeError::VertexIndexOutOfRange { primitive, index, vertex_count } => write!(
                f,
                "{} refers to vertex {} but the model has {} vertices",
                primitive, index, vertex_count
            ),
        }
    }
}

impl std::error::Error for RasterizeError {}

/// Round to the nearest integer, ties toward positive infinity
/// (so -0.5 rounds to 0 and 2.5 rounds to 3)
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Where pixels go, plus the settings that decide which ones get there
pub struct RasterTarget<'a> {
    pub fb: &'a mut Framebuffer,
    pub vp: ViewportHandle,
    pub config: RenderConfig,
    pub logger: PipelineLogger,
    /// Viewport size, sampled once per primitive list
    pub w: i32,
    pub h: i32,
}

impl<'a> RasterTarget<'a> {
    pub fn new(
        fb: &'a mut Framebuffer,
        vp: ViewportHandle,
        config: RenderConfig,
        logger: PipelineLogger,
    ) -> Self {
        let w = vp.width(fb);
        let h = vp.height(fb);
        Self { fb, vp, config, logger, w, h }
    }

    /// Clip test and write for one viewport pixel (line segments)
    fn plot(&mut self, x_pp: f64, y_pp: f64, x_vp: i64, y_vp: i64) {
        let inside =
            x_vp >= 0 && x_vp < self.w as i64 && y_vp >= 0 && y_vp < self.h as i64;
        let keep = !self.config.clipping || inside;
        self.logger.pixel(!keep, x_pp, y_pp, x_vp, y_vp, &*self.fb, self.vp);
        if keep {
            self.write(x_vp, y_vp);
        }
    }

    /// Write white at a viewport pixel. Coordinates beyond i32 can never be
    /// stored, so they are dropped here instead of in the framebuffer.
    fn write(&mut self, x_vp: i64, y_vp: i64) {
        match (i32::try_from(x_vp), i32::try_from(y_vp)) {
            (Ok(x), Ok(y)) => self.vp.set_pixel(&mut *self.fb, x, y, Color::WHITE),
            _ => log::warn!("Rasterize: viewport pixel ({}, {}) out of range", x_vp, y_vp),
        }
    }
}

fn vertex_at(model: &Model, primitive: &Primitive, index: usize) -> Result<Vertex, RasterizeError> {
    model.vertices().get(index).copied().ok_or_else(|| RasterizeError::VertexIndexOutOfRange {
        primitive: *primitive,
        index,
        vertex_count: model.vertices().len(),
    })
}

/// Rasterize one primitive of `model`
pub fn rasterize_primitive(
    model: &Model,
    primitive: &Primitive,
    target: &mut RasterTarget<'_>,
) -> Result<(), RasterizeError> {
    match primitive {
        Primitive::Point(pt) => {
            let v = vertex_at(model, primitive, pt.index)?;
            rasterize_point(v, pt.radius, target);
        }
        Primitive::LineSegment(ls) => {
            let v0 = vertex_at(model, primitive, ls.indices[0])?;
            let v1 = vertex_at(model, primitive, ls.indices[1])?;
            rasterize_line(v0, v1, target);
        }
    }
    Ok(())
}

/// Rasterize every primitive of a pixel-plane model into the viewport.
/// A primitive that cannot be drawn is logged and skipped.
pub fn rasterize(model: &Model, fb: &mut Framebuffer, vp: ViewportHandle, config: &RenderConfig) {
    let logger = PipelineLogger::new(config.trace);
    rasterize_with_logger(model, fb, vp, config, logger);
}

pub(crate) fn rasterize_with_logger(
    model: &Model,
    fb: &mut Framebuffer,
    vp: ViewportHandle,
    config: &RenderConfig,
    logger: PipelineLogger,
) {
    let mut target = RasterTarget::new(fb, vp, *config, logger);
    for p in model.primitives() {
        logger.primitive("4. Rasterize", model, p);
        if let Err(e) = rasterize_primitive(model, p, &mut target) {
            log::warn!("Rasterize: skipping primitive of model {}: {}", model.name, e);
        }
    }
}
