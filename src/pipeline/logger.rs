//! Stage-by-stage diagnostics for the pipeline
//!
//! Everything here goes to `log::debug!` and only when the logger is
//! enabled (render config `trace`, or the scene's / position's `debug` flag).

use crate::framebuffer::{Framebuffer, ViewportHandle};
use crate::scene::{Model, Primitive};

/// Pipeline diagnostics switch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineLogger {
    enabled: bool,
}

impl PipelineLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn message(&self, message: &str) {
        if self.enabled {
            log::debug!("{}", message);
        }
    }

    /// One line per vertex, tagged with the stage name
    pub fn vertex_list(&self, stage: &str, model: &Model) {
        if !self.enabled {
            return;
        }
        for (i, v) in model.vertices().iter().enumerate() {
            log::debug!("{}: vIndex = {:3}, {}", stage, i, v);
        }
    }

    /// One line per primitive, tagged with the stage name
    pub fn primitive_list(&self, stage: &str, model: &Model) {
        if !self.enabled {
            return;
        }
        if model.primitives().is_empty() {
            log::debug!("{}: []", stage);
        }
        for p in model.primitives() {
            log::debug!("{}: {}", stage, p);
        }
    }

    /// A primitive followed by the vertices it references
    pub fn primitive(&self, stage: &str, model: &Model, p: &Primitive) {
        if !self.enabled {
            return;
        }
        log::debug!("{}: {}", stage, p);
        for &i in p.vertex_indices() {
            match model.vertices().get(i) {
                Some(v) => log::debug!("   vIndex = {:3}, {}", i, v),
                None => log::debug!("   vIndex = {:3}, <missing>", i),
            }
        }
    }

    /// One rasterized pixel: where it sits in the pixel-plane and in the
    /// viewport, and whether it was clipped
    pub fn pixel(
        &self,
        clipped: bool,
        x_pp: f64,
        y_pp: f64,
        x_vp: i64,
        y_vp: i64,
        fb: &Framebuffer,
        vp: ViewportHandle,
    ) {
        if !self.enabled {
            return;
        }
        let (ul_x, ul_y) = fb.viewport(vp).map_or((0, 0), |r| (r.ul_x, r.ul_y));
        log::debug!(
            "{}fb_[w={},h={}]  vp_[x={:4}, y={:4}, w={},h={}]  (x_pp={:9.4}, y_pp={:9.4})  (x_vp={:4}, y_vp={:4})",
            if clipped { "Clipped: " } else { "         " },
            fb.width(),
            fb.height(),
            ul_x,
            ul_y,
            vp.width(fb),
            vp.height(fb),
            x_pp,
            y_pp,
            x_vp,
            y_vp
        );
    }
}
