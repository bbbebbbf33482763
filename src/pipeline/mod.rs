//! Four-stage rendering pipeline
//!
//! For every visible position whose model is visible:
//! 1. model2camera: translate the model into camera space
//! 2. projection: project onto the image plane (perspective or parallel)
//! 3. pixel_plane: map the image plane onto the viewport's pixel-plane
//! 4. rasterize: turn points and line segments into viewport pixels
//!
//! The first three stages are pure and return new models that share the
//! source's primitive list; only the last one touches pixels.

mod config;
mod logger;
mod model2camera;
mod pixel_plane;
mod projection;
mod rasterize;

pub use config::*;
pub use logger::*;
pub use model2camera::*;
pub use pixel_plane::*;
pub use projection::*;
pub use rasterize::{
    rasterize, rasterize_line, rasterize_point, rasterize_primitive, round_half_up,
    RasterTarget, RasterizeError,
};

use crate::framebuffer::{Framebuffer, ViewportHandle};
use crate::scene::{Position, Scene};

/// Render the scene into the framebuffer's default viewport
pub fn render(scene: &Scene, fb: &mut Framebuffer, config: &RenderConfig) {
    let vp = fb.default_viewport();
    render_viewport(scene, fb, vp, config);
}

/// Render the scene into the given viewport of `fb`
pub fn render_viewport(
    scene: &Scene,
    fb: &mut Framebuffer,
    vp: ViewportHandle,
    config: &RenderConfig,
) {
    let scene_log = PipelineLogger::new(config.trace || scene.debug);

    scene_log.message(&format!("\n== Begin Rendering of Scene: {} ==", scene.name));
    scene_log.message(&format!("-- Current Camera:\n{}", scene.camera));

    for position in &scene.positions {
        let log = PipelineLogger::new(scene_log.is_enabled() || position.debug);
        if position.visible {
            log.message(&format!("==== Render position: {} ====", position.name));
            log.message(&format!("---- Translation vector = {}", position.translation));
            render_position(scene, position, fb, vp, config, log);
            log.message(&format!("==== End position: {} ====", position.name));
        } else {
            log.message(&format!("==== Hidden position: {} ====", position.name));
        }
    }

    scene_log.message("== End Rendering of Scene ==");
}

fn render_position(
    scene: &Scene,
    position: &Position,
    fb: &mut Framebuffer,
    vp: ViewportHandle,
    config: &RenderConfig,
    log: PipelineLogger,
) {
    let model = &position.model;
    if !model.visible {
        log.message(&format!("====== Hidden model: {} ======", model.name));
        return;
    }

    log.message(&format!("====== Render model: {} ======", model.name));
    log.vertex_list("0. Model      ", model);

    // 1. Model to camera coordinates
    let model1 = model2camera(position);
    log.vertex_list("1. Camera     ", &model1);

    // 2. Camera to image plane
    let model2 = project(&model1, &scene.camera);
    log.vertex_list("2. Projected  ", &model2);

    // 3. Image plane to pixel-plane, sized to the target viewport
    let model3 = image_plane_to_pixel_plane(&model2, vp.width(fb), vp.height(fb));
    log.vertex_list("3. Pixel-plane", &model3);
    log.primitive_list("3. Pixel-plane", &model3);

    // 4. Rasterize (and clip) every primitive
    rasterize::rasterize_with_logger(&model3, fb, vp, config, log);

    log.message(&format!("====== End model: {} ======", model.name));
}
