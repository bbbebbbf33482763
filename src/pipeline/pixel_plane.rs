//! Stage 3: image plane to the logical pixel-plane
//!
//! The camera's view rectangle [-1, 1] x [-1, 1] maps onto the pixel-plane
//! rectangle [0.5, w + 0.5] x [0.5, h + 0.5], whose integer points are the
//! logical pixels. The divisor is 2.001 rather than 2 so that the edges of
//! the view rectangle still round to valid pixels.

use crate::scene::{Model, Vertex};

const FUDGE_DIVISOR: f64 = 2.001;

/// Map one image-plane vertex into a w x h pixel-plane (z is zeroed)
pub fn image_to_pixel_plane(v: Vertex, width: i32, height: i32) -> Vertex {
    let w = width as f64;
    let h = height as f64;
    Vertex::new(
        0.5 + w / FUDGE_DIVISOR * (v.x + 1.0),
        0.5 + h / FUDGE_DIVISOR * (v.y + 1.0),
        0.0,
    )
}

/// Map every vertex of an image-plane model into a viewport-sized
/// pixel-plane
pub fn image_plane_to_pixel_plane(model: &Model, width: i32, height: i32) -> Model {
    let vertices = model
        .vertices()
        .iter()
        .map(|&v| image_to_pixel_plane(v, width, height))
        .collect();

    Model::with_vertices(
        model.name.clone(),
        vertices,
        model.primitives.clone(),
        model.visible,
    )
}
