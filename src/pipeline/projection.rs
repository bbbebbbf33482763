//! Stage 2: camera coordinates to the image plane
//!
//! Perspective projects onto the plane z = -1. By similar triangles through
//! the origin, a camera-space point (x_c, y_c, z_c) lands at
//!
//! ```text
//!     x_p = x_c / -z_c,   y_p = y_c / -z_c,   z_p = -1
//! ```
//!
//! The camera looks down -z, so this expects z_c < 0. A vertex with
//! z_c >= 0 is not guarded against: it divides through and produces a
//! meaningless (possibly infinite or NaN) image-plane point.
//!
//! Parallel projection keeps (x_c, y_c) and sets z to 0.

use crate::scene::{Camera, Model, Projection, Vertex};

/// Project a single camera-space vertex
pub fn project_vertex(v: Vertex, camera: &Camera) -> Vertex {
    match camera.projection {
        Projection::Perspective => Vertex::new(v.x / -v.z, v.y / -v.z, -1.0),
        Projection::Parallel => Vertex::new(v.x, v.y, 0.0),
    }
}

/// Project every vertex of a camera-space model onto the image plane
pub fn project(model: &Model, camera: &Camera) -> Model {
    let vertices = model
        .vertices()
        .iter()
        .map(|&v| project_vertex(v, camera))
        .collect();

    Model::with_vertices(
        model.name.clone(),
        vertices,
        model.primitives.clone(),
        model.visible,
    )
}
