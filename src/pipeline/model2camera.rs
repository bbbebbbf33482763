//! Stage 1: model coordinates to camera coordinates
//!
//! The camera sits at the origin, so placing a model is just adding the
//! position's translation vector to every vertex.

use crate::scene::{Model, Position};

/// Translate every vertex of the position's model. The source model is left
/// untouched; the result shares its primitive list.
pub fn model2camera(position: &Position) -> Model {
    let model = &position.model;
    let translation = position.translation;

    let vertices = model.vertices().iter().map(|&v| v + translation).collect();

    Model::with_vertices(
        format!("{}::{}", position.name, model.name),
        vertices,
        model.primitives.clone(),
        model.visible,
    )
}
