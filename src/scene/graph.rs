//! Scene graph: camera, positioned models, and the scene itself

use std::fmt;

use serde::{Deserialize, Serialize};

use super::math::Vec3;
use super::model::{default_visible, Model};

/// Projection mode of the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Looks down -z; every camera-space z should be negative
    Perspective,
    /// Orthographic along -z
    Parallel,
}

/// Camera at the origin looking down the negative z-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub projection: Projection,
}

impl Camera {
    pub fn perspective() -> Self {
        Self { projection: Projection::Perspective }
    }

    pub fn parallel() -> Self {
        Self { projection: Projection::Parallel }
    }

    pub fn is_perspective(&self) -> bool {
        self.projection == Projection::Perspective
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective()
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Camera: perspective = {}", self.is_perspective())
    }
}

/// A model placed in the scene by a translation vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    pub model: Model,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Dump pipeline stages for this position
    #[serde(default)]
    pub debug: bool,
}

impl Position {
    pub fn new(name: &str, model: Model) -> Self {
        Self {
            name: name.to_string(),
            model,
            translation: Vec3::ZERO,
            visible: true,
            debug: false,
        }
    }

    /// Set the translation vector (replaces, does not accumulate)
    pub fn translate(mut self, x: f64, y: f64, z: f64) -> Self {
        self.translation = Vec3::new(x, y, z);
        self
    }
}

/// Ordered list of positions seen through one camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Dump pipeline stages for every position
    #[serde(default)]
    pub debug: bool,
}

impl Scene {
    pub fn new(name: &str, camera: Camera) -> Self {
        Self {
            name: name.to_string(),
            camera,
            positions: Vec::new(),
            debug: false,
        }
    }

    /// Append a position; render order is insertion order
    pub fn add_position(&mut self, position: Position) {
        self.positions.push(position);
    }
}
