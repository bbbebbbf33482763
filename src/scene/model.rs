//! Models: vertex lists plus the primitives that index into them

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::math::Vertex;

/// A point drawn as a (2r+1) x (2r+1) square of pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub index: usize,
    #[serde(default)]
    pub radius: i32,
}

/// A line segment between two vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub indices: [usize; 2],
}

/// Geometric primitive (indices into the owning model's vertex list)
///
/// Indices must be valid offsets into the model's vertex list; the
/// pipeline does not check this up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Point(Point),
    LineSegment(LineSegment),
}

impl Primitive {
    pub fn point(index: usize) -> Self {
        Primitive::Point(Point { index, radius: 0 })
    }

    pub fn point_with_radius(index: usize, radius: i32) -> Self {
        Primitive::Point(Point { index, radius })
    }

    pub fn line_segment(i0: usize, i1: usize) -> Self {
        Primitive::LineSegment(LineSegment { indices: [i0, i1] })
    }

    /// Vertex indices in order
    pub fn vertex_indices(&self) -> &[usize] {
        match self {
            Primitive::Point(p) => std::slice::from_ref(&p.index),
            Primitive::LineSegment(ls) => &ls.indices,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Point(p) => write!(f, "Point: ([{}], radius={})", p.index, p.radius),
            Primitive::LineSegment(ls) => {
                write!(f, "LineSegment: ([{}, {}])", ls.indices[0], ls.indices[1])
            }
        }
    }
}

/// A model: vertices, primitives, a name and a visibility flag
///
/// Pipeline stages build new models that replace the vertex list but share
/// the primitive list (`Arc`), so topology is never copied or altered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub primitives: Arc<Vec<Primitive>>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

pub(crate) fn default_visible() -> bool {
    true
}

impl Model {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vertices: Vec::new(),
            primitives: Arc::new(Vec::new()),
            visible: true,
        }
    }

    /// Model with a fresh vertex list and a shared primitive list
    pub fn with_vertices(
        name: String,
        vertices: Vec<Vertex>,
        primitives: Arc<Vec<Primitive>>,
        visible: bool,
    ) -> Self {
        Self { name, vertices, primitives, visible }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, v: Vertex) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(v);
        idx
    }

    /// Add a primitive. Copies the primitive list first if a transformed
    /// model still shares it.
    pub fn add_primitive(&mut self, p: Primitive) {
        Arc::make_mut(&mut self.primitives).push(p);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
}
