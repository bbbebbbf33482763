//! Scene graph types consumed by the pipeline
//!
//! - Positions place a model with a translation vector
//! - Models hold vertices plus point / line-segment primitives
//! - The camera only chooses perspective or parallel projection

mod graph;
mod io;
mod math;
mod model;

pub use graph::*;
pub use io::{load_scene, load_scene_from_str, save_scene, SceneError};
pub(crate) use io::pretty_config;
pub use math::*;
pub use model::{LineSegment, Model, Point, Primitive};
