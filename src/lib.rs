//! Wire Renderer: a small software rendering pipeline
//!
//! Renders scenes of points and line segments into an in-memory pixel store:
//! - Framebuffers with any number of viewports over them
//! - Perspective or parallel projection
//! - Per-pixel clipping against the target viewport
//! - PPM (P6) input and output, plus PNG/JPEG/BMP export
//! - Opt-in stage-by-stage pipeline tracing through the `log` facade

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod framebuffer;
pub mod pipeline;
pub mod scene;

pub use framebuffer::{Color, Framebuffer, ImageFileError, Viewport, ViewportHandle};
pub use pipeline::{render, render_viewport, RenderConfig};
pub use scene::{Camera, Model, Position, Primitive, Scene, SceneError, Vec3, Vertex};
