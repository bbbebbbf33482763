//! Render settings passed explicitly into each render call

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scene::{pretty_config, SceneError};

/// Rasterizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Drop pixels that fall outside the viewport (per pixel, no segment trimming)
    pub clipping: bool,
    /// Dump every stage's vertices/primitives and every rasterized pixel at
    /// `debug` level
    pub trace: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clipping: true,
            trace: false,
        }
    }
}

impl RenderConfig {
    pub fn with_clipping(mut self, clipping: bool) -> Self {
        self.clipping = clipping;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn from_ron_str(s: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(s)?)
    }
}

/// Load render settings from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, SceneError> {
    let contents = fs::read_to_string(path)?;
    RenderConfig::from_ron_str(&contents)
}

/// Save render settings to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), SceneError> {
    let contents = ron::ser::to_string_pretty(config, pretty_config())?;
    fs::write(path, contents)?;
    Ok(())
}
