//! Vector math for the scene graph

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// 3D vector; also used for vertex positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A model vertex is just a position
pub type Vertex = Vec3;

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:24.16}, {:24.16}, {:24.16})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_add() {
        let v = Vec3::new(1.0, 2.0, 3.0) + Vec3::new(0.5, -2.0, -5.0);
        assert_eq!(v, Vec3::new(1.5, 0.0, -2.0));
    }

    #[test]
    fn test_vec3_display() {
        let s = Vec3::new(1.0, -0.5, 0.0).to_string();
        assert_eq!(s, format!("({:24.16}, {:24.16}, {:24.16})", 1.0, -0.5, 0.0));
        assert!(s.contains("1.0000000000000000"));
        assert!(s.contains("-0.5000000000000000"));
    }
}
