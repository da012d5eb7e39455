//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for scene elements
pub mod colors {
    pub const SHADOW: [f32; 4] = [0.05, 0.04, 0.04, 0.85];
    /// Shadow the ball is standing on
    pub const SUPPORT: [f32; 4] = [0.12, 0.08, 0.05, 0.95];
    pub const BALL: [f32; 4] = [0.95, 0.55, 0.2, 1.0];
}
