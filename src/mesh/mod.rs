//! Render-ready geometry built from simulation snapshots
//!
//! The simulation never draws; a presentation layer uploads these vertex
//! lists as triangle lists.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, colors};

use crate::sim::FrameSnapshot;

/// Segments used for the ball
const CIRCLE_SEGMENTS: u32 = 48;

/// One frame's triangles, in draw order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMesh {
    /// Shadow polygons, support highlighted
    pub shadows: Vec<Vertex>,
    pub ball: Vec<Vertex>,
}

impl FrameMesh {
    pub fn build(snapshot: &FrameSnapshot) -> Self {
        let shadows = snapshot
            .shadows
            .iter()
            .flat_map(|shadow| {
                let color = if snapshot.support == Some(shadow.object_id) {
                    colors::SUPPORT
                } else {
                    colors::SHADOW
                };
                shapes::polygon_fan(&shadow.hull, color)
            })
            .collect();

        let ball = shapes::circle(
            snapshot.ball_position,
            snapshot.ball_radius,
            colors::BALL,
            CIRCLE_SEGMENTS,
        );

        Self { shadows, ball }
    }

    /// All triangles in draw order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.shadows.iter().chain(&self.ball)
    }

    pub fn vertex_count(&self) -> usize {
        self.shadows.len() + self.ball.len()
    }

    /// Pack into a single buffer-ready byte vector
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.vertex_count() * Vertex::STRIDE);
        for part in [&self.shadows, &self.ball] {
            bytes.extend_from_slice(bytemuck::cast_slice(part.as_slice()));
        }
        bytes
    }
}
