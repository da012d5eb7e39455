//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Generate vertices for a filled convex polygon (triangle fan from vertex 0)
///
/// Fewer than 3 points produce nothing.
pub fn polygon_fan(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let first = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(first.x, first.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }

    vertices
}

/// Regular `segments`-gon approximating a circle, counter-clockwise
pub fn circle_outline(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    let step = TAU / segments.max(3) as f32;
    (0..segments.max(3))
        .map(|i| center + Vec2::from_angle(i as f32 * step) * radius)
        .collect()
}

/// Filled disc as a fan around its centre, one triangle per rim edge
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let rim = circle_outline(center, radius, segments);
    let hub = Vertex::new(center.x, center.y, color);

    rim.iter()
        .zip(rim.iter().cycle().skip(1))
        .flat_map(|(a, b)| [hub, Vertex::new(a.x, a.y, color), Vertex::new(b.x, b.y, color)])
        .collect()
}
