//! Shadow projection: static boxes -> convex silhouettes on the wall
//!
//! Each frame every object's corners are projected through the light onto
//! the wall plane and wrapped in a convex hull. Shadows are rebuilt from
//! scratch every frame and are never clipped to the light footprint; the
//! footprint is enforced at collision time instead.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::{convex_hull, top_y_at_x, x_range};

/// Stable identity of a static scene object (its index in the level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxObject {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoxObject {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// A box standing on the floor (y = 0), like a tower
    pub fn standing(x: f32, z: f32, size: Vec3) -> Self {
        Self::new(Vec3::new(x, size.y * 0.5, z), size)
    }

    /// The 8 world-space corners
    pub fn world_corners(&self) -> [Vec3; 8] {
        let h = self.size * 0.5;
        let c = self.center;
        [
            c + Vec3::new(-h.x, -h.y, -h.z),
            c + Vec3::new(h.x, -h.y, -h.z),
            c + Vec3::new(h.x, h.y, -h.z),
            c + Vec3::new(-h.x, h.y, -h.z),
            c + Vec3::new(-h.x, -h.y, h.z),
            c + Vec3::new(h.x, -h.y, h.z),
            c + Vec3::new(h.x, h.y, h.z),
            c + Vec3::new(-h.x, h.y, h.z),
        ]
    }
}

/// One object's silhouette on the wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowPoly {
    pub object_id: ObjectId,
    /// Convex, counter-clockwise, at least 3 vertices
    pub hull: Vec<Vec2>,
}

impl ShadowPoly {
    /// Horizontal extent of the hull
    #[inline]
    pub fn x_range(&self) -> (f32, f32) {
        x_range(&self.hull)
    }

    /// Upper boundary of the hull at `x`
    #[inline]
    pub fn top_y_at_x(&self, x: f32) -> Option<f32> {
        top_y_at_x(&self.hull, x)
    }

    /// Whether a circle at `x` with `radius` overlaps the hull's x-range
    #[inline]
    pub fn overlaps_x(&self, x: f32, radius: f32) -> bool {
        let (min_x, max_x) = self.x_range();
        x + radius >= min_x && x - radius <= max_x
    }

    /// Usable as a platform
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.hull.len() >= 3
    }
}

/// Look up a shadow by object identity
///
/// A missing id is not an error: the object cast no usable shadow this frame.
pub fn find_shadow(shadows: &[ShadowPoly], id: ObjectId) -> Option<&ShadowPoly> {
    shadows.iter().find(|s| s.object_id == id)
}

/// Project a world point onto the plane `z = plane_z` along the ray from the light
///
/// A point level with the light never reaches the plane; it is dropped
/// straight onto it instead.
pub fn project_to_plane(light: Vec3, point: Vec3, plane_z: f32) -> Vec2 {
    let denom = point.z - light.z;
    if denom.abs() < 1e-6 {
        return point.truncate();
    }
    let t = (plane_z - light.z) / denom;
    (light + (point - light) * t).truncate()
}

/// Silhouette hull of a set of corners, or `None` when it degenerates
pub fn project_silhouette(light: Vec3, corners: &[Vec3], plane_z: f32) -> Option<Vec<Vec2>> {
    let points = corners
        .iter()
        .map(|&c| project_to_plane(light, c, plane_z))
        .collect();
    let hull = convex_hull(points);
    (hull.len() >= 3).then_some(hull)
}

/// Rebuild the frame's shadow set
///
/// Object ids are list indices; objects whose silhouette degenerates are
/// skipped, so ids may have gaps.
pub fn project_shadows(light: Vec3, plane_z: f32, objects: &[BoxObject]) -> Vec<ShadowPoly> {
    objects
        .iter()
        .enumerate()
        .filter_map(|(i, obj)| {
            let hull = project_silhouette(light, &obj.world_corners(), plane_z)?;
            Some(ShadowPoly {
                object_id: ObjectId(i as u32),
                hull,
            })
        })
        .collect()
}
