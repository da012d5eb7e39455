//! Spotlight and its circular footprint on the wall plane
//!
//! The footprint is the only playable area: the ball may stand, land, and
//! collide only while its whole circle lies inside it.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Illuminated circle on the wall plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightFootprint {
    pub center: Vec2,
    pub radius: f32,
}

impl LightFootprint {
    /// Whether a circle lies fully inside the footprint, with `margin` of slack
    /// taken off the footprint radius
    #[inline]
    pub fn contains_circle(&self, center: Vec2, radius: f32, margin: f32) -> bool {
        center.distance(self.center) + radius <= self.radius - margin
    }

    /// Whether a ball at `center` is lit
    #[inline]
    pub fn contains_ball(&self, center: Vec2, radius: f32) -> bool {
        self.contains_circle(center, radius, 0.0)
    }
}

/// Per-frame light steering intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightInput {
    /// Horizontal move direction (-1, 0, +1)
    pub dx: i8,
    /// Vertical move direction (-1, 0, +1)
    pub dy: i8,
    /// Cone change: +1 widens, -1 narrows
    pub fov: i8,
}

/// The player-held spotlight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSource {
    /// World position (z is fixed while steering)
    pub position: Vec3,
    /// Full cone angle in degrees
    pub fov_deg: f32,
    /// Steering speed in wall units per second
    pub move_speed: f32,
    /// Z of the wall plane that receives shadows
    pub plane_z: f32,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            fov_deg: LIGHT_FOV_DEG,
            move_speed: LIGHT_MOVE_SPEED,
            plane_z: 0.0,
        }
    }
}

impl LightSource {
    /// Footprint centre: the point on the wall directly beneath the light
    #[inline]
    pub fn footprint_center(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Footprint radius: `tan(fov / 2) * distance to plane`
    #[inline]
    pub fn footprint_radius(&self) -> f32 {
        let h = self.position.z - self.plane_z;
        (self.fov_deg * 0.5).to_radians().tan() * h
    }

    pub fn footprint(&self) -> LightFootprint {
        LightFootprint {
            center: self.footprint_center(),
            radius: self.footprint_radius(),
        }
    }

    /// Apply one frame of steering input
    ///
    /// Movement is normalized so diagonals are not faster; only x/y change.
    /// The cone angle is clamped to the allowed range.
    pub fn steer(&mut self, input: &LightInput, dt: f32) {
        let dir = Vec2::new(input.dx.signum() as f32, input.dy.signum() as f32);
        if dir != Vec2::ZERO {
            let applied = dir.normalize() * self.move_speed * dt;
            self.position.x += applied.x;
            self.position.y += applied.y;
        }

        match input.fov.signum() {
            1 => self.fov_deg = (self.fov_deg + LIGHT_FOV_RATE * dt).min(LIGHT_FOV_MAX_DEG),
            -1 => self.fov_deg = (self.fov_deg - LIGHT_FOV_RATE * dt).max(LIGHT_FOV_MIN_DEG),
            _ => {}
        }
    }
}

/// Tracks the light position between frames to detect motion
///
/// Owned by the scene so that independent simulations never share it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightMotion {
    last: Option<Vec3>,
}

impl LightMotion {
    /// Record this frame's position; true when it moved since the last call
    ///
    /// The first observation never counts as motion.
    pub fn observe(&mut self, position: Vec3) -> bool {
        let moved = self
            .last
            .is_some_and(|last| last.distance(position) > LIGHT_MOVE_EPSILON);
        self.last = Some(position);
        moved
    }

    /// Re-anchor at `position` so a level reset's teleport is not read as motion
    pub fn reset(&mut self, position: Vec3) {
        self.last = Some(position);
    }
}
