//! Level configuration
//!
//! A level is static data: the boxes that cast shadows, where the light
//! starts, how the ball handles, and where the ball is lost. Levels are
//! stored as JSON; any field left out falls back to the built-in level.

use std::path::Path;

use anyhow::{Context, ensure};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{BoxObject, LandingMode, LightSource};

/// Ball handling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub radius: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Vertical speed given by a jump
    pub jump_speed: f32,
    /// Vertical acceleration (negative pulls down)
    pub gravity: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            move_speed: BALL_MOVE_SPEED,
            jump_speed: BALL_JUMP_SPEED,
            gravity: BALL_GRAVITY,
        }
    }
}

/// A complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    /// Shadow casters; an object's index is its identity
    pub objects: Vec<BoxObject>,
    /// Light state at level start (and after every reset)
    pub light: LightSource,
    pub ball: BallTuning,
    /// Ball is lost once its bottom reaches this y
    pub death_y: f32,
    pub landing: LandingMode,
}

/// Cardboard towers with a plank laid across the top
fn builtin_objects() -> Vec<BoxObject> {
    vec![
        BoxObject::standing(-8.0, 6.0, Vec3::new(3.2, 9.0, 3.2)),
        BoxObject::standing(-2.0, 6.5, Vec3::new(3.8, 12.0, 3.4)),
        BoxObject::standing(6.0, 6.0, Vec3::new(3.0, 10.0, 4.6)),
        // Plank on top
        BoxObject::new(Vec3::new(1.5, 12.2, 6.0), Vec3::new(18.0, 0.45, 1.2)),
    ]
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "Cardboard Towers".to_string(),
            objects: builtin_objects(),
            light: LightSource {
                position: Vec3::new(-6.0, 10.0, 12.0),
                ..Default::default()
            },
            ball: BallTuning::default(),
            death_y: DEATH_Y,
            landing: LandingMode::default(),
        }
    }
}

impl LevelConfig {
    /// Parse a level from JSON and validate it
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let level: Self = serde_json::from_str(json).context("invalid level JSON")?;
        level.validate()?;
        Ok(level)
    }

    /// Load a level file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?;
        let level =
            Self::from_json(&json).with_context(|| format!("in level {}", path.display()))?;
        log::info!(
            "Loaded level '{}' ({} objects) from {}",
            level.name,
            level.objects.len(),
            path.display()
        );
        Ok(level)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize level")
    }

    /// Reject levels the simulation can't run sensibly
    pub fn validate(&self) -> anyhow::Result<()> {
        let b = &self.ball;
        ensure!(
            b.radius.is_finite() && b.radius > 0.0,
            "ball radius must be positive, got {}",
            b.radius
        );
        ensure!(
            b.move_speed.is_finite() && b.jump_speed.is_finite() && b.gravity.is_finite(),
            "ball tuning must be finite"
        );

        let l = &self.light;
        ensure!(
            l.position.is_finite() && l.plane_z.is_finite() && l.move_speed.is_finite(),
            "light must be finite"
        );
        ensure!(
            l.position.z > l.plane_z,
            "light (z = {}) must be in front of the wall plane (z = {})",
            l.position.z,
            l.plane_z
        );
        ensure!(
            (LIGHT_FOV_MIN_DEG..=LIGHT_FOV_MAX_DEG).contains(&l.fov_deg),
            "light fov {} outside [{}, {}]",
            l.fov_deg,
            LIGHT_FOV_MIN_DEG,
            LIGHT_FOV_MAX_DEG
        );

        for (i, obj) in self.objects.iter().enumerate() {
            ensure!(
                obj.center.is_finite() && obj.size.is_finite(),
                "object {i} is not finite"
            );
            ensure!(
                obj.size.cmpgt(Vec3::ZERO).all(),
                "object {i} has non-positive size {:?}",
                obj.size
            );
        }

        ensure!(self.death_y.is_finite(), "death_y must be finite");
        Ok(())
    }
}
