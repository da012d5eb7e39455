//! Shadow Walk - a ball that lives on the shadows of a moving light
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (shadow projection, collisions, ball physics)
//! - `mesh`: Render-ready vertex data built from simulation snapshots
//! - `level`: Data-driven level configuration
//! - `clock`: Fixed timestep frame clock

pub mod clock;
pub mod level;
pub mod mesh;
pub mod sim;

pub use clock::FrameClock;
pub use level::{BallTuning, LevelConfig};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame the clock will accept (stalls beyond this are dropped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball defaults (wall-plane units)
    pub const BALL_RADIUS: f32 = 0.22;
    pub const BALL_MOVE_SPEED: f32 = 4.2;
    pub const BALL_JUMP_SPEED: f32 = 15.0;
    pub const BALL_GRAVITY: f32 = -18.0;

    /// Light defaults
    pub const LIGHT_FOV_DEG: f32 = 75.0;
    pub const LIGHT_FOV_MIN_DEG: f32 = 10.0;
    pub const LIGHT_FOV_MAX_DEG: f32 = 80.0;
    /// Cone widen/narrow rate (degrees per second)
    pub const LIGHT_FOV_RATE: f32 = 40.0;
    pub const LIGHT_MOVE_SPEED: f32 = 5.0;
    /// Light position change that counts as "the light moved"
    pub const LIGHT_MOVE_EPSILON: f32 = 1e-4;

    /// Vertices closer than this are merged before hull construction
    pub const HULL_EPSILON: f32 = 1e-5;
    /// Room left inside the footprint rim for a planned spawn, so the first
    /// tick of gravity can't carry a fresh ball out of the light
    pub const SPAWN_RIM_MARGIN: f32 = 2e-3;
    /// Tolerance on the landing crossing test
    pub const LANDING_EPSILON: f32 = 1e-3;
    /// Push-out skin for the side/ceiling resolver
    pub const WALL_SKIN: f32 = 1e-3;
    /// Relaxation passes for the collision resolvers
    pub const RESOLVER_ITERATIONS: usize = 4;
    /// Horizontal samples per polygon when planning a spawn
    pub const SPAWN_SAMPLES: usize = 11;

    /// Wall-plane y below which the ball is lost
    pub const DEATH_Y: f32 = 0.0;
}

/// 2D cross product of (a - o) and (b - o)
///
/// Positive when o -> a -> b turns left (counter-clockwise).
#[inline]
pub fn cross2(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

/// Normalize a vector, falling back to +Y for near-zero input
#[inline]
pub fn normalize_or_up(v: Vec2) -> Vec2 {
    if v.length_squared() < 1e-10 {
        Vec2::Y
    } else {
        v.normalize()
    }
}
