//! Scene state and core simulation types
//!
//! Everything that survives between frames lives here: the ball, the light,
//! and the light-motion tracker. Shadows are rebuilt every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::light::{LightFootprint, LightMotion, LightSource};
use super::shadow::{ObjectId, ShadowPoly, project_shadows};
use super::spawn::plan_spawn;
use crate::level::{BallTuning, LevelConfig};

/// Whether the ball stands on a shadow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Falling or jumping; no support
    Airborne,
    /// Standing on the shadow of `support`, at `u` (0..1) across its x-range
    Grounded { support: ObjectId, u: f32 },
}

/// Why a grounded ball lost its footing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    /// The ball left the light footprint
    OutOfLight,
    /// The ball's extent no longer overlaps the support's x-range
    WalkedOff,
    /// The support object cast no shadow this frame
    SupportMissing,
    /// The support has no top surface at the ball's x
    NoSurface,
    /// The stored anchor could not be mapped onto the reshaped support
    StickFailed,
}

/// Things that happened during a tick, for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelReset {
        spawn: Vec2,
        support: Option<ObjectId>,
    },
    Jumped,
    Landed {
        object_id: ObjectId,
    },
    Dropped {
        reason: DropReason,
    },
    /// The ball rode its support to a new spot after the light moved
    Stuck {
        object_id: ObjectId,
        position: Vec2,
    },
    /// The ball crossed the death line
    Died {
        position: Vec2,
    },
}

/// The avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    /// Vertical acceleration (negative pulls down)
    pub gravity: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(tuning: &BallTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: tuning.radius,
            move_speed: tuning.move_speed,
            jump_speed: tuning.jump_speed,
            gravity: tuning.gravity,
            state: BallState::Airborne,
        }
    }

    /// Place the ball at rest, airborne
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.state = BallState::Airborne;
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        matches!(self.state, BallState::Grounded { .. })
    }

    /// Current support, if grounded
    #[inline]
    pub fn support(&self) -> Option<ObjectId> {
        match self.state {
            BallState::Grounded { support, .. } => Some(support),
            BallState::Airborne => None,
        }
    }

    /// Anchor across the support's x-range, if grounded
    #[inline]
    pub fn support_u(&self) -> Option<f32> {
        match self.state {
            BallState::Grounded { u, .. } => Some(u),
            BallState::Airborne => None,
        }
    }

    pub fn ground(&mut self, support: ObjectId, u: f32) {
        self.state = BallState::Grounded { support, u };
    }

    /// Lose support (keeps position and velocity)
    pub fn drop(&mut self) {
        self.state = BallState::Airborne;
    }

    /// Lowest point of the ball
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.radius
    }
}

/// What rendering reads after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub shadows: Vec<ShadowPoly>,
    pub footprint: LightFootprint,
    pub ball_position: Vec2,
    pub ball_radius: f32,
    /// Shadow under the ball, if grounded
    pub support: Option<ObjectId>,
}

/// A running level: light, ball, and this frame's shadows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub level: LevelConfig,
    pub light: LightSource,
    pub ball: Ball,
    /// Shadows for the current frame (rebuilt every tick)
    pub shadows: Vec<ShadowPoly>,
    /// Previous light position, for stick-on-move
    pub light_motion: LightMotion,
    /// Events emitted during the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Number of times the ball was lost
    pub deaths: u32,
}

impl Scene {
    /// Start a level: light at its spawn, ball on the planned spawn
    pub fn new(level: LevelConfig) -> Self {
        let mut scene = Self {
            light: level.light.clone(),
            ball: Ball::new(&level.ball),
            level,
            shadows: Vec::new(),
            light_motion: LightMotion::default(),
            events: Vec::new(),
            time_ticks: 0,
            deaths: 0,
        };
        scene.reset_level();
        scene
    }

    #[inline]
    pub fn footprint(&self) -> LightFootprint {
        self.light.footprint()
    }

    /// Re-project every object from the current light position
    pub fn rebuild_shadows(&mut self) {
        self.shadows = project_shadows(
            self.light.position,
            self.light.plane_z,
            &self.level.objects,
        );
    }

    /// Restore the light spawn and re-plan the ball's spawn
    ///
    /// The ball lands grounded on the leftmost lit platform; if nothing is
    /// lit it hangs airborne at the footprint centre.
    pub fn reset_level(&mut self) {
        self.light = self.level.light.clone();
        self.light_motion.reset(self.light.position);
        self.rebuild_shadows();

        let plan = plan_spawn(&self.shadows, &self.footprint(), self.ball.radius);
        self.ball.reset(plan.position);
        match plan.support {
            Some((support, u)) => {
                self.ball.ground(support, u);
                log::info!(
                    "Level reset: spawn ({:.2}, {:.2}) on object {}",
                    plan.position.x,
                    plan.position.y,
                    support.0
                );
            }
            None => {
                log::warn!("Level reset: no lit platform, spawning airborne at footprint centre");
            }
        }

        self.events.push(GameEvent::LevelReset {
            spawn: plan.position,
            support: plan.support.map(|(id, _)| id),
        });
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            shadows: self.shadows.clone(),
            footprint: self.footprint(),
            ball_position: self.ball.pos,
            ball_radius: self.ball.radius,
            support: self.ball.support(),
        }
    }
}
