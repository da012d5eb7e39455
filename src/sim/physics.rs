//! Ball physics state machine
//!
//! One call to [`Ball::step`] advances the ball by one frame against the
//! frame's shadows and footprint. The order of the stages matters: the
//! footprint gate runs before anything can ground the ball, and a failed
//! stage always falls back to "airborne, no support".

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{block_walls, resolve_one_way};
use super::light::LightFootprint;
use super::shadow::{ObjectId, ShadowPoly, find_shadow};
use super::state::{Ball, BallState, DropReason, GameEvent};
use crate::consts::LANDING_EPSILON;

/// How an airborne ball decides it has landed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingMode {
    /// The ball's bottom crossed a top surface between frames
    #[default]
    Crossing,
    /// Penetrations are resolved with the one-way top-surface resolver
    OneWayResolve,
}

/// Per-frame ball intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallInput {
    /// -1 left, 0 none, +1 right
    pub move_dir: i8,
    /// Jump edge trigger (true once per press)
    pub jump: bool,
}

/// The frame's geometry as seen by the ball
#[derive(Debug, Clone, Copy)]
pub struct World<'a> {
    pub shadows: &'a [ShadowPoly],
    pub footprint: LightFootprint,
    pub landing: LandingMode,
}

/// Normalized position of `x` across a shadow's x-range
pub fn support_u(shadow: &ShadowPoly, x: f32) -> f32 {
    let (min_x, max_x) = shadow.x_range();
    let width = (max_x - min_x).max(1e-5);
    ((x - min_x) / width).clamp(0.0, 1.0)
}

/// Top surface of `support` under a ball at `pos`
fn support_surface(
    shadows: &[ShadowPoly],
    support: ObjectId,
    pos: Vec2,
    radius: f32,
) -> Result<f32, DropReason> {
    let shadow = find_shadow(shadows, support)
        .filter(|s| s.is_solid())
        .ok_or(DropReason::SupportMissing)?;

    // Overlap rather than a centre test, so the ball can roll off an edge
    if !shadow.overlaps_x(pos.x, radius) {
        return Err(DropReason::WalkedOff);
    }

    let (min_x, max_x) = shadow.x_range();
    shadow
        .top_y_at_x(pos.x.clamp(min_x, max_x))
        .ok_or(DropReason::NoSurface)
}

impl Ball {
    /// Drop and report why, if the ball was standing
    pub(crate) fn drop_because(&mut self, reason: DropReason, events: &mut Vec<GameEvent>) {
        if self.is_grounded() {
            log::debug!("Ball dropped: {:?}", reason);
            events.push(GameEvent::Dropped { reason });
        }
        self.drop();
    }

    /// Advance one frame
    pub fn step(
        &mut self,
        input: BallInput,
        dt: f32,
        world: &World<'_>,
        events: &mut Vec<GameEvent>,
    ) {
        // Instant horizontal response, gravity always applies
        self.vel.x = input.move_dir.signum() as f32 * self.move_speed;
        self.vel.y += self.gravity * dt;

        if self.is_grounded() && input.jump {
            self.vel.y = self.jump_speed;
            self.drop();
            events.push(GameEvent::Jumped);
        }

        let prev_pos = self.pos;
        self.pos += self.vel * dt;

        // Outside the light nothing can hold the ball. Checked on the
        // integrated position, so a rim ball under the light's centre can
        // lose its footing to one tick of gravity before the snap.
        if !world.footprint.contains_ball(self.pos, self.radius) {
            self.drop_because(DropReason::OutOfLight, events);
            return;
        }

        // The support may have moved or reshaped since last frame
        if let BallState::Grounded { support, .. } = self.state {
            match support_surface(world.shadows, support, self.pos, self.radius) {
                Ok(y_top) => {
                    self.pos.y = y_top + self.radius;
                    self.vel.y = 0.0;
                }
                Err(reason) => {
                    self.drop_because(reason, events);
                    return;
                }
            }
        }

        if !self.is_grounded() {
            for shadow in world.shadows {
                block_walls(
                    &shadow.hull,
                    prev_pos,
                    &mut self.pos,
                    &mut self.vel,
                    self.radius,
                );
            }

            if self.vel.y <= 0.0 {
                let landed = match world.landing {
                    LandingMode::Crossing => self.land_by_crossing(prev_pos, world),
                    LandingMode::OneWayResolve => self.land_by_resolve(world),
                };
                if let Some(object_id) = landed {
                    log::debug!("Ball landed on object {}", object_id.0);
                    events.push(GameEvent::Landed { object_id });
                }
            }
        }

        if let BallState::Grounded { support, .. } = self.state {
            if let Some(shadow) = find_shadow(world.shadows, support) {
                self.ground(support, support_u(shadow, self.pos.x));
            }
        }
    }

    /// Land on the highest lit top surface the ball's bottom passed through
    fn land_by_crossing(&mut self, prev_pos: Vec2, world: &World<'_>) -> Option<ObjectId> {
        let prev_bottom = prev_pos.y - self.radius;
        let new_bottom = self.bottom();

        let mut best: Option<(f32, ObjectId)> = None;
        for shadow in world.shadows.iter().filter(|s| s.is_solid()) {
            if !shadow.overlaps_x(self.pos.x, self.radius) {
                continue;
            }

            let (min_x, max_x) = shadow.x_range();
            let Some(y_top) = shadow.top_y_at_x(self.pos.x.clamp(min_x, max_x)) else {
                continue;
            };

            let crossed =
                prev_bottom >= y_top - LANDING_EPSILON && new_bottom <= y_top + LANDING_EPSILON;
            if !crossed {
                continue;
            }

            let landing = Vec2::new(self.pos.x, y_top + self.radius);
            if !world.footprint.contains_ball(landing, self.radius) {
                continue;
            }

            if best.is_none_or(|(y, _)| y_top > y) {
                best = Some((y_top, shadow.object_id));
            }
        }

        let (y_top, object_id) = best?;
        self.pos.y = y_top + self.radius;
        self.vel.y = 0.0;
        self.ground(object_id, 0.5);
        Some(object_id)
    }

    /// Land by pushing the ball up out of whatever it sank into
    fn land_by_resolve(&mut self, world: &World<'_>) -> Option<ObjectId> {
        let result = resolve_one_way(self.pos, self.vel, self.radius, world.shadows);
        let object_id = result.support?;
        if !world.footprint.contains_ball(result.position, self.radius) {
            return None;
        }

        self.pos = result.position;
        self.vel = result.velocity;
        self.ground(object_id, 0.5);
        Some(object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::BallTuning;

    const DT: f32 = 1.0 / 120.0;

    fn slab(object_id: u32, min_x: f32, max_x: f32, top: f32) -> ShadowPoly {
        ShadowPoly {
            object_id: ObjectId(object_id),
            hull: vec![
                Vec2::new(min_x, top - 1.0),
                Vec2::new(max_x, top - 1.0),
                Vec2::new(max_x, top),
                Vec2::new(min_x, top),
            ],
        }
    }

    fn wide_light() -> LightFootprint {
        LightFootprint {
            center: Vec2::new(0.0, 4.0),
            radius: 100.0,
        }
    }

    fn ball_at(pos: Vec2) -> Ball {
        let mut ball = Ball::new(&BallTuning {
            radius: 0.5,
            ..Default::default()
        });
        ball.reset(pos);
        ball
    }

    fn world(shadows: &[ShadowPoly]) -> World<'_> {
        World {
            shadows,
            footprint: wide_light(),
            landing: LandingMode::Crossing,
        }
    }

    #[test]
    fn test_support_u_clamps() {
        let s = slab(0, 0.0, 4.0, 2.0);
        assert_eq!(support_u(&s, 1.0), 0.25);
        assert_eq!(support_u(&s, -3.0), 0.0);
        assert_eq!(support_u(&s, 9.0), 1.0);
    }

    #[test]
    fn test_grounded_ball_stays_put_and_tracks_u() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(1.0, 2.5));
        ball.ground(ObjectId(0), 0.25);
        let mut events = Vec::new();

        for _ in 0..60 {
            ball.step(BallInput::default(), DT, &world(&shadows), &mut events);
        }

        assert_eq!(ball.support(), Some(ObjectId(0)));
        assert_eq!(ball.pos, Vec2::new(1.0, 2.5));
        assert_eq!(ball.vel.y, 0.0);
        assert_eq!(ball.support_u(), Some(0.25));
        assert!(events.is_empty());
    }

    #[test]
    fn test_grounded_ball_follows_sinking_platform() {
        let mut ball = ball_at(Vec2::new(2.0, 2.5));
        ball.ground(ObjectId(0), 0.5);
        let shadows = [slab(0, 0.0, 4.0, 1.5)];
        let mut events = Vec::new();
        ball.step(BallInput::default(), DT, &world(&shadows), &mut events);
        assert!(ball.is_grounded());
        assert!((ball.pos.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_walk_off_edge_drops_without_snap() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(3.9, 2.5));
        ball.ground(ObjectId(0), 0.95);
        let right = BallInput {
            move_dir: 1,
            jump: false,
        };
        let mut events = Vec::new();

        let mut last_y = ball.pos.y;
        while ball.is_grounded() {
            last_y = ball.pos.y;
            ball.step(right, DT, &world(&shadows), &mut events);
        }

        // Released once the ball no longer overlaps the platform at all
        assert!(ball.pos.x - ball.radius > 4.0);
        assert_eq!(ball.support(), None);
        // The transition frame only integrates one step of gravity
        let one_step = -ball.gravity * DT * DT;
        assert!((last_y - ball.pos.y - one_step).abs() < 1e-5);
        assert_eq!(
            events,
            vec![GameEvent::Dropped {
                reason: DropReason::WalkedOff
            }]
        );
    }

    #[test]
    fn test_missing_support_drops() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(2.0, 2.5));
        ball.ground(ObjectId(9), 0.5);
        let mut events = Vec::new();
        ball.step(BallInput::default(), DT, &world(&shadows), &mut events);
        assert!(!ball.is_grounded());
        assert_eq!(
            events,
            vec![GameEvent::Dropped {
                reason: DropReason::SupportMissing
            }]
        );
    }

    fn rim_light(ball: Vec2, dir: Vec2, slack: f32) -> LightFootprint {
        // Radius 3 footprint with the 0.5 ball `slack` inside its rim
        LightFootprint {
            center: ball + dir * (3.0 - 0.5 - slack),
            radius: 3.0,
        }
    }

    #[test]
    fn test_still_ball_just_inside_rim_stays_grounded() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let pos = Vec2::new(2.0, 2.5);
        for dir in [Vec2::X, Vec2::NEG_X] {
            let mut ball = ball_at(pos);
            ball.ground(ObjectId(0), 0.5);
            let w = World {
                shadows: &shadows,
                footprint: rim_light(pos, dir, 5e-4),
                landing: LandingMode::Crossing,
            };
            let mut events = Vec::new();
            ball.step(BallInput::default(), DT, &w, &mut events);
            assert_eq!(ball.support(), Some(ObjectId(0)));
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_gravity_step_can_carry_rim_ball_out_below_light() {
        // Light centre straight above: the pre-snap gravity step moves the
        // ball 1.25e-3 away from it, more than the 1e-3 of slack
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let pos = Vec2::new(2.0, 2.5);
        let mut ball = ball_at(pos);
        ball.ground(ObjectId(0), 0.5);
        let w = World {
            shadows: &shadows,
            footprint: rim_light(pos, Vec2::Y, 1e-3),
            landing: LandingMode::Crossing,
        };
        let mut events = Vec::new();
        ball.step(BallInput::default(), DT, &w, &mut events);
        assert!(!ball.is_grounded());
        assert_eq!(
            events,
            vec![GameEvent::Dropped {
                reason: DropReason::OutOfLight
            }]
        );
    }

    #[test]
    fn test_leaving_footprint_drops_immediately() {
        let shadows = [slab(0, -50.0, 50.0, 2.0)];
        let mut ball = ball_at(Vec2::new(4.0, 2.5));
        ball.ground(ObjectId(0), 0.5);
        let w = World {
            shadows: &shadows,
            footprint: LightFootprint {
                center: Vec2::new(0.0, 2.5),
                radius: 4.51,
            },
            landing: LandingMode::Crossing,
        };
        let mut events = Vec::new();
        ball.step(
            BallInput {
                move_dir: 1,
                jump: false,
            },
            DT,
            &w,
            &mut events,
        );
        assert!(!ball.is_grounded());
        assert_eq!(ball.support(), None);
        assert_eq!(
            events,
            vec![GameEvent::Dropped {
                reason: DropReason::OutOfLight
            }]
        );
    }

    #[test]
    fn test_jump_leaves_ground() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(2.0, 2.5));
        ball.ground(ObjectId(0), 0.5);
        let mut events = Vec::new();
        ball.step(
            BallInput {
                move_dir: 0,
                jump: true,
            },
            DT,
            &world(&shadows),
            &mut events,
        );
        assert!(!ball.is_grounded());
        assert!(ball.pos.y > 2.5);
        assert_eq!(ball.vel.y, ball.jump_speed);
        assert_eq!(events, vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_falling_ball_lands_on_top() {
        let shadows = [slab(4, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(2.0, 4.0));
        let mut events = Vec::new();
        for _ in 0..240 {
            ball.step(BallInput::default(), DT, &world(&shadows), &mut events);
            if ball.is_grounded() {
                break;
            }
        }
        assert_eq!(ball.support(), Some(ObjectId(4)));
        assert!((ball.pos.y - 2.5).abs() < 1e-5);
        assert_eq!(ball.vel.y, 0.0);
        assert_eq!(ball.support_u(), Some(0.5));
        assert!(events.contains(&GameEvent::Landed {
            object_id: ObjectId(4)
        }));
    }

    #[test]
    fn test_rising_ball_passes_up_through_top() {
        // Tall shadow, ball starts inside it and jumps out through the top
        let shadows = [ShadowPoly {
            object_id: ObjectId(0),
            hull: vec![
                Vec2::new(0.0, -2.0),
                Vec2::new(4.0, -2.0),
                Vec2::new(4.0, 2.0),
                Vec2::new(0.0, 2.0),
            ],
        }];
        let mut ball = ball_at(Vec2::new(2.0, -0.5));
        ball.vel.y = 12.0;
        let mut events = Vec::new();
        let mut passed_through = false;
        for _ in 0..240 {
            ball.step(BallInput::default(), DT, &world(&shadows), &mut events);
            if ball.vel.y > 0.0 {
                assert!(!ball.is_grounded());
            }
            if ball.bottom() > 2.0 {
                passed_through = true;
            }
            if ball.is_grounded() {
                break;
            }
        }
        assert!(passed_through);
        // Coming back down it lands on the top it rose through
        assert_eq!(ball.support(), Some(ObjectId(0)));
        assert!((ball.pos.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_landing_prefers_highest_surface() {
        let shadows = [slab(1, -2.0, 2.0, 3.0), slab(2, -2.0, 2.0, 5.0)];
        let mut ball = ball_at(Vec2::new(0.0, 5.7));
        // Fast enough to cross both tops in one frame
        ball.vel.y = -230.0;
        let mut events = Vec::new();
        ball.step(BallInput::default(), 0.01, &world(&shadows), &mut events);
        assert_eq!(ball.support(), Some(ObjectId(2)));
        assert!((ball.pos.y - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_no_landing_where_the_ball_would_be_unlit() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(2.0, 2.5));
        ball.vel.y = -6.0;
        let w = World {
            shadows: &shadows,
            // The sunk ball is lit, the snapped landing spot is not
            footprint: LightFootprint {
                center: Vec2::new(2.0, 0.0),
                radius: 2.97,
            },
            landing: LandingMode::Crossing,
        };
        let mut events = Vec::new();
        ball.step(BallInput::default(), DT, &w, &mut events);
        assert!(!ball.is_grounded());
        assert!(ball.pos.y < 2.5);
        assert!(events.is_empty());
    }

    #[test]
    fn test_airborne_ball_blocked_by_wall() {
        let shadows = [slab(0, 0.0, 4.0, 6.0)];
        let mut ball = ball_at(Vec2::new(-0.52, 5.5));
        let mut events = Vec::new();
        ball.step(
            BallInput {
                move_dir: 1,
                jump: false,
            },
            DT,
            &world(&shadows),
            &mut events,
        );
        assert!(ball.pos.x <= -0.5);
        assert_eq!(ball.vel.x, 0.0);
    }

    #[test]
    fn test_one_way_resolve_mode_lands() {
        let shadows = [slab(7, 0.0, 4.0, 2.0)];
        let mut ball = ball_at(Vec2::new(2.0, 2.6));
        ball.vel.y = -12.0;
        let w = World {
            shadows: &shadows,
            footprint: wide_light(),
            landing: LandingMode::OneWayResolve,
        };
        let mut events = Vec::new();
        ball.step(BallInput::default(), DT, &w, &mut events);
        assert_eq!(ball.support(), Some(ObjectId(7)));
        assert!((ball.pos.y - 2.5).abs() < 1e-4);
        assert_eq!(
            events,
            vec![GameEvent::Landed {
                object_id: ObjectId(7)
            }]
        );
    }
}
