//! Keeping a standing ball attached to its support while the light moves
//!
//! When the light moves every shadow translates and reshapes. A grounded
//! ball rides its support by keeping its anchor `u` across the support's
//! x-range and re-reading the top surface there.

use glam::Vec2;

use super::light::LightFootprint;
use super::shadow::{ObjectId, ShadowPoly, find_shadow};
use super::state::{Ball, BallState, DropReason, GameEvent};

/// What the stick pass did to the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickOutcome {
    /// Nothing to do; the ball was airborne
    NotGrounded,
    /// The ball was moved onto its reshaped support
    Stuck { object_id: ObjectId, position: Vec2 },
    /// The ball lost its support
    Dropped(DropReason),
}

impl StickOutcome {
    /// Event to report, if any
    pub fn event(&self) -> Option<GameEvent> {
        match *self {
            Self::NotGrounded => None,
            Self::Stuck {
                object_id,
                position,
            } => Some(GameEvent::Stuck {
                object_id,
                position,
            }),
            Self::Dropped(reason) => Some(GameEvent::Dropped { reason }),
        }
    }
}

/// Drop a standing ball that is no longer fully lit
///
/// Returns true when the ball was dropped.
pub fn drop_if_unlit(ball: &mut Ball, footprint: &LightFootprint) -> bool {
    if ball.is_grounded() && !footprint.contains_ball(ball.pos, ball.radius) {
        ball.drop();
        return true;
    }
    false
}

/// Move a standing ball to its anchor on the support's new shape
///
/// Containment is checked against the ball's current position before any
/// relocation, so a ball the light has left behind drops even if its
/// support moved back under the light.
pub fn stick_to_support(
    ball: &mut Ball,
    shadows: &[ShadowPoly],
    footprint: &LightFootprint,
) -> StickOutcome {
    let BallState::Grounded { support, u } = ball.state else {
        return StickOutcome::NotGrounded;
    };

    match anchor_position(ball, support, u, shadows, footprint) {
        Ok(position) => {
            ball.pos = position;
            ball.vel.y = 0.0;
            ball.ground(support, u);
            StickOutcome::Stuck {
                object_id: support,
                position,
            }
        }
        Err(reason) => {
            ball.drop();
            StickOutcome::Dropped(reason)
        }
    }
}

fn anchor_position(
    ball: &Ball,
    support: ObjectId,
    u: f32,
    shadows: &[ShadowPoly],
    footprint: &LightFootprint,
) -> Result<Vec2, DropReason> {
    if !footprint.contains_ball(ball.pos, ball.radius) {
        return Err(DropReason::OutOfLight);
    }

    let shadow = find_shadow(shadows, support)
        .filter(|s| s.is_solid())
        .ok_or(DropReason::SupportMissing)?;

    let (min_x, max_x) = shadow.x_range();
    let width = (max_x - min_x).max(1e-5);
    let x = min_x + u.clamp(0.0, 1.0) * width;
    // Also rejects NaN
    if !(min_x..=max_x).contains(&x) {
        return Err(DropReason::StickFailed);
    }

    let y_top = shadow.top_y_at_x(x).ok_or(DropReason::NoSurface)?;
    Ok(Vec2::new(x, y_top + ball.radius))
}
