//! Fixed timestep simulation tick
//!
//! One tick runs the whole frame pipeline in a fixed order: steer the light,
//! rebuild shadows and footprint, drop an unlit ball, stick the ball to its
//! support if the light moved, run ball physics, then check the death line.

use super::light::LightInput;
use super::physics::{BallInput, World};
use super::state::{DropReason, GameEvent, Scene};
use super::stick::{drop_if_unlit, stick_to_support};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Ball horizontal intent: -1 left, 0 none, +1 right
    pub move_dir: i8,
    /// Jump, true only on the tick the button went down
    pub jump: bool,
    /// Light steering
    pub light: LightInput,
}

impl TickInput {
    fn ball(&self) -> BallInput {
        BallInput {
            move_dir: self.move_dir,
            jump: self.jump,
        }
    }
}

/// Advance the scene by one timestep
///
/// `dt` is used as given; frame-time clamping belongs to the caller's clock.
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) {
    scene.events.clear();
    scene.time_ticks += 1;

    scene.light.steer(&input.light, dt);
    scene.rebuild_shadows();
    let footprint = scene.footprint();

    // Footprint exit is checked before anything can move the ball
    if drop_if_unlit(&mut scene.ball, &footprint) {
        scene.events.push(GameEvent::Dropped {
            reason: DropReason::OutOfLight,
        });
    }

    if scene.light_motion.observe(scene.light.position) {
        let outcome = stick_to_support(&mut scene.ball, &scene.shadows, &footprint);
        if let Some(event) = outcome.event() {
            scene.events.push(event);
        }
    }

    let world = World {
        shadows: &scene.shadows,
        footprint,
        landing: scene.level.landing,
    };
    scene
        .ball
        .step(input.ball(), dt, &world, &mut scene.events);

    if scene.ball.bottom() <= scene.level.death_y {
        let position = scene.ball.pos;
        log::info!(
            "Ball lost at ({:.2}, {:.2}) after {} ticks",
            position.x,
            position.y,
            scene.time_ticks
        );
        scene.events.push(GameEvent::Died { position });
        scene.deaths += 1;
        scene.reset_level();
    }

    for event in &scene.events {
        log::debug!("tick {}: {:?}", scene.time_ticks, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::level::LevelConfig;
    use crate::sim::ObjectId;
    use glam::Vec2;

    #[test]
    fn test_idle_ball_stays_on_spawn() {
        let mut scene = Scene::new(LevelConfig::default());
        let spawn = scene.ball.pos;

        for _ in 0..240 {
            tick(&mut scene, &TickInput::default(), SIM_DT);
            assert!(scene.events.is_empty());
        }

        assert_eq!(scene.ball.support(), Some(ObjectId(0)));
        assert!((scene.ball.pos - spawn).length() < 1e-4);
        assert_eq!(scene.time_ticks, 240);
        assert_eq!(scene.deaths, 0);
    }

    #[test]
    fn test_moving_light_carries_ball() {
        let mut scene = Scene::new(LevelConfig::default());
        let spawn = scene.ball.pos;
        let input = TickInput {
            light: LightInput {
                dx: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        tick(&mut scene, &input, SIM_DT);
        assert!(matches!(
            scene.events.first(),
            Some(GameEvent::Stuck {
                object_id: ObjectId(0),
                ..
            })
        ));

        for _ in 0..10 {
            tick(&mut scene, &input, SIM_DT);
        }
        assert_eq!(scene.ball.support(), Some(ObjectId(0)));
        assert_ne!(scene.ball.pos, spawn);
    }

    #[test]
    fn test_light_jump_away_drops_ball() {
        let mut scene = Scene::new(LevelConfig::default());
        scene.light.position.x += 40.0;

        tick(&mut scene, &TickInput::default(), SIM_DT);
        assert_eq!(
            scene.events,
            vec![GameEvent::Dropped {
                reason: DropReason::OutOfLight
            }]
        );
        assert!(!scene.ball.is_grounded());
    }

    #[test]
    fn test_death_line_resets_level() {
        let mut scene = Scene::new(LevelConfig::default());
        let spawn = scene.ball.pos;
        scene.ball.drop();
        scene.ball.pos = Vec2::new(-6.0, -5.0);

        tick(&mut scene, &TickInput::default(), SIM_DT);
        assert_eq!(scene.deaths, 1);
        assert!(matches!(scene.events[0], GameEvent::Died { .. }));
        assert!(matches!(
            scene.events[1],
            GameEvent::LevelReset {
                support: Some(ObjectId(0)),
                ..
            }
        ));
        assert!(scene.ball.is_grounded());
        assert!((scene.ball.pos - spawn).length() < 1e-5);
    }

    #[test]
    fn test_tick_is_deterministic() {
        let inputs: Vec<TickInput> = (0..600)
            .map(|i| TickInput {
                move_dir: [1, 0, -1][(i / 50) % 3],
                jump: i % 97 == 0,
                light: LightInput {
                    dx: [0, 1, -1, 0][(i / 70) % 4],
                    dy: [0, 0, 1, -1][(i / 90) % 4],
                    fov: 0,
                },
            })
            .collect();

        let mut a = Scene::new(LevelConfig::default());
        let mut b = Scene::new(LevelConfig::default());
        for input in &inputs {
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
            assert_eq!(a.events, b.events);
        }
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.shadows, b.shadows);
        assert_eq!(a.deaths, b.deaths);
    }
}
