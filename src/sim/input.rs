//! Input shaping: press edges and a seeded autopilot for headless runs

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::light::LightInput;
use super::tick::TickInput;

/// Turns a held button into a single-tick press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    last: bool,
}

impl EdgeTrigger {
    /// True only on the first tick `held` is true
    pub fn update(&mut self, held: bool) -> bool {
        let pressed = held && !self.last;
        self.last = held;
        pressed
    }
}

/// Buttons the autopilot is holding down
#[derive(Debug, Clone, Copy, Default)]
struct Held {
    move_dir: i8,
    jump: bool,
    light: LightInput,
}

/// Plays the level with random held inputs
///
/// Same seed, same input stream.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    held: Held,
    hold_ticks: u32,
    jump: EdgeTrigger,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            held: Held::default(),
            hold_ticks: 0,
            jump: EdgeTrigger::default(),
        }
    }

    fn pick_direction(&mut self) -> i8 {
        self.rng.random_range(-1..=1)
    }

    /// Input for the next tick
    pub fn next_input(&mut self) -> TickInput {
        if self.hold_ticks == 0 {
            // Light moves less often than the ball so landings can happen
            let steer_light = self.rng.random_bool(0.3);
            let light = if steer_light {
                LightInput {
                    dx: self.pick_direction(),
                    dy: self.pick_direction(),
                    fov: self.pick_direction(),
                }
            } else {
                LightInput::default()
            };

            self.held = Held {
                move_dir: self.pick_direction(),
                jump: self.rng.random_bool(0.2),
                light,
            };
            self.hold_ticks = self.rng.random_range(15..=90);
        }
        self.hold_ticks -= 1;

        TickInput {
            move_dir: self.held.move_dir,
            jump: self.jump.update(self.held.jump),
            light: self.held.light,
        }
    }
}
