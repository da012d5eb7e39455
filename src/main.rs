//! Shadow Walk headless runner
//!
//! Loads a level, lets a seeded autopilot play it at a fixed frame rate,
//! and reports what happened. Useful for replays and for soak-testing levels.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;

use shadow_walk::consts::SIM_DT;
use shadow_walk::mesh::FrameMesh;
use shadow_walk::sim::{Autopilot, GameEvent, Scene, tick};
use shadow_walk::{FrameClock, LevelConfig};

#[derive(Parser, Debug)]
#[command(about = "Run a shadow-platform level headless with a seeded autopilot", version)]
struct Args {
    /// Level JSON (built-in level when omitted)
    #[arg(long)]
    level: Option<PathBuf>,
    /// Autopilot seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,
    /// Simulated display frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Print the level as JSON and exit
    #[arg(long)]
    dump_level: bool,
    /// Print the final frame snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

#[derive(Debug, Default)]
struct RunStats {
    ticks: u64,
    jumps: u32,
    landings: u32,
    drops: u32,
    sticks: u32,
    deaths: u32,
}

impl RunStats {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Jumped => self.jumps += 1,
                GameEvent::Landed { .. } => self.landings += 1,
                GameEvent::Dropped { .. } => self.drops += 1,
                GameEvent::Stuck { .. } => self.sticks += 1,
                GameEvent::Died { .. } => self.deaths += 1,
                GameEvent::LevelReset { .. } => {}
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let level = match &args.level {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::default(),
    };

    if args.dump_level {
        println!("{}", level.to_json_pretty()?);
        return Ok(());
    }

    ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be positive, got {}",
        args.fps
    );
    ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be non-negative, got {}",
        args.seconds
    );

    log::info!(
        "Shadow Walk: level '{}', seed {}, {}s at {} fps",
        level.name,
        args.seed,
        args.seconds,
        args.fps
    );

    let mut scene = Scene::new(level);
    let mut pilot = Autopilot::new(args.seed);
    let mut clock = FrameClock::new();
    let mut stats = RunStats::default();

    let frame_dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).round() as u64;
    for _ in 0..frames {
        for _ in 0..clock.steps(frame_dt) {
            tick(&mut scene, &pilot.next_input(), SIM_DT);
            stats.record(&scene.events);
            stats.ticks += 1;
        }
    }

    let snapshot = scene.snapshot();
    let mesh = FrameMesh::build(&snapshot);
    log::info!(
        "Ran {} ticks: {} jumps, {} landings, {} drops, {} sticks, {} deaths",
        stats.ticks,
        stats.jumps,
        stats.landings,
        stats.drops,
        stats.sticks,
        stats.deaths
    );
    log::info!(
        "Final frame: {} shadows, {} vertices ({} bytes), ball at ({:.2}, {:.2})",
        snapshot.shadows.len(),
        mesh.vertex_count(),
        mesh.to_bytes().len(),
        snapshot.ball_position.x,
        snapshot.ball_position.y
    );

    if args.snapshot {
        let json =
            serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
        println!("{json}");
    }

    Ok(())
}
