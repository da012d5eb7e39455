//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Shadows rebuilt from scratch every tick, in object order
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod input;
pub mod light;
pub mod physics;
pub mod shadow;
pub mod spawn;
pub mod state;
pub mod stick;
pub mod tick;

pub use collision::{OneWayResult, block_walls, circle_polygon_mtv, resolve_one_way};
pub use geometry::{closest_point_on_segment, convex_hull, top_y_at_x, x_range};
pub use input::{Autopilot, EdgeTrigger};
pub use light::{LightFootprint, LightInput, LightMotion, LightSource};
pub use physics::{BallInput, LandingMode, World, support_u};
pub use shadow::{
    BoxObject, ObjectId, ShadowPoly, find_shadow, project_shadows, project_silhouette,
    project_to_plane,
};
pub use spawn::{SpawnPlan, best_spot_on, plan_spawn};
pub use state::{Ball, BallState, DropReason, FrameSnapshot, GameEvent, Scene};
pub use stick::{StickOutcome, drop_if_unlit, stick_to_support};
pub use tick::{TickInput, tick};
