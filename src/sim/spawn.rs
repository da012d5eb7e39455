//! Spawn planning: where the ball appears on level start and reset

use glam::Vec2;

use super::light::LightFootprint;
use super::shadow::{ObjectId, ShadowPoly};
use crate::consts::{SPAWN_RIM_MARGIN, SPAWN_SAMPLES};

/// Where to put the ball, and what it stands on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub position: Vec2,
    /// Support and anchor `u`; `None` spawns airborne
    pub support: Option<(ObjectId, f32)>,
}

/// Best lit standing spot on one shadow's top surface
///
/// Samples the x-range evenly and prefers higher tops, then spots near the
/// middle. Returns the ball centre and its anchor `u`.
pub fn best_spot_on(
    shadow: &ShadowPoly,
    footprint: &LightFootprint,
    radius: f32,
) -> Option<(Vec2, f32)> {
    if !shadow.is_solid() {
        return None;
    }

    let (min_x, max_x) = shadow.x_range();
    let width = (max_x - min_x).max(1e-5);

    let mut best: Option<(f32, Vec2, f32)> = None;
    for i in 0..SPAWN_SAMPLES {
        let u = i as f32 / (SPAWN_SAMPLES - 1) as f32;
        let x = min_x + u * width;

        let Some(y_top) = shadow.top_y_at_x(x) else {
            continue;
        };
        let spot = Vec2::new(x, y_top + radius);
        if !footprint.contains_circle(spot, radius, SPAWN_RIM_MARGIN) {
            continue;
        }

        let center_bias = 1.0 - (u - 0.5).abs() * 2.0;
        let score = y_top * 10.0 + center_bias;
        if best.is_none_or(|(s, _, _)| score > s) {
            best = Some((score, spot, u));
        }
    }

    best.map(|(_, spot, u)| (spot, u))
}

/// Choose the spawn for a freshly built shadow set
///
/// The leftmost shadow (by min x) with a valid spot wins. With nothing
/// usable the ball hangs at the footprint centre and falls.
pub fn plan_spawn(shadows: &[ShadowPoly], footprint: &LightFootprint, radius: f32) -> SpawnPlan {
    let mut best: Option<(f32, SpawnPlan)> = None;

    for shadow in shadows {
        let Some((position, u)) = best_spot_on(shadow, footprint, radius) else {
            continue;
        };
        let (min_x, _) = shadow.x_range();
        if best.as_ref().is_none_or(|(m, _)| min_x < *m) {
            best = Some((
                min_x,
                SpawnPlan {
                    position,
                    support: Some((shadow.object_id, u)),
                },
            ));
        }
    }

    best.map(|(_, plan)| plan).unwrap_or(SpawnPlan {
        position: footprint.center,
        support: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn light(center: Vec2, radius: f32) -> LightFootprint {
        LightFootprint { center, radius }
    }

    #[test]
    fn test_flat_top_prefers_middle() {
        let s = slab(0, 0.0, 4.0, 2.0);
        let (spot, u) = best_spot_on(&s, &light(Vec2::new(2.0, 2.0), 10.0), 0.5).unwrap();
        assert_eq!(u, 0.5);
        assert!((spot - Vec2::new(2.0, 2.5)).length() < 1e-5);
    }

    #[test]
    fn test_sloped_top_prefers_height() {
        // Top rises to the right
        let s = ShadowPoly {
            object_id: ObjectId(0),
            hull: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(4.0, 0.0),
                Vec2::new(4.0, 3.0),
                Vec2::new(0.0, 2.0),
            ],
        };
        let (spot, u) = best_spot_on(&s, &light(Vec2::new(2.0, 2.0), 10.0), 0.25).unwrap();
        assert_eq!(u, 1.0);
        assert!((spot.y - 3.25).abs() < 1e-5);
    }

    #[test]
    fn test_only_lit_samples_count() {
        let s = slab(0, 0.0, 10.0, 2.0);
        // Only the left end of the top is lit
        let (spot, u) = best_spot_on(&s, &light(Vec2::new(0.0, 2.5), 1.6), 0.5).unwrap();
        assert!(u <= 0.1 + 1e-6);
        assert!(light(Vec2::new(0.0, 2.5), 1.6).contains_ball(spot, 0.5));

        assert!(best_spot_on(&s, &light(Vec2::new(50.0, 2.5), 5.0), 0.5).is_none());
    }

    #[test]
    fn test_leftmost_platform_wins() {
        let shadows = [slab(0, 2.0, 6.0, 9.0), slab(1, -10.0, -6.0, 1.0)];
        let plan = plan_spawn(&shadows, &light(Vec2::ZERO, 100.0), 0.5);
        assert_eq!(plan.support, Some((ObjectId(1), 0.5)));
        assert!((plan.position - Vec2::new(-8.0, 1.5)).length() < 1e-5);
    }

    #[test]
    fn test_falls_back_to_footprint_center() {
        let shadows = [slab(0, 0.0, 4.0, 2.0)];
        let fp = light(Vec2::new(40.0, 40.0), 3.0);
        let plan = plan_spawn(&shadows, &fp, 0.5);
        assert_eq!(plan.support, None);
        assert_eq!(plan.position, fp.center);

        let plan = plan_spawn(&[], &fp, 0.5);
        assert_eq!(plan.position, fp.center);
    }
}
