//! Collision detection and response between the ball and shadow polygons
//!
//! Three tools, used in different regimes:
//! - SAT minimum translation vector for circle vs convex polygon
//! - a one-way resolver that only ever supports a falling ball from above
//! - a side/ceiling resolver that keeps an airborne ball from entering a
//!   shadow through its walls

use glam::Vec2;

use super::geometry::{closest_point_on_segment, edges};
use super::shadow::{ObjectId, ShadowPoly};
use crate::consts::{RESOLVER_ITERATIONS, WALL_SKIN};
use crate::normalize_or_up;

/// Edges whose outward normal has |x| above this are walls
const SIDE_NORMAL_X: f32 = 0.6;
/// Edges whose outward normal has y below this are ceilings
const CEILING_NORMAL_Y: f32 = -0.6;

/// Projection interval of a polygon on an axis
fn project_poly(poly: &[Vec2], axis: Vec2) -> (f32, f32) {
    poly.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        let d = v.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Overlap of polygon and circle on `axis`, with the direction that frees the circle
///
/// Returns `None` when the axis separates them.
fn overlap_on_axis(poly: &[Vec2], center: Vec2, radius: f32, axis: Vec2) -> Option<(f32, f32)> {
    let (p_min, p_max) = project_poly(poly, axis);
    let c = center.dot(axis);
    let (c_min, c_max) = (c - radius, c + radius);

    if p_max < c_min || c_max < p_min {
        return None;
    }

    // Push along +axis out past p_max, or along -axis out past p_min
    let forward = p_max - c_min;
    let backward = c_max - p_min;
    if forward < backward {
        Some((forward, 1.0))
    } else {
        Some((backward, -1.0))
    }
}

/// Minimum translation vector pushing a circle out of a convex polygon
///
/// Tests every edge normal, then the axis from the nearest vertex to the
/// circle centre. `None` means no overlap (or a degenerate polygon).
pub fn circle_polygon_mtv(center: Vec2, radius: f32, poly: &[Vec2]) -> Option<Vec2> {
    if poly.len() < 3 {
        return None;
    }

    let mut best_overlap = f32::INFINITY;
    let mut best_axis = Vec2::ZERO;

    for (a, b) in edges(poly) {
        let e = b - a;
        let axis = normalize_or_up(Vec2::new(e.y, -e.x));
        let (overlap, sign) = overlap_on_axis(poly, center, radius, axis)?;
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis * sign;
        }
    }

    let nearest = poly
        .iter()
        .copied()
        .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)))?;
    let axis = normalize_or_up(center - nearest);
    let (overlap, sign) = overlap_on_axis(poly, center, radius, axis)?;
    if overlap < best_overlap {
        best_overlap = overlap;
        best_axis = axis * sign;
    }

    Some(best_axis * best_overlap)
}

/// Outcome of the one-way resolver
#[derive(Debug, Clone, PartialEq)]
pub struct OneWayResult {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Polygon that pushed the ball up the most, if any did
    pub support: Option<ObjectId>,
}

/// Resolve a ball against one-way platforms
///
/// A push-out is applied only when it points up and the ball is not rising,
/// so side and underside contacts never block: the ball walks off edges and
/// jumps up through platforms.
pub fn resolve_one_way(
    mut position: Vec2,
    mut velocity: Vec2,
    radius: f32,
    shadows: &[ShadowPoly],
) -> OneWayResult {
    let mut support = None;
    let mut best_up = 0.0;

    for _ in 0..RESOLVER_ITERATIONS {
        let mut any = false;

        for shadow in shadows {
            let Some(mtv) = circle_polygon_mtv(position, radius, &shadow.hull) else {
                continue;
            };

            if mtv.y > 0.0 && velocity.y <= 0.0 {
                position += mtv;
                velocity.y = 0.0;
                any = true;

                if mtv.y > best_up {
                    best_up = mtv.y;
                    support = Some(shadow.object_id);
                }
            }
        }

        if !any {
            break;
        }
    }

    OneWayResult {
        position,
        velocity,
        support,
    }
}

/// Penetration of the ball into one wall or ceiling edge
#[derive(Debug, Clone, Copy)]
struct EdgeContact {
    /// Points from the edge to the ball centre
    normal: Vec2,
    penetration: f32,
}

/// Circle vs edge test restricted to walls, and to ceilings while rising
///
/// Floors (edges facing down-and-out of the underside) never count, so a
/// falling ball is never caught on an invisible floor under a shadow.
fn wall_contact(center: Vec2, radius: f32, velocity: Vec2, a: Vec2, b: Vec2) -> Option<EdgeContact> {
    let e = b - a;
    if e.length_squared() < 1e-10 {
        return None;
    }

    // Right-hand normal points outward for a CCW polygon
    let n = Vec2::new(e.y, -e.x).normalize();

    let is_side = n.x.abs() > SIDE_NORMAL_X;
    let is_ceiling = n.y < CEILING_NORMAL_Y;
    if !is_side && !is_ceiling {
        return None;
    }
    if is_ceiling && velocity.y <= 0.0 {
        return None;
    }

    let d = center - closest_point_on_segment(center, a, b);
    let dist_sq = d.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.max(1e-12).sqrt();
    let normal = if dist > 1e-6 { d / dist } else { n };
    let penetration = radius - dist;
    (penetration > 0.0).then_some(EdgeContact {
        normal,
        penetration,
    })
}

fn touches_any_wall(poly: &[Vec2], center: Vec2, radius: f32, velocity: Vec2) -> bool {
    edges(poly).any(|(a, b)| wall_contact(center, radius, velocity, a, b).is_some())
}

/// Keep an airborne ball from entering a shadow through its sides or ceiling
///
/// Only genuine crossings are resolved: the ball must have been clear of
/// every wall/ceiling edge at `prev_position` and be touching one now. A
/// ball that already started overlapping is left alone so it can't get
/// trapped. Returns true when the ball was pushed.
pub fn block_walls(
    poly: &[Vec2],
    prev_position: Vec2,
    position: &mut Vec2,
    velocity: &mut Vec2,
    radius: f32,
) -> bool {
    if poly.len() < 3 {
        return false;
    }

    if touches_any_wall(poly, prev_position, radius, *velocity)
        || !touches_any_wall(poly, *position, radius, *velocity)
    {
        return false;
    }

    for _ in 0..RESOLVER_ITERATIONS {
        let deepest = edges(poly)
            .filter_map(|(a, b)| wall_contact(*position, radius, *velocity, a, b))
            .max_by(|x, y| x.penetration.total_cmp(&y.penetration));

        let Some(contact) = deepest else {
            break;
        };

        *position += contact.normal * (contact.penetration + WALL_SKIN);

        // Remove the velocity component heading into the wall
        let vn = velocity.dot(contact.normal);
        if vn < 0.0 {
            *velocity -= contact.normal * vn;
        }

        if !touches_any_wall(poly, *position, radius, *velocity) {
            break;
        }
    }

    true
}
