//! Geometry kernel for shadow polygons
//!
//! Pure functions over 2D point sets: convex hulls, the upper boundary of a
//! hull at a given x, and segment distance helpers. No state.

use glam::Vec2;

use crate::consts::HULL_EPSILON;
use crate::cross2;

/// Convex hull of a point set (monotone chain)
///
/// Points are sorted by (x, y) and merged when closer than `HULL_EPSILON` on
/// both axes. The result is counter-clockwise with no three consecutive
/// collinear points. Fewer than three distinct points come back sorted and
/// merged. Three or more always go through the chain, so a clockwise
/// triangle is reordered to counter-clockwise and collinear input collapses
/// to its two extremes. Callers must check for degenerate output.
pub fn convex_hull(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup_by(|b, a| (a.x - b.x).abs() < HULL_EPSILON && (a.y - b.y).abs() < HULL_EPSILON);

    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in &points {
        while lower.len() >= 2 && cross2(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross2(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    // Last point of each chain is the first point of the other
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Horizontal extent (min x, max x) of a polygon
///
/// An empty polygon yields (inf, -inf), which overlaps nothing.
pub fn x_range(poly: &[Vec2]) -> (f32, f32) {
    poly.iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.x), hi.max(v.x))
        })
}

/// Highest point of the polygon boundary at `x`
///
/// Every edge whose x-span contains `x` contributes its interpolated y;
/// vertical edges contribute their higher endpoint. Returns `None` when no
/// edge spans `x`.
pub fn top_y_at_x(poly: &[Vec2], x: f32) -> Option<f32> {
    let n = poly.len();
    let mut best: Option<f32> = None;

    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];

        if x < a.x.min(b.x) - HULL_EPSILON || x > a.x.max(b.x) + HULL_EPSILON {
            continue;
        }

        let dx = b.x - a.x;
        let y = if dx.abs() < 1e-6 {
            if (a.x - x).abs() >= 1e-4 {
                continue;
            }
            a.y.max(b.y)
        } else {
            let t = (x - a.x) / dx;
            if !(-1e-4..=1.0 + 1e-4).contains(&t) {
                continue;
            }
            a.y + t * (b.y - a.y)
        };

        best = Some(best.map_or(y, |b: f32| b.max(y)));
    }

    best
}

/// Closest point to `p` on segment `a`-`b`
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-10 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Iterate the edges (a, b) of a closed polygon
pub fn edges(poly: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = poly.len();
    (0..n).map(move |i| (poly[i], poly[(i + 1) % n]))
}
