//! Point and shape containment.
//!
//! Polygon containment uses winding-number semantics. A horizontal ray is
//! cast to the right of the query point and every edge crossing contributes a
//! signed half-delta: a proper crossing counts `±2`, an edge ending on the ray
//! counts `±1` and horizontal edges count nothing. Crossings at the same ray
//! coordinate are summed as a cluster and clusters that cancel are dropped, so
//! rays through shared vertices or along collinear edges are resolved without
//! double counting.

use tracing::trace;

use crate::geometry::{AabbRect, Arc, Circle, Curve, Ellipse, Polygon, Shape};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{orient, Point2, EPSILON};

use super::distance::{distance, distance_to_arc, distance_to_circle, distance_to_ellipse};

/// How far past the ring's right edge the test ray extends.
const RAY_MARGIN: f64 = 80.0;

/// Returns `true` if `point` lies inside `shape`.
///
/// Points on the boundary report `coincide`. Open shapes contain nothing
/// but their own points, and only when `coincide` is set.
#[must_use]
pub fn is_inside(point: &Point2, shape: &Shape, coincide: bool) -> bool {
    if shape.is_empty() || !shape.bounding_rect().inflated(EPSILON).is_inside(point) {
        return false;
    }
    is_inside_unculled(point, shape, coincide)
}

/// [`is_inside`] without the bounding-rect rejection.
#[must_use]
pub fn is_inside_unculled(point: &Point2, shape: &Shape, coincide: bool) -> bool {
    match shape {
        Shape::Polygon(p) => ring_contains(point, p.points(), coincide),
        Shape::Rect(r) => rect_contains(point, r, coincide),
        Shape::Circle(c) => circle_contains(point, c, coincide),
        Shape::Ellipse(e) if e.is_arc() => elliptical_arc_contains(point, e, coincide),
        Shape::Ellipse(e) => ellipse_contains(point, e, coincide),
        Shape::Arc(a) => arc_contains(point, a, coincide),
        Shape::Polyline(p) if shape.is_closed() => ring_contains(point, &p.points, coincide),
        Shape::Bezier(b) if b.is_closed() => ring_contains(point, &b.sampled().points, coincide),
        Shape::BSpline(s) if s.is_closed() => ring_contains(point, &s.sampled().points, coincide),
        _ => coincide && distance(point, shape) < EPSILON,
    }
}

/// Winding-number containment test against a polygon.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &Polygon, coincide: bool) -> bool {
    if polygon.is_empty() || !polygon.bounding_rect().inflated(EPSILON).is_inside(point) {
        return false;
    }
    ring_contains(point, polygon.points(), coincide)
}

/// Returns `true` if every point of `inner` lies inside or on `outer` and no
/// edge of `inner` properly crosses an edge of `outer`.
#[must_use]
pub fn is_inside_polygon(inner: &Polygon, outer: &Polygon) -> bool {
    if inner.is_empty() || outer.is_empty() || !outer.bounding_rect().inflated(EPSILON).contains_rect(&inner.bounding_rect()) {
        return false;
    }
    let ring = outer.points();
    let vertices_inside = inner
        .edges()
        .all(|e| ring_contains(&e.front, ring, true) && ring_contains(&e.midpoint(), ring, true));
    if !vertices_inside {
        return false;
    }
    let interior = EPSILON..=1.0 - EPSILON;
    !inner.edges().any(|a| {
        outer.edges().any(|b| {
            segment_segment_intersect_2d(&a.front, &a.back, &b.front, &b.back)
                .is_some_and(|(_, t, u)| interior.contains(&t) && interior.contains(&u))
        })
    })
}

/// Window selection: `shape` lies entirely within `rect`.
#[must_use]
pub fn is_inside_rect(shape: &Shape, rect: &AabbRect) -> bool {
    !shape.is_empty() && rect.inflated(EPSILON).contains_rect(&shape.bounding_rect())
}

/// Winding number of a closed ring around `point`.
///
/// The ring may be given open or closed. Returns `None` if the point lies on
/// the boundary.
pub(crate) fn winding_number(point: &Point2, ring: &[Point2]) -> Option<i32> {
    let n = ring.len();
    if n < 3 {
        return Some(0);
    }
    let edge = |i: usize| (ring[i], ring[(i + 1) % n]);

    for i in 0..n {
        let (a, b) = edge(i);
        if point_to_segment_dist(point, &a, &b) < EPSILON {
            return None;
        }
    }

    let ray_end = ring.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) + RAY_MARGIN;
    let mut events: Vec<(f64, i32)> = Vec::new();
    for i in 0..n {
        let (a, b) = edge(i);
        if a.y == b.y || a == b {
            continue;
        }
        let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        if point.y < lo || point.y > hi {
            continue;
        }
        let x = if point.y == a.y {
            a.x
        } else if point.y == b.y {
            b.x
        } else {
            a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x)
        };
        if x <= point.x || x > ray_end {
            continue;
        }
        let magnitude = if point.y == a.y || point.y == b.y { 1 } else { 2 };
        let sign = if b.y > a.y { 1 } else { -1 };
        events.push((x, sign * magnitude));
    }

    events.sort_by(|l, r| l.0.total_cmp(&r.0));
    let mut clusters: Vec<(f64, i32)> = Vec::new();
    for (x, delta) in events {
        match clusters.last_mut() {
            Some(last) if (x - last.0).abs() < EPSILON => last.1 += delta,
            _ => clusters.push((x, delta)),
        }
    }
    clusters.retain(|c| c.1 != 0);
    let total: i32 = clusters.iter().map(|c| c.1).sum();
    trace!(clusters = clusters.len(), total, "ray crossings");
    Some(total / 2)
}

fn ring_contains(point: &Point2, ring: &[Point2], coincide: bool) -> bool {
    match winding_number(point, ring) {
        None => coincide,
        Some(w) => w != 0,
    }
}

fn rect_contains(point: &Point2, rect: &AabbRect, coincide: bool) -> bool {
    if rect.is_empty() {
        return false;
    }
    let inner = point.x > rect.left + EPSILON
        && point.x < rect.right - EPSILON
        && point.y > rect.bottom + EPSILON
        && point.y < rect.top - EPSILON;
    if inner {
        return true;
    }
    coincide && rect.inflated(EPSILON).is_inside(point)
}

fn circle_contains(point: &Point2, circle: &Circle, coincide: bool) -> bool {
    if distance_to_circle(point, circle) < EPSILON {
        return coincide;
    }
    (point - circle.center()).norm() < circle.radius()
}

fn ellipse_contains(point: &Point2, ellipse: &Ellipse, coincide: bool) -> bool {
    if distance_to_ellipse(point, ellipse) < EPSILON {
        return coincide;
    }
    in_full_ellipse(point, ellipse)
}

fn in_full_ellipse(point: &Point2, ellipse: &Ellipse) -> bool {
    let l = ellipse.to_local(point);
    let (x, y) = (l.x / ellipse.rx(), l.y / ellipse.ry());
    x * x + y * y < 1.0
}

/// Region bounded by the arc and its chord.
fn arc_contains(point: &Point2, arc: &Arc, coincide: bool) -> bool {
    let (front, back) = (arc.front(), arc.back());
    if distance_to_arc(point, arc) < EPSILON || point_to_segment_dist(point, &front, &back) < EPSILON {
        return coincide;
    }
    (point - arc.center()).norm() < arc.radius() && same_side_as_arc(point, &front, &back, &arc.midpoint())
}

fn elliptical_arc_contains(point: &Point2, ellipse: &Ellipse, coincide: bool) -> bool {
    let (front, back) = (ellipse.front(), ellipse.back());
    if distance_to_ellipse(point, ellipse) < EPSILON || point_to_segment_dist(point, &front, &back) < EPSILON {
        return coincide;
    }
    let d = ellipse.domain();
    let mid = ellipse.evaluate(0.5 * (d.t_min + d.t_max));
    in_full_ellipse(point, ellipse) && same_side_as_arc(point, &front, &back, &mid)
}

fn same_side_as_arc(point: &Point2, front: &Point2, back: &Point2, arc_mid: &Point2) -> bool {
    orient(front, back, point) * orient(front, back, arc_mid) > 0.0
}
