//! Miter offsets of polylines, polygons and circular shapes.
//!
//! Every vertex is moved along the bisector of the unit normals of its two
//! adjacent edges, scaled so that both offset edges keep exactly the offset
//! distance from their source edges:
//!
//! ```text
//! |shift| = d / sqrt((1 + cos θ) / 2)
//! ```
//!
//! where `θ` is the turn angle between the incoming and outgoing edges.
//!
//! # Sign convention
//!
//! - Polylines: positive distance offsets to the left of the walking
//!   direction, negative to the right.
//! - Polygons, circles and arcs: positive distance grows the shape
//!   (outward), negative shrinks it, regardless of orientation.

use tracing::debug;

use crate::geometry::{Arc, Circle, Polygon, Polyline};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::{dedup_points, left_normal, open_ring, remove_collinear, signed_area_2d};
use crate::math::{lerp, Point2, Vector2, EPSILON};

use super::trim::trim_closed_loops;

/// Offsets an open polyline, one output point per input point.
///
/// Consecutive duplicate points are dropped first. Returns `None` if fewer
/// than two distinct points remain.
#[must_use]
pub fn offset_polyline(polyline: &Polyline, distance: f64) -> Option<Polyline> {
    let points = dedup_points(&polyline.points);
    if points.len() < 2 {
        return None;
    }
    if distance.abs() < EPSILON {
        return Some(Polyline::new(points));
    }
    let dirs = edge_directions(&points);
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    out.push(points[0] + left_normal(dirs[0]) * distance);
    for i in 1..n - 1 {
        out.push(miter_point(&points[i], dirs[i - 1], dirs[i], distance));
    }
    out.push(points[n - 1] + left_normal(dirs[n - 2]) * distance);
    Some(Polyline::new(out))
}

/// Offsets a simple polygon outward (`distance > 0`) or inward
/// (`distance < 0`).
///
/// Offset edges whose direction reverses against their source edge are
/// repaired by re-intersecting the neighbouring offset edges; any
/// remaining self-intersection loops are trimmed away. The result keeps
/// the orientation of the input.
///
/// Returns `None` if the polygon is degenerate or the inward offset
/// collapses it.
#[must_use]
pub fn offset_polygon(polygon: &Polygon, distance: f64) -> Option<Polygon> {
    let ring = remove_collinear(&open_ring(&dedup_points(polygon.points())));
    if ring.len() < 3 {
        return None;
    }
    let area = signed_area_2d(&ring);
    if area.abs() < EPSILON {
        return None;
    }
    if distance.abs() < EPSILON {
        return Some(Polygon::new(ring));
    }

    // The left normal points inward on a counter-clockwise ring.
    let shift = if area < 0.0 { distance } else { -distance };
    let mut edges = offset_edges(&ring, shift);
    let vertices = repair_error_edges(&mut edges)?;
    let trimmed = trim_closed_loops(&vertices, area.signum());
    if trimmed.len() < 3 {
        return None;
    }

    let result_area = signed_area_2d(&trimmed);
    if result_area * area <= 0.0 || (distance < 0.0 && result_area.abs() >= area.abs()) {
        debug!(distance, "polygon offset collapsed");
        return None;
    }
    Some(Polygon::new(trimmed))
}

/// Concentric circle grown by `distance`. Returns `None` if the radius
/// would not stay positive.
#[must_use]
pub fn offset_circle(circle: &Circle, distance: f64) -> Option<Circle> {
    Circle::new(*circle.center(), circle.radius() + distance).ok()
}

/// Concentric arc over the same angular range with its radius grown by
/// `distance`. Returns `None` if the radius would not stay positive.
#[must_use]
pub fn offset_arc(arc: &Arc, distance: f64) -> Option<Arc> {
    arc.with_radius(arc.radius() + distance).ok()
}

/// Unit directions of the edges of an open chain without repeated points.
fn edge_directions(points: &[Point2]) -> Vec<Vector2> {
    points.windows(2).map(|w| (w[1] - w[0]).normalize()).collect()
}

/// Offset of a vertex along the bisector of the normals of its incoming
/// edge `a` and outgoing edge `b`.
///
/// A full reversal has no bisector; the vertex then moves along the
/// incoming normal.
fn miter_point(vertex: &Point2, a: Vector2, b: Vector2, distance: f64) -> Point2 {
    let sum = left_normal(a) + left_normal(b);
    let len = sum.norm();
    if len < EPSILON {
        return vertex + left_normal(a) * distance;
    }
    let cos = a.dot(&b).clamp(-1.0, 1.0);
    let scale = distance / ((1.0 + cos) / 2.0).sqrt();
    vertex + sum / len * scale
}

/// A source polygon edge carried to its offset line.
#[derive(Debug, Clone, Copy)]
struct OffsetEdge {
    /// Offset of the source edge's start vertex along the edge normal.
    origin: Point2,
    dir: Vector2,
    /// Miter vertex at the start of the offset edge.
    start: Point2,
}

/// Offset edges of a closed ring with their miter start vertices.
fn offset_edges(ring: &[Point2], shift: f64) -> Vec<OffsetEdge> {
    let n = ring.len();
    let dirs: Vec<Vector2> = (0..n).map(|i| (ring[(i + 1) % n] - ring[i]).normalize()).collect();
    (0..n)
        .map(|i| {
            let prev = dirs[(i + n - 1) % n];
            OffsetEdge {
                origin: ring[i] + left_normal(dirs[i]) * shift,
                dir: dirs[i],
                start: miter_point(&ring[i], prev, dirs[i], shift),
            }
        })
        .collect()
}

/// Returns `true` if the offset edge from `edge.start` to `end` runs
/// against its source edge.
fn is_error_edge(edge: &OffsetEdge, end: &Point2) -> bool {
    (end - edge.start).dot(&edge.dir) < -EPSILON
}

/// Vertex joining two offset edges: their line intersection, or, for
/// parallel lines, the midpoint between the end of `prev` and `next`'s
/// origin.
fn join(prev: &OffsetEdge, next: &OffsetEdge) -> Point2 {
    if let Some((_, u)) = line_line_intersect_2d(&prev.origin, &prev.dir, &next.origin, &next.dir) {
        return next.origin + next.dir * u;
    }
    let foot = prev.origin + prev.dir * (next.origin - prev.origin).dot(&prev.dir);
    lerp(&foot, &next.origin, 0.5)
}

/// Removes reversed offset edges until none remain.
///
/// An isolated error edge is dropped and its two vertices merge into the
/// intersection of the neighbouring offset edges. A run of adjacent error
/// edges is dropped as a whole, joining the valid edges on either side.
/// Returns the repaired vertex ring, or `None` if fewer than three edges
/// survive.
fn repair_error_edges(edges: &mut Vec<OffsetEdge>) -> Option<Vec<Point2>> {
    // Each pass removes at least one edge.
    while edges.len() >= 3 {
        let n = edges.len();
        let errors: Vec<bool> = (0..n).map(|i| is_error_edge(&edges[i], &edges[(i + 1) % n].start)).collect();
        if !errors.contains(&false) {
            debug!(edges = n, "every offset edge reversed");
            return None;
        }
        if !errors.contains(&true) {
            return Some(edges.iter().map(|e| e.start).collect());
        }

        let isolated = (0..n)
            .filter(|&i| errors[i] && !errors[(i + n - 1) % n] && !errors[(i + 1) % n])
            .count();
        debug!(edges = n, errors = errors.iter().filter(|&&e| e).count(), isolated, "repairing offset edges");

        let mut repaired: Vec<OffsetEdge> = Vec::with_capacity(n);
        let mut rejoin: Vec<bool> = Vec::with_capacity(n);
        for i in (0..n).filter(|&i| !errors[i]) {
            repaired.push(edges[i]);
            rejoin.push(errors[(i + n - 1) % n]);
        }
        // Only edges that followed a removed run need a new start vertex.
        let m = repaired.len();
        for i in (0..m).filter(|&i| rejoin[i]) {
            let prev = repaired[(i + m - 1) % m];
            repaired[i].start = join(&prev, &repaired[i]);
        }
        *edges = repaired;
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![p(0.0, 0.0), p(size, 0.0), p(size, size), p(0.0, size)])
    }

    fn assert_ring_near(actual: &Polygon, expected: &[Point2]) {
        assert_eq!(actual.vertex_count(), expected.len());
        for q in expected {
            let nearest = actual
                .vertices()
                .iter()
                .map(|v| (v - q).norm())
                .fold(f64::INFINITY, f64::min);
            assert!(nearest < 1e-9, "missing {q:?} in {:?}", actual.vertices());
        }
    }

    #[test]
    fn straight_polyline_left_and_right() {
        let line = Polyline::new(vec![p(0.0, 0.0), p(10.0, 0.0)]);
        let left = offset_polyline(&line, 1.0).unwrap();
        assert_eq!(left.points, vec![p(0.0, 1.0), p(10.0, 1.0)]);
        let right = offset_polyline(&line, -2.0).unwrap();
        assert_eq!(right.points, vec![p(0.0, -2.0), p(10.0, -2.0)]);
    }

    #[test]
    fn polyline_corner_keeps_distance_to_both_edges() {
        let l = Polyline::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]);
        let r = offset_polyline(&l, 1.0).unwrap();
        assert_eq!(r.len(), 3);
        assert_abs_diff_eq!(r.points[1].x, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.points[1].y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.points[2].x, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn polyline_acute_turn_miter_length() {
        // 60 degree wedge: the miter lies at d / sin(30°) from the apex.
        let apex = p(0.0, 0.0);
        let l = Polyline::new(vec![p(10.0, 0.0), apex, p(5.0, 5.0 * 3.0_f64.sqrt())]);
        let r = offset_polyline(&l, -1.0).unwrap();
        assert_abs_diff_eq!((r.points[1] - apex).norm(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn polyline_duplicates_and_degenerates() {
        let l = Polyline::new(vec![p(0.0, 0.0), p(0.0, 0.0), p(0.0, 5.0)]);
        let r = offset_polyline(&l, 1.0).unwrap();
        assert_eq!(r.points, vec![p(-1.0, 0.0), p(-1.0, 5.0)]);
        assert!(offset_polyline(&Polyline::new(vec![p(1.0, 1.0), p(1.0, 1.0)]), 1.0).is_none());
    }

    #[test]
    fn polyline_reversal_moves_along_incoming_normal() {
        let l = Polyline::new(vec![p(0.0, 0.0), p(5.0, 0.0), p(2.0, 0.0)]);
        let r = offset_polyline(&l, 1.0).unwrap();
        assert_eq!(r.points[1], p(5.0, 1.0));
    }

    #[test]
    fn square_outward_and_inward() {
        let grown = offset_polygon(&square(10.0), 1.0).unwrap();
        assert_ring_near(&grown, &[p(-1.0, -1.0), p(11.0, -1.0), p(11.0, 11.0), p(-1.0, 11.0)]);
        assert!(!grown.is_cw());

        let shrunk = offset_polygon(&square(10.0), -2.0).unwrap();
        assert_ring_near(&shrunk, &[p(2.0, 2.0), p(8.0, 2.0), p(8.0, 8.0), p(2.0, 8.0)]);
    }

    #[test]
    fn clockwise_polygon_keeps_orientation() {
        let cw = square(10.0).oriented(true);
        let grown = offset_polygon(&cw, 1.0).unwrap();
        assert!(grown.is_cw());
        assert_abs_diff_eq!(grown.area(), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn convex_round_trip() {
        let hexagon = Polygon::new(
            (0..6)
                .map(|i| {
                    let a = f64::from(i) * PI / 3.0;
                    p(3.0 + 4.0 * a.cos(), -1.0 + 4.0 * a.sin())
                })
                .collect(),
        );
        for d in [0.5, 2.0, 7.5] {
            let out = offset_polygon(&hexagon, d).unwrap();
            assert!(out.area() > hexagon.area());
            let back = offset_polygon(&out, -d).unwrap();
            assert_ring_near(&back, hexagon.vertices());
        }
    }

    #[test]
    fn inward_collapse_is_none() {
        assert!(offset_polygon(&square(10.0), -5.0).is_none());
        assert!(offset_polygon(&square(10.0), -6.0).is_none());
        let triangle = Polygon::new(vec![p(0.0, 0.0), p(6.0, 0.0), p(3.0, 3.0)]);
        assert!(offset_polygon(&triangle, -2.0).is_none());
    }

    #[test]
    fn isolated_error_edge_is_merged() {
        // A short bottom edge between two steep sides: shrinking by 2
        // reverses it and the two sides meet directly.
        let trapezoid = Polygon::new(vec![p(4.0, 0.0), p(6.0, 0.0), p(10.0, 8.0), p(0.0, 8.0)]);
        let r = offset_polygon(&trapezoid, -2.0).unwrap();
        assert_eq!(r.vertex_count(), 3);
        let apex = r.vertices().iter().copied().min_by(|a, b| a.y.total_cmp(&b.y)).unwrap();
        assert_abs_diff_eq!(apex.x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(apex.y, 2.0 * 5.0_f64.sqrt() - 2.0, epsilon = 1e-9);
        for v in r.vertices() {
            assert!(v.y >= 2.0 && v.y <= 6.0 + 1e-9);
        }
    }

    #[test]
    fn adjacent_error_edges_are_dropped_as_a_run() {
        // A blunt two-edge tip between steep sides.
        let tip = Polygon::new(vec![p(0.0, 10.0), p(4.6, 0.4), p(5.0, 0.0), p(5.4, 0.4), p(10.0, 10.0)]);
        let r = offset_polygon(&tip, -1.0).unwrap();
        assert_eq!(r.vertex_count(), 3);
        let apex = r.vertices().iter().copied().min_by(|a, b| a.y.total_cmp(&b.y)).unwrap();
        assert_abs_diff_eq!(apex.x, 5.0, epsilon = 1e-9);
        assert!(apex.y > 2.0_f64.sqrt());
        for v in r.vertices() {
            assert!(v.x > 1.0 && v.x < 9.0);
            assert!(v.y <= 9.0 + 1e-9);
        }
    }

    #[test]
    fn outward_u_shape_trims_overlap() {
        // The arms of the U grow into each other.
        let u = Polygon::new(vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(6.0, 10.0),
            p(6.0, 2.0),
            p(4.0, 2.0),
            p(4.0, 10.0),
            p(0.0, 10.0),
        ]);
        let r = offset_polygon(&u, 1.5).unwrap();
        assert_abs_diff_eq!(r.area(), 13.0 * 13.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_polygon_is_none() {
        let flat = Polygon::new(vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0)]);
        assert!(offset_polygon(&flat, 1.0).is_none());
    }

    #[test]
    fn circles_and_arcs() {
        let c = Circle::new(p(1.0, 1.0), 2.0).unwrap();
        assert_abs_diff_eq!(offset_circle(&c, 1.5).unwrap().radius(), 3.5);
        assert!(offset_circle(&c, -2.0).is_none());

        let arc = Arc::from_center(p(0.0, 0.0), 5.0, 0.0, PI / 2.0, true).unwrap();
        let grown = offset_arc(&arc, 1.0).unwrap();
        assert_abs_diff_eq!(grown.radius(), 6.0);
        assert_abs_diff_eq!(grown.sweep(), arc.sweep(), epsilon = 1e-12);
        assert_abs_diff_eq!(grown.start_angle(), arc.start_angle(), epsilon = 1e-12);
        assert!(offset_arc(&arc, -5.0).is_none());
    }
}
