//! Ear-cutting triangulation and convexity tests.

use std::f64::consts::TAU;

use tracing::debug;

use crate::geometry::{Polygon, Triangle};
use crate::math::polygon_2d::{dedup_points, open_ring};
use crate::math::{cross, Point2, EPSILON};

/// Triangulates a simple polygon by ear cutting.
///
/// Triangles are counter-clockwise whatever the orientation of the input.
/// A polygon with fewer than three vertices, or one the triangulator
/// rejects, yields no triangles.
#[must_use]
pub fn ear_cut(polygon: &Polygon) -> Vec<Triangle> {
    ear_cut_with_holes(polygon, &[])
}

/// Triangulates a polygon with holes. Hole rings may have any orientation.
#[must_use]
pub fn ear_cut_with_holes(outer: &Polygon, holes: &[Polygon]) -> Vec<Triangle> {
    let outer = ring(outer);
    if outer.len() < 3 {
        return Vec::new();
    }
    let mut vertices = outer;
    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes.iter().map(ring).filter(|h| h.len() >= 3) {
        hole_starts.push(vertices.len());
        vertices.extend(hole);
    }

    let coords: Vec<f64> = vertices.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = match earcutr::earcut(&coords, &hole_starts, 2) {
        Ok(indices) => indices,
        Err(err) => {
            debug!(?err, vertices = vertices.len(), "ear cut failed");
            return Vec::new();
        }
    };

    let triangles: Vec<Triangle> = indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (vertices[t[0]], vertices[t[1]], vertices[t[2]]);
            let tri = Triangle::new(a, b, c);
            if tri.signed_area() < 0.0 {
                Triangle::new(a, c, b)
            } else {
                tri
            }
        })
        .collect();
    debug!(vertices = vertices.len(), holes = hole_starts.len(), triangles = triangles.len(), "ear cut");
    triangles
}

/// Returns `true` if the polygon is convex: every corner turns the same
/// way and the boundary winds around exactly once. Collinear vertices are
/// allowed; a polygon with no area is not convex.
#[must_use]
pub fn is_convex(polygon: &Polygon) -> bool {
    let pts = ring(polygon);
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0_f64;
    let mut winding = 0.0;
    for i in 0..n {
        let a = pts[(i + 1) % n] - pts[i];
        let b = pts[(i + 2) % n] - pts[(i + 1) % n];
        let turn = cross(&a, &b);
        if turn.abs() > EPSILON * a.norm() * b.norm() {
            if sign * turn < 0.0 {
                return false;
            }
            sign = turn.signum();
        }
        winding += turn.atan2(a.dot(&b));
    }
    sign != 0.0 && (winding.abs() - TAU).abs() < 1e-6
}

fn ring(polygon: &Polygon) -> Vec<Point2> {
    open_ring(&dedup_points(polygon.points()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn total_area(triangles: &[Triangle]) -> f64 {
        triangles.iter().map(Triangle::signed_area).sum()
    }

    #[test]
    fn square_gives_two_triangles() {
        let square = Polygon::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);
        let t = ear_cut(&square);
        assert_eq!(t.len(), 2);
        assert!(t.iter().all(Triangle::is_ccw));
        assert_abs_diff_eq!(total_area(&t), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn concave_polygon_covers_its_area() {
        let l_shape = Polygon::new(vec![
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 6.0),
            p(0.0, 6.0),
        ])
        .oriented(true);
        let t = ear_cut(&l_shape);
        assert_eq!(t.len(), 4);
        assert_abs_diff_eq!(total_area(&t), l_shape.area(), epsilon = 1e-12);
        // No triangle covers the notch.
        assert!(t.iter().all(|tri| !tri.contains(&p(4.0, 4.0))));
    }

    #[test]
    fn holes_are_left_open() {
        let outer = Polygon::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)]);
        let hole = Polygon::new(vec![p(4.0, 4.0), p(6.0, 4.0), p(6.0, 6.0), p(4.0, 6.0)]);
        let t = ear_cut_with_holes(&outer, &[hole]);
        assert_eq!(t.len(), 8);
        assert_abs_diff_eq!(total_area(&t), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_input() {
        assert!(ear_cut(&Polygon::new(vec![p(0.0, 0.0), p(1.0, 1.0)])).is_empty());
        assert!(ear_cut(&Polygon::default()).is_empty());
    }

    #[test]
    fn convexity() {
        let square = Polygon::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);
        assert!(is_convex(&square));
        assert!(is_convex(&square.oriented(true)));

        let with_collinear = Polygon::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);
        assert!(is_convex(&with_collinear));

        let arrow = Polygon::new(vec![p(0.0, 0.0), p(4.0, 2.0), p(0.0, 4.0), p(1.0, 2.0)]);
        assert!(!is_convex(&arrow));

        // A pentagram turns the same way at every vertex but winds twice.
        let star = Polygon::new(
            (0..5)
                .map(|i| {
                    let a = f64::from(i * 2) * TAU / 5.0;
                    p(a.cos(), a.sin())
                })
                .collect(),
        );
        assert!(!is_convex(&star));

        let flat = Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        assert!(!is_convex(&flat));
    }
}
