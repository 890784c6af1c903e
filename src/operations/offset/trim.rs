//! Removal of self-intersection loops from offset rings.

use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::{dedup_points, open_ring, remove_collinear, signed_area_2d};
use crate::math::Point2;

/// Crossings closer than this to both segment ends are vertex touches.
const END_TOLERANCE: f64 = 1e-8;

/// Recursively removes self-intersection loops from an open ring.
///
/// At each crossing the ring splits in two; both halves are trimmed and the
/// one winding like `winding_sign` is kept. Loops left by collapsed features
/// wind the other way. If both or neither match, the larger one wins.
/// Each split strictly reduces the vertex count.
pub(crate) fn trim_closed_loops(points: &[Point2], winding_sign: f64) -> Vec<Point2> {
    let pts = clean_ring(points);
    if pts.len() < 4 {
        return pts;
    }
    let Some((i, j, pt)) = first_self_intersection(&pts) else {
        return pts;
    };
    let (a, b) = split_at(&pts, i, j, pt);
    let a = trim_closed_loops(&a, winding_sign);
    let b = trim_closed_loops(&b, winding_sign);
    let (area_a, area_b) = (signed_area_2d(&a), signed_area_2d(&b));
    match (area_a * winding_sign > 0.0, area_b * winding_sign > 0.0) {
        (true, false) => a,
        (false, true) => b,
        _ if area_a.abs() >= area_b.abs() => a,
        _ => b,
    }
}

fn clean_ring(points: &[Point2]) -> Vec<Point2> {
    let ring = open_ring(&dedup_points(points));
    if ring.len() < 3 {
        return ring;
    }
    remove_collinear(&ring)
}

fn are_adjacent(i: usize, j: usize, n: usize) -> bool {
    let diff = i.abs_diff(j);
    diff == 1 || diff == n - 1
}

/// First crossing between non-adjacent edges `i < j`. Touches at a shared
/// end of both edges are skipped.
fn first_self_intersection(points: &[Point2]) -> Option<(usize, usize, Point2)> {
    let n = points.len();
    for i in 0..n {
        let i_next = (i + 1) % n;
        for j in (i + 2)..n {
            if are_adjacent(i, j, n) {
                continue;
            }
            let j_next = (j + 1) % n;
            let Some((pt, t, u)) = segment_segment_intersect_2d(&points[i], &points[i_next], &points[j], &points[j_next])
            else {
                continue;
            };
            let t_at_end = t < END_TOLERANCE || t > 1.0 - END_TOLERANCE;
            let u_at_end = u < END_TOLERANCE || u > 1.0 - END_TOLERANCE;
            if !(t_at_end && u_at_end) {
                return Some((i, j, pt));
            }
        }
    }
    None
}

/// Splits a ring at the crossing of edges `i < j` into
/// `[pt, P(i+1) ..= P(j)]` and `[pt, P(j+1) ..= P(i)]` (wrapping).
fn split_at(points: &[Point2], i: usize, j: usize, pt: Point2) -> (Vec<Point2>, Vec<Point2>) {
    let n = points.len();
    let mut a = Vec::with_capacity(j - i + 1);
    a.push(pt);
    a.extend_from_slice(&points[(i + 1)..=j]);

    let mut b = Vec::with_capacity(n - (j - i) + 1);
    b.push(pt);
    let mut idx = (j + 1) % n;
    loop {
        b.push(points[idx]);
        if idx == i {
            break;
        }
        idx = (idx + 1) % n;
    }
    (a, b)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn simple_ring_is_untouched() {
        let ring = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        assert_eq!(trim_closed_loops(&ring, 1.0), ring);
    }

    #[test]
    fn reversed_loop_is_cut_off() {
        // A small clockwise bow on top of a square.
        let ring = vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(4.0, 10.0),
            p(6.0, 12.0),
            p(6.0, 11.0),
            p(4.0, 13.0),
            p(0.0, 10.0),
        ];
        let trimmed = trim_closed_loops(&ring, 1.0);
        assert!(signed_area_2d(&trimmed) > 0.0);
        assert_eq!(trimmed.len(), 7);
        assert!(trimmed.contains(&p(5.5, 11.5)));
        assert!(!trimmed.contains(&p(6.0, 12.0)));
    }

    #[test]
    fn figure_eight_keeps_matching_lobe() {
        // Left lobe counter-clockwise, right lobe clockwise.
        let ring = vec![p(0.0, 0.0), p(2.0, 0.0), p(4.0, 2.0), p(6.0, 2.0), p(6.0, 0.0), p(4.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)];
        let trimmed = trim_closed_loops(&ring, 1.0);
        assert!(signed_area_2d(&trimmed) > 0.0);
        assert!(trimmed.iter().all(|q| q.x <= 3.0 + 1e-12));
        assert_abs_diff_eq!(signed_area_2d(&trimmed), 5.0, epsilon = 1e-12);

        let trimmed = trim_closed_loops(&ring, -1.0);
        assert!(trimmed.iter().all(|q| q.x >= 3.0 - 1e-12));
    }

    #[test]
    fn shared_vertex_touch_is_not_a_crossing() {
        let ring = vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(4.0, 2.0), p(4.0, 4.0), p(2.0, 4.0), p(2.0, 2.0), p(0.0, 2.0)];
        assert_eq!(first_self_intersection(&ring), None);
    }
}
