use super::{Point2, Vector2, EPSILON};
use crate::error::{OperationError, Result};

/// Computes the signed area of a ring (shoelace formula).
///
/// The ring may be given open or closed; a repeated closing point adds
/// nothing to the sum. Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the ring winds counter-clockwise.
#[must_use]
pub fn is_ccw(points: &[Point2]) -> bool {
    signed_area_2d(points) > 0.0
}

/// Rotates an open ring so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let best = leftmost_bottom_index(points);
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Index of the leftmost-bottommost vertex. Returns 0 for an empty slice.
#[must_use]
pub fn leftmost_bottom_index(points: &[Point2]) -> usize {
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - EPSILON || (pt.x - b.x).abs() < EPSILON && pt.y < b.y {
            best = i;
        }
    }
    best
}

/// Removes the repeated closing point of a ring if present.
#[must_use]
pub fn open_ring(points: &[Point2]) -> Vec<Point2> {
    let mut ring = points.to_vec();
    if ring.len() > 1 {
        let first = ring[0];
        if ring.last().is_some_and(|last| (last - first).norm() < EPSILON) {
            ring.pop();
        }
    }
    ring
}

/// Appends the first point to the end of a ring unless it is already closed.
#[must_use]
pub fn close_ring(points: &[Point2]) -> Vec<Point2> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if ring.len() == 1 || (last - first).norm() >= EPSILON {
            ring.push(first);
        }
    }
    ring
}

/// Drops consecutive points closer than `EPSILON`.
#[must_use]
pub fn dedup_points(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (p - last).norm() >= EPSILON) {
            out.push(*p);
        }
    }
    out
}

/// Removes vertices of an open ring that lie on the segment joining their
/// neighbours.
#[must_use]
pub fn remove_collinear(ring: &[Point2]) -> Vec<Point2> {
    let mut pts = ring.to_vec();
    let mut changed = true;
    while changed && pts.len() >= 3 {
        changed = false;
        let n = pts.len();
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            let cur = pts[i];
            let span = next - prev;
            let len = span.norm();
            let off = if len < EPSILON {
                (cur - prev).norm()
            } else {
                super::cross(&span, &(cur - prev)).abs() / len
            };
            let between = (cur - prev).dot(&span) >= -EPSILON && (cur - next).dot(&span) <= EPSILON;
            if off < EPSILON && (between || len < EPSILON) {
                pts.remove(i);
                changed = true;
                break;
            }
        }
    }
    pts
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < EPSILON {
        return Err(OperationError::InvalidInput(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}
