use super::{cross, Point2, Vector2, EPSILON};

/// Parametric line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(p1: &Point2, d1: &Vector2, p2: &Point2, d2: &Vector2) -> Option<(f64, f64)> {
    let denom = cross(d1, d2);
    if denom.abs() < EPSILON * d1.norm().max(1.0) * d2.norm().max(1.0) {
        return None;
    }
    let w = p2 - p1;
    Some((cross(&w, d2) / denom, cross(&w, d1) / denom))
}

/// Bounded segment-segment intersection.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel segments never report a crossing here.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;
    let eps = EPSILON;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crossing_lines() {
        let (t, u) = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(2.0, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 2.0).abs() < EPSILON);
        assert!((u - 1.0).abs() < EPSILON);
    }

    #[test]
    fn parallel_lines() {
        let r = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 1.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(2.0, 2.0),
        );
        assert!(r.is_none());
    }

    #[test]
    fn segments_cross() {
        let (pt, t, u) = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(5.0, -5.0),
            &Point2::new(5.0, 5.0),
        )
        .unwrap();
        assert!((pt.x - 5.0).abs() < EPSILON && pt.y.abs() < EPSILON);
        assert!((t - 0.5).abs() < EPSILON && (u - 0.5).abs() < EPSILON);
    }

    #[test]
    fn segments_miss() {
        let r = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(2.0, -1.0),
            &Point2::new(2.0, 1.0),
        );
        assert!(r.is_none());
    }
}
