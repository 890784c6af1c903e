use std::f64::consts::TAU;

use super::{Point2, EPSILON};

/// Projects `p` onto the segment `a -> b`, returning the closest point and
/// its clamped parameter in `[0, 1]`.
#[must_use]
pub fn closest_on_segment(p: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (a + d * t, t)
}

/// Returns the minimum distance from `p` to the segment `a -> b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (q, _) = closest_on_segment(p, a, b);
    (p - q).norm()
}

/// Returns the distance from `p` to the infinite line through `a` and `b`.
#[must_use]
pub fn point_to_line_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < 1e-20 {
        return (p - a).norm();
    }
    super::cross(&d, &(p - a)).abs() / len
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle (relative to the center) falls within the arc range,
/// the distance is `||p - center| - radius|`. Otherwise it is the distance to
/// the nearer arc endpoint.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, center: &Point2, radius: f64, start_angle: f64, sweep: f64) -> f64 {
    let v = p - center;
    let angle = v.y.atan2(v.x);
    if angle_in_arc_range(angle, start_angle, sweep) {
        return (v.norm() - radius).abs();
    }
    let end_angle = start_angle + sweep;
    let ep0 = center + radius * super::Vector2::new(start_angle.cos(), start_angle.sin());
    let ep1 = center + radius * super::Vector2::new(end_angle.cos(), end_angle.sin());
    (p - ep0).norm().min((p - ep1).norm())
}

/// Checks if an angle falls within an arc's angular range. `sweep` is
/// positive for counter-clockwise arcs and negative for clockwise ones.
#[must_use]
pub fn angle_in_arc_range(angle: f64, start_angle: f64, sweep: f64) -> bool {
    angle_to_arc_param(angle, start_angle, sweep).is_some()
}

/// Converts an absolute angle to the normalized arc parameter in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range.
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    if sweep.abs() < EPSILON {
        return None;
    }
    let eps = EPSILON * 100.0;
    let mut delta = (angle - start_angle).rem_euclid(TAU);
    if sweep > 0.0 {
        if delta > TAU - eps {
            delta -= TAU;
        }
        if delta >= -eps && delta <= sweep + eps {
            return Some((delta / sweep).clamp(0.0, 1.0));
        }
    } else {
        delta -= TAU;
        if delta < -TAU + eps {
            delta += TAU;
        }
        if delta <= eps && delta >= sweep - eps {
            return Some((delta / sweep).clamp(0.0, 1.0));
        }
    }
    None
}
