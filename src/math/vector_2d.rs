//! Scalar and vector primitives shared by every module of the kernel.

use std::f64::consts::TAU;

use super::{Point2, Vector2};

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Orientation of the triangle `(o, a, b)`: positive when `b` lies to the
/// left of the directed line `o -> a`.
#[must_use]
pub fn orient(o: &Point2, a: &Point2, b: &Point2) -> f64 {
    cross(&(a - o), &(b - o))
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Polar angle of a vector in `[0, 2π)`.
#[must_use]
pub fn angle_of(v: &Vector2) -> f64 {
    normalize_angle(v.y.atan2(v.x))
}

/// Expresses `point` in the frame whose origin is `origin` and whose x axis is
/// rotated by `angle` from the global x axis.
#[must_use]
pub fn to_coord(point: &Point2, origin: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    Point2::new(dx * cos + dy * sin, -dx * sin + dy * cos)
}

/// Inverse of [`to_coord`]: maps a local point back to global coordinates.
#[must_use]
pub fn from_coord(point: &Point2, origin: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    Point2::new(
        origin.x + point.x * cos - point.y * sin,
        origin.y + point.x * sin + point.y * cos,
    )
}

/// Rotates `point` around `center` by `angle` radians (counter-clockwise).
#[must_use]
pub fn rotate(point: &Point2, center: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point2::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Linear interpolation between two points.
#[must_use]
pub fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

/// Returns `true` if the two points are within `tolerance` of each other.
#[must_use]
pub fn is_same_point(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    (a - b).norm_squared() <= tolerance * tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn cross_sign_follows_turn_direction() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert_abs_diff_eq!(cross(&x, &y), 1.0);
        assert_abs_diff_eq!(cross(&y, &x), -1.0);
    }

    #[test]
    fn normalize_angle_wraps_negative() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(5.0 * PI), PI, epsilon = 1e-12);
    }

    #[test]
    fn to_coord_round_trip() {
        let origin = Point2::new(3.0, -2.0);
        let p = Point2::new(7.5, 4.25);
        let local = to_coord(&p, &origin, 0.7);
        let back = from_coord(&local, &origin, 0.7);
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn to_coord_quarter_turn() {
        let local = to_coord(&Point2::new(0.0, 2.0), &Point2::origin(), FRAC_PI_2);
        assert_abs_diff_eq!(local.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(local.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_about_center() {
        let r = rotate(&Point2::new(2.0, 1.0), &Point2::new(1.0, 1.0), PI);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-12);
    }
}
