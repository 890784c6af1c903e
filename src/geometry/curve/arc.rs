use std::borrow::Cow;
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::AabbRect;
use crate::math::distance_2d::angle_to_arc_param;
use crate::math::{angle_of, normalize_angle, orient, Point2, Vector2, EPSILON};
use crate::tessellation::{sample_uniform, Sampled, TessellationParams};

use super::{Curve, CurveDomain};

/// A circular arc.
///
/// Stored as its center and radius plus three control points: `start`, a
/// reference point `mid` somewhere on the arc, and `end`. The mid point
/// fixes the direction (see [`Arc::is_cw`]) and therefore the sweep.
///
/// The parameter runs over `[0, 1]`:
/// `P(t) = center + radius * (cos a, sin a)` with `a = start_angle + t * sweep`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start: Point2,
    mid: Point2,
    end: Point2,
}

impl Arc {
    /// Creates the arc passing through three points in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are collinear or coincident.
    pub fn from_three_points(start: Point2, mid: Point2, end: Point2) -> Result<Self> {
        let d = 2.0 * orient(&start, &mid, &end);
        let scale = (mid - start).norm().max((end - start).norm()).max(1.0);
        if d.abs() < EPSILON * scale * scale {
            return Err(GeometryError::Degenerate("arc control points are collinear".into()).into());
        }
        let (a2, b2, c2) = (
            start.coords.norm_squared(),
            mid.coords.norm_squared(),
            end.coords.norm_squared(),
        );
        let center = Point2::new(
            (a2 * (mid.y - end.y) + b2 * (end.y - start.y) + c2 * (start.y - mid.y)) / d,
            (a2 * (end.x - mid.x) + b2 * (start.x - end.x) + c2 * (mid.x - start.x)) / d,
        );
        let radius = (start - center).norm();
        Ok(Self {
            center,
            radius,
            start,
            mid,
            end,
        })
    }

    /// Creates an arc from its center, radius and end angles. The arc runs
    /// counter-clockwise from `start_angle` to `end_angle` when `ccw` is set,
    /// clockwise otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the sweep is zero.
    pub fn from_center(center: Point2, radius: f64, start_angle: f64, end_angle: f64, ccw: bool) -> Result<Self> {
        if radius.is_nan() || radius < EPSILON {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        let sweep = if ccw {
            (end_angle - start_angle).rem_euclid(TAU)
        } else {
            -(start_angle - end_angle).rem_euclid(TAU)
        };
        if sweep.abs() < EPSILON {
            return Err(GeometryError::Degenerate("arc sweep must not be zero".into()).into());
        }
        let at = |a: f64| center + Vector2::new(a.cos(), a.sin()) * radius;
        Ok(Self {
            center,
            radius,
            start: at(start_angle),
            mid: at(start_angle + 0.5 * sweep),
            end: at(start_angle + sweep),
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The three control points `[start, mid, end]`.
    #[must_use]
    pub fn control_points(&self) -> [Point2; 3] {
        [self.start, self.mid, self.end]
    }

    /// Returns `true` if the arc runs clockwise from start to end.
    #[must_use]
    pub fn is_cw(&self) -> bool {
        orient(&self.start, &self.mid, &self.end) < 0.0
    }

    /// Polar angle of the start point in `[0, 2π)`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        angle_of(&(self.start - self.center))
    }

    /// Polar angle of the end point in `[0, 2π)`.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        angle_of(&(self.end - self.center))
    }

    /// Signed sweep: positive counter-clockwise, negative clockwise.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        let (s, e) = (self.start_angle(), self.end_angle());
        if self.is_cw() {
            -(s - e).rem_euclid(TAU)
        } else {
            (e - s).rem_euclid(TAU)
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }

    /// Normalized parameter of the polar angle `angle`, or `None` if the
    /// angle lies outside the arc.
    #[must_use]
    pub fn param_of_angle(&self, angle: f64) -> Option<f64> {
        angle_to_arc_param(angle, self.start_angle(), self.sweep())
    }

    /// Returns `true` if the polar angle `angle` lies within the arc.
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        self.param_of_angle(angle).is_some()
    }

    /// Point at the middle of the sweep.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        self.evaluate(0.5)
    }

    /// The same arc traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self { start: self.end, end: self.start, ..*self }
    }

    /// Concentric arc with a different radius and the same angular range.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn with_radius(&self, radius: f64) -> Result<Self> {
        let start = self.start_angle();
        Self::from_center(self.center, radius, start, start + self.sweep(), !self.is_cw())
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Point2 {
        let a = self.start_angle() + self.sweep() * t.clamp(0.0, 1.0);
        self.center + Vector2::new(a.cos(), a.sin()) * self.radius
    }

    fn derivative(&self, t: f64) -> Vector2 {
        let sweep = self.sweep();
        let a = self.start_angle() + sweep * t.clamp(0.0, 1.0);
        Vector2::new(-a.sin(), a.cos()) * (self.radius * sweep)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn bounding_rect(&self) -> AabbRect {
        let mut rect = AabbRect::from_corners(&self.start, &self.end);
        for k in 0..4 {
            let angle = normalize_angle(f64::from(k) * FRAC_PI_2);
            if self.contains_angle(angle) {
                rect = rect.expanded(&(self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius));
            }
        }
        rect
    }

    fn sampled(&self) -> Cow<'_, Sampled> {
        let segments = TessellationParams::default().segments_for_sweep(self.radius, self.sweep());
        Cow::Owned(sample_uniform(self, 0.0, 1.0, segments))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn upper_half() -> Arc {
        Arc::from_three_points(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(-1.0, 0.0)).unwrap()
    }

    #[test]
    fn three_point_center_and_radius() {
        let arc = upper_half();
        assert_abs_diff_eq!(arc.center().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.center().y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.radius(), 1.0, epsilon = 1e-12);
        assert!(!arc.is_cw());
        assert_abs_diff_eq!(arc.sweep(), PI, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_arc_has_negative_sweep() {
        let arc = Arc::from_three_points(Point2::new(-1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(1.0, 0.0)).unwrap();
        assert!(arc.is_cw());
        assert_abs_diff_eq!(arc.sweep(), -PI, epsilon = 1e-12);
        let mid = arc.evaluate(0.5);
        assert_abs_diff_eq!(mid.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn from_center_matches_three_points() {
        let arc = Arc::from_center(Point2::new(0.0, 0.0), 1.0, 0.0, PI, true).unwrap();
        let p = arc.midpoint();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bounding_rect_includes_top() {
        let r = upper_half().bounding_rect();
        assert_abs_diff_eq!(r.top, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.bottom, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.left, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_rejected() {
        let r = Arc::from_three_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0));
        assert!(r.is_err());
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let arc = upper_half();
        let h = 1e-6;
        let fd = (arc.evaluate(0.3 + h) - arc.evaluate(0.3 - h)) / (2.0 * h);
        let d = arc.derivative(0.3);
        assert_abs_diff_eq!(d.x, fd.x, epsilon = 1e-5);
        assert_abs_diff_eq!(d.y, fd.y, epsilon = 1e-5);
    }
}
