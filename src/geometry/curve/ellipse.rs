use std::borrow::Cow;
use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::AabbRect;
use crate::math::distance_2d::angle_to_arc_param;
use crate::math::{from_coord, normalize_angle, to_coord, Point2, Vector2, EPSILON};
use crate::tessellation::{sample_adaptive, Sampled, TessellationParams};

use super::{Curve, CurveDomain};

/// An ellipse, optionally restricted to an elliptical arc.
///
/// `P(t) = center + rx * cos(t) * u + ry * sin(t) * v` where `u` is the unit
/// x axis rotated by `angle` and `v` its left normal. `t` is the eccentric
/// angle. A full ellipse has the domain `[0, 2π]`; an elliptical arc runs
/// counter-clockwise over `[start, start + sweep]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    center: Point2,
    rx: f64,
    ry: f64,
    angle: f64,
    arc: Option<(f64, f64)>,
}

impl Ellipse {
    /// Creates a full ellipse.
    ///
    /// # Errors
    ///
    /// Returns an error if either semi-axis is not positive.
    pub fn new(center: Point2, rx: f64, ry: f64, angle: f64) -> Result<Self> {
        if rx.is_nan() || ry.is_nan() || rx < EPSILON || ry < EPSILON {
            return Err(GeometryError::Degenerate("ellipse semi-axes must be positive".into()).into());
        }
        Ok(Self {
            center,
            rx,
            ry,
            angle: normalize_angle(angle),
            arc: None,
        })
    }

    /// Creates an ellipse from the endpoints of its two axes.
    ///
    /// `a0 -> a1` is the first axis (its direction fixes the rotation) and
    /// `b0 -> b1` the second. Both must share a midpoint and be perpendicular.
    ///
    /// # Errors
    ///
    /// Returns an error if the axes are degenerate, not perpendicular, or do
    /// not share a center.
    pub fn from_axes(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> Result<Self> {
        let (da, db) = (a1 - a0, b1 - b0);
        let (la, lb) = (da.norm(), db.norm());
        if la < EPSILON || lb < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        let scale = la.max(lb);
        if (da.dot(&db) / (la * lb)).abs() > 1e-9 {
            return Err(GeometryError::Degenerate("ellipse axes must be perpendicular".into()).into());
        }
        let center = nalgebra::center(&a0, &a1);
        if (nalgebra::center(&b0, &b1) - center).norm() > 1e-9 * scale.max(1.0) {
            return Err(GeometryError::Degenerate("ellipse axes must share a center".into()).into());
        }
        Self::new(center, 0.5 * la, 0.5 * lb, da.y.atan2(da.x))
    }

    /// Restricts the ellipse to the counter-clockwise arc between two
    /// eccentric angles.
    ///
    /// # Errors
    ///
    /// Returns an error if the two angles coincide.
    pub fn with_arc(self, start: f64, end: f64) -> Result<Self> {
        let start = normalize_angle(start);
        let sweep = (end - start).rem_euclid(TAU);
        if sweep < EPSILON {
            return Err(GeometryError::Degenerate("elliptical arc sweep must not be zero".into()).into());
        }
        Ok(Self {
            arc: Some((start, sweep)),
            ..self
        })
    }

    /// The full ellipse this arc belongs to.
    #[must_use]
    pub fn full(&self) -> Self {
        Self { arc: None, ..*self }
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Semi-axis along the rotated x direction.
    #[must_use]
    pub fn rx(&self) -> f64 {
        self.rx
    }

    /// Semi-axis along the rotated y direction.
    #[must_use]
    pub fn ry(&self) -> f64 {
        self.ry
    }

    /// Rotation of the first axis in `[0, 2π)`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn is_arc(&self) -> bool {
        self.arc.is_some()
    }

    /// `(start, sweep)` of an elliptical arc in eccentric angle.
    #[must_use]
    pub fn arc_range(&self) -> Option<(f64, f64)> {
        self.arc
    }

    /// Axis endpoints `[a0, a1, b0, b1]`.
    #[must_use]
    pub fn axes(&self) -> [Point2; 4] {
        let (u, v) = self.semi_axes();
        [self.center - u, self.center + u, self.center - v, self.center + v]
    }

    /// The two semi-axis vectors.
    #[must_use]
    pub fn semi_axes(&self) -> (Vector2, Vector2) {
        let (s, c) = self.angle.sin_cos();
        (Vector2::new(c, s) * self.rx, Vector2::new(-s, c) * self.ry)
    }

    /// Expresses `p` in the ellipse's axis-aligned frame.
    #[must_use]
    pub fn to_local(&self, p: &Point2) -> Point2 {
        to_coord(p, &self.center, self.angle)
    }

    /// Maps a point of the axis-aligned frame back to global coordinates.
    #[must_use]
    pub fn from_local(&self, p: &Point2) -> Point2 {
        from_coord(p, &self.center, self.angle)
    }

    /// Point at eccentric angle `t` on the full ellipse.
    #[must_use]
    pub fn point_at_param(&self, t: f64) -> Point2 {
        let (u, v) = self.semi_axes();
        self.center + u * t.cos() + v * t.sin()
    }

    /// Eccentric angle of the point of the full ellipse in the direction of
    /// `p` as seen from the scaled frame, in `[0, 2π)`.
    #[must_use]
    pub fn param_of_point(&self, p: &Point2) -> f64 {
        let l = self.to_local(p);
        normalize_angle((l.y / self.ry).atan2(l.x / self.rx))
    }

    /// Returns `true` if the eccentric angle `t` lies on this ellipse or arc.
    #[must_use]
    pub fn contains_param(&self, t: f64) -> bool {
        match self.arc {
            None => true,
            Some((start, sweep)) => angle_to_arc_param(t, start, sweep).is_some(),
        }
    }

    /// Parameter of `t` within the domain, unwrapping it past `2π` for arcs.
    #[must_use]
    pub fn domain_param(&self, t: f64) -> Option<f64> {
        match self.arc {
            None => Some(normalize_angle(t)),
            Some((start, sweep)) => angle_to_arc_param(t, start, sweep).map(|f| start + f * sweep),
        }
    }

    /// Area of the full ellipse.
    #[must_use]
    pub fn area(&self) -> f64 {
        PI * self.rx * self.ry
    }

    /// Perimeter of the full ellipse (Ramanujan's second approximation).
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        let (a, b) = (self.rx, self.ry);
        let h = ((a - b) / (a + b)).powi(2);
        PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
    }
}

impl Curve for Ellipse {
    fn evaluate(&self, t: f64) -> Point2 {
        self.point_at_param(self.domain().clamp(t))
    }

    fn derivative(&self, t: f64) -> Vector2 {
        let (u, v) = self.semi_axes();
        let t = self.domain().clamp(t);
        -u * t.sin() + v * t.cos()
    }

    fn domain(&self) -> CurveDomain {
        match self.arc {
            None => CurveDomain::new(0.0, TAU),
            Some((start, sweep)) => CurveDomain::new(start, start + sweep),
        }
    }

    fn is_closed(&self) -> bool {
        self.arc.is_none()
    }

    fn bounding_rect(&self) -> AabbRect {
        let (u, v) = self.semi_axes();
        if self.arc.is_none() {
            let hw = u.x.hypot(v.x);
            let hh = u.y.hypot(v.y);
            let c = self.center;
            return AabbRect::new(c.x - hw, c.y + hh, c.x + hw, c.y - hh);
        }
        let domain = self.domain();
        let mut rect = AabbRect::from_corners(&self.evaluate(domain.t_min), &self.evaluate(domain.t_max));
        // x'(t) = 0 and y'(t) = 0 each have two solutions half a turn apart.
        let tx = (v.x).atan2(u.x);
        let ty = (v.y).atan2(u.y);
        for t in [tx, tx + PI, ty, ty + PI] {
            if self.contains_param(normalize_angle(t)) {
                rect = rect.expanded(&self.point_at_param(t));
            }
        }
        rect
    }

    fn sampled(&self) -> Cow<'_, Sampled> {
        Cow::Owned(sample_adaptive(self, &TessellationParams::default()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn evaluate_axis_points() {
        let e = Ellipse::new(Point2::new(1.0, 1.0), 3.0, 2.0, 0.0).unwrap();
        let p = e.evaluate(FRAC_PI_2);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn from_axes_recovers_rotation() {
        let e = Ellipse::from_axes(
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, 1.0),
        )
        .unwrap();
        assert_abs_diff_eq!(e.rx(), 8.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(e.ry(), 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(e.angle(), std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn from_axes_rejects_skew() {
        let r = Ellipse::from_axes(
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(-0.5, -1.0),
            Point2::new(0.5, 1.0),
        );
        assert!(r.is_err());
    }

    #[test]
    fn rotated_bounding_rect() {
        let e = Ellipse::new(Point2::new(0.0, 0.0), 2.0, 1.0, FRAC_PI_2).unwrap();
        let r = e.bounding_rect();
        assert_abs_diff_eq!(r.right, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.top, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn arc_bounding_rect() {
        let e = Ellipse::new(Point2::new(0.0, 0.0), 2.0, 1.0, 0.0)
            .unwrap()
            .with_arc(0.0, PI)
            .unwrap();
        let r = e.bounding_rect();
        assert_abs_diff_eq!(r.bottom, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.top, 1.0, epsilon = 1e-12);
        assert!(e.is_arc());
        assert!(!e.is_closed());
    }

    #[test]
    fn param_of_point_inverts_evaluate() {
        let e = Ellipse::new(Point2::new(3.0, -1.0), 4.0, 1.5, 0.4).unwrap();
        let t = 2.2;
        assert_abs_diff_eq!(e.param_of_point(&e.point_at_param(t)), t, epsilon = 1e-12);
    }

    #[test]
    fn wrapped_arc_domain_param() {
        let e = Ellipse::new(Point2::new(0.0, 0.0), 2.0, 1.0, 0.0)
            .unwrap()
            .with_arc(1.5 * PI, 0.5 * PI)
            .unwrap();
        let t = e.domain_param(0.1).unwrap();
        assert_abs_diff_eq!(t, TAU + 0.1, epsilon = 1e-12);
        assert!(e.domain_param(PI).is_none());
    }
}
