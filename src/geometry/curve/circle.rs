use std::borrow::Cow;
use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::AabbRect;
use crate::math::{Point2, Vector2, EPSILON};
use crate::tessellation::{sample_uniform, Sampled, TessellationParams};

use super::{Curve, CurveDomain};

/// A full circle.
///
/// The parametric domain is `[0, 2π]` and the curve is always closed:
/// `P(t) = center + radius * (cos t, sin t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if radius.is_nan() || radius < EPSILON {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }
        Ok(Self { center, radius })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    /// Point on the circle at polar angle `angle`.
    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Point2 {
        self.point_at_angle(t)
    }

    fn derivative(&self, t: f64) -> Vector2 {
        Vector2::new(-t.sin(), t.cos()) * self.radius
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn bounding_rect(&self) -> AabbRect {
        let (c, r) = (self.center, self.radius);
        AabbRect::new(c.x - r, c.y + r, c.x + r, c.y - r)
    }

    fn sampled(&self) -> Cow<'_, Sampled> {
        let segments = TessellationParams::default().segments_for_sweep(self.radius, TAU);
        Cow::Owned(sample_uniform(self, 0.0, TAU, segments))
    }
}
