mod arc;
mod bezier;
mod bspline;
mod circle;
mod ellipse;
mod line;

pub use arc::Arc;
pub use bezier::{de_casteljau, Bezier};
pub use bspline::{BSpline, SplineKind};
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;

use std::borrow::Cow;

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, EPSILON};
use crate::tessellation::Sampled;

use super::{AabbRect, Polyline};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Width of the domain.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Clamps `t` into the domain.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t_min, self.t_max)
    }

    /// Returns `true` if `t` lies strictly between the domain ends.
    #[must_use]
    pub fn is_interior(&self, t: f64) -> bool {
        t > self.t_min && t < self.t_max
    }
}

/// Trait for bounded parametric curves in the plane.
///
/// Evaluation clamps the parameter into [`Curve::domain`].
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point2;

    /// First derivative with respect to `t`.
    fn derivative(&self, t: f64) -> Vector2;

    /// Unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` where the derivative vanishes.
    fn tangent(&self, t: f64) -> Result<Vector2> {
        let d = self.derivative(t);
        let len = d.norm();
        if len < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Bounding rectangle of the curve itself (not of its control net).
    fn bounding_rect(&self) -> AabbRect;

    /// Parameter range of every polynomial piece with a rect that bounds it.
    /// Curves without pieces report their whole domain.
    fn pieces(&self) -> Vec<(f64, f64, AabbRect)> {
        let domain = self.domain();
        vec![(domain.t_min, domain.t_max, self.bounding_rect())]
    }

    /// Tessellated samples with their parameters. Cached by curves that are
    /// expensive to sample.
    fn sampled(&self) -> Cow<'_, Sampled>;

    /// Piecewise-linear approximation of the curve.
    fn shape(&self) -> Polyline {
        Polyline::from(self.sampled().points.clone())
    }

    /// Start point.
    fn front(&self) -> Point2 {
        self.evaluate(self.domain().t_min)
    }

    /// End point.
    fn back(&self) -> Point2 {
        self.evaluate(self.domain().t_max)
    }
}
