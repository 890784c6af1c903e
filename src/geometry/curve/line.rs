use std::borrow::Cow;

use crate::error::{GeometryError, Result};
use crate::geometry::AabbRect;
use crate::math::{Point2, Vector2, EPSILON};
use crate::tessellation::Sampled;

use super::{Curve, CurveDomain};

/// A line segment from `front` to `back`.
///
/// The parametric form is `P(t) = front + t * (back - front)` for `t` in `[0, 1]`.
/// Intersection routines may also treat it as the infinite line through both
/// points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub front: Point2,
    pub back: Point2,
}

impl Line {
    /// Creates a new segment. Zero-length segments are allowed and report
    /// [`Line::is_empty`].
    #[must_use]
    pub fn new(front: Point2, back: Point2) -> Self {
        Self { front, back }
    }

    /// Unnormalized direction `back - front`.
    #[must_use]
    pub fn vector(&self) -> Vector2 {
        self.back - self.front
    }

    /// Unit direction vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment has zero length.
    pub fn direction(&self) -> Result<Vector2> {
        let v = self.vector();
        let len = v.norm();
        if len < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(v / len)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length() < EPSILON
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.front + self.vector() * t
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.front, &self.back)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.back, self.front)
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Point2 {
        self.point_at(t.clamp(0.0, 1.0))
    }

    fn derivative(&self, _t: f64) -> Vector2 {
        self.vector()
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn bounding_rect(&self) -> AabbRect {
        AabbRect::from_corners(&self.front, &self.back)
    }

    fn sampled(&self) -> Cow<'_, Sampled> {
        Cow::Owned(Sampled {
            points: vec![self.front, self.back],
            params: vec![0.0, 1.0],
        })
    }
}
