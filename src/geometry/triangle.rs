use crate::math::{orient, Point2};

use super::AabbRect;

/// Three points, produced by ear-cutting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Point2; 3],
}

impl Triangle {
    #[must_use]
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        Self { points: [a, b, c] }
    }

    /// Positive for counter-clockwise triangles.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = &self.points;
        0.5 * orient(a, b, c)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Returns `true` if `p` lies inside or on the triangle.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        let [a, b, c] = &self.points;
        let d0 = orient(a, b, p);
        let d1 = orient(b, c, p);
        let d2 = orient(c, a, p);
        let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
        let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
        !(has_neg && has_pos)
    }

    #[must_use]
    pub fn bounding_rect(&self) -> AabbRect {
        AabbRect::from_points(&self.points)
    }
}
