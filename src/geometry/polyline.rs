use crate::math::{lerp, Point2, EPSILON};

use super::{AabbRect, Line};

/// An open chain of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point2>,
}

impl From<Vec<Point2>> for Polyline {
    fn from(points: Vec<Point2>) -> Self {
        Self { points }
    }
}

impl Polyline {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the chain has fewer than two points or no length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 2 || self.length() < EPSILON
    }

    #[must_use]
    pub fn front(&self) -> Option<&Point2> {
        self.points.first()
    }

    #[must_use]
    pub fn back(&self) -> Option<&Point2> {
        self.points.last()
    }

    /// All segments in order, including zero-length ones.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    #[must_use]
    pub fn bounding_rect(&self) -> AabbRect {
        AabbRect::from_points(&self.points)
    }

    /// Point at the chain parameter `u` in `[0, len - 1]`; the integer part
    /// selects the segment.
    #[must_use]
    pub fn point_at(&self, u: f64) -> Option<Point2> {
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0]),
            n => {
                #[allow(clippy::cast_precision_loss)]
                let u = u.clamp(0.0, (n - 1) as f64);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let i = (u.floor() as usize).min(n - 2);
                #[allow(clippy::cast_precision_loss)]
                Some(lerp(&self.points[i], &self.points[i + 1], u - i as f64))
            }
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }
}
