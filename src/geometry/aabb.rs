use crate::math::{Point2, EPSILON};

/// Axis-aligned bounding rectangle with y pointing up.
///
/// `top` is the largest y and `bottom` the smallest. A rectangle built from
/// no points is inverted (`left > right`) and reports [`AabbRect::is_empty`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AabbRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for AabbRect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl AabbRect {
    /// The inverted rectangle that contains nothing.
    pub const EMPTY: Self = Self {
        left: f64::INFINITY,
        top: f64::NEG_INFINITY,
        right: f64::NEG_INFINITY,
        bottom: f64::INFINITY,
    };

    /// Creates a rectangle from its four sides, swapping them if needed.
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.min(right),
            top: top.max(bottom),
            right: left.max(right),
            bottom: top.min(bottom),
        }
    }

    /// Creates the rectangle spanned by two opposite corners.
    #[must_use]
    pub fn from_corners(a: &Point2, b: &Point2) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Smallest rectangle containing every point.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        points.into_iter().fold(Self::EMPTY, |acc, p| acc.expanded(p))
    }

    /// Returns `true` if the rectangle contains no point at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }

    /// Returns `true` if the rectangle has zero extent in both directions.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || (self.width() < EPSILON && self.height() < EPSILON)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(0.5 * (self.left + self.right), 0.5 * (self.top + self.bottom))
    }

    /// Rectangle grown to include `p`.
    #[must_use]
    pub fn expanded(&self, p: &Point2) -> Self {
        Self {
            left: self.left.min(p.x),
            top: self.top.max(p.y),
            right: self.right.max(p.x),
            bottom: self.bottom.min(p.y),
        }
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Rectangle grown by `margin` on every side.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        Self {
            left: self.left - margin,
            top: self.top + margin,
            right: self.right + margin,
            bottom: self.bottom - margin,
        }
    }

    /// Returns `true` if `p` lies inside or on the rectangle.
    #[must_use]
    pub fn is_inside(&self, p: &Point2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    /// Returns `true` if `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        !other.is_empty()
            && other.left >= self.left
            && other.right <= self.right
            && other.bottom >= self.bottom
            && other.top <= self.top
    }

    /// Returns `true` if the two rectangles overlap or touch.
    #[must_use]
    pub fn is_intersected(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left <= other.right
            && other.left <= self.right
            && self.bottom <= other.top
            && other.bottom <= self.top
    }

    /// Corners in counter-clockwise order starting at the bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.left, self.bottom),
            Point2::new(self.right, self.bottom),
            Point2::new(self.right, self.top),
            Point2::new(self.left, self.top),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_spans_all() {
        let pts = [Point2::new(1.0, 5.0), Point2::new(-2.0, 3.0), Point2::new(4.0, -1.0)];
        let r = AabbRect::from_points(&pts);
        assert_eq!(r, AabbRect::new(-2.0, 5.0, 4.0, -1.0));
        assert!(!r.is_empty());
    }

    #[test]
    fn empty_rect() {
        let r = AabbRect::from_points(std::iter::empty());
        assert!(r.is_empty());
        assert!(!r.is_intersected(&AabbRect::new(0.0, 1.0, 1.0, 0.0)));
        assert!(r.area().abs() < f64::EPSILON);
    }

    #[test]
    fn new_normalizes_sides() {
        let r = AabbRect::new(3.0, -1.0, 1.0, 2.0);
        assert_eq!((r.left, r.top, r.right, r.bottom), (1.0, 2.0, 3.0, -1.0));
    }

    #[test]
    fn touching_rects_intersect() {
        let a = AabbRect::new(0.0, 1.0, 1.0, 0.0);
        let b = AabbRect::new(1.0, 1.0, 2.0, 0.0);
        assert!(a.is_intersected(&b));
        assert!(!a.is_intersected(&b.inflated(-0.1)));
    }

    #[test]
    fn horizontal_segment_is_not_degenerate() {
        let r = AabbRect::from_corners(&Point2::new(0.0, 0.0), &Point2::new(3.0, 0.0));
        assert!(!r.is_degenerate());
        assert!(AabbRect::from_corners(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0)).is_degenerate());
    }
}
