use crate::math::Point2;

use super::{AabbRect, Arc, BSpline, Bezier, Circle, Curve, Ellipse, Line, Polygon, Polyline};

/// Discriminant of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Polyline,
    Polygon,
    Rect,
    Circle,
    Ellipse,
    Arc,
    Bezier,
    BSpline,
}

/// The closed family of shapes the kernel operates on.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Rect(AabbRect),
    Circle(Circle),
    Ellipse(Ellipse),
    Arc(Arc),
    Bezier(Bezier),
    BSpline(BSpline),
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Line(_) => ShapeKind::Line,
            Self::Polyline(_) => ShapeKind::Polyline,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::Rect(_) => ShapeKind::Rect,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Ellipse(_) => ShapeKind::Ellipse,
            Self::Arc(_) => ShapeKind::Arc,
            Self::Bezier(_) => ShapeKind::Bezier,
            Self::BSpline(_) => ShapeKind::BSpline,
        }
    }

    /// Bounding rectangle used for coarse culling.
    #[must_use]
    pub fn bounding_rect(&self) -> AabbRect {
        match self {
            Self::Line(l) => l.bounding_rect(),
            Self::Polyline(p) => p.bounding_rect(),
            Self::Polygon(p) => p.bounding_rect(),
            Self::Rect(r) => *r,
            Self::Circle(c) => c.bounding_rect(),
            Self::Ellipse(e) => e.bounding_rect(),
            Self::Arc(a) => a.bounding_rect(),
            Self::Bezier(b) => b.bounding_rect(),
            Self::BSpline(s) => s.bounding_rect(),
        }
    }

    /// Piecewise-linear approximation. Polygons and rectangles come back
    /// closed.
    #[must_use]
    pub fn shape(&self) -> Polyline {
        match self {
            Self::Line(l) => Polyline::new(vec![l.front, l.back]),
            Self::Polyline(p) => p.clone(),
            Self::Polygon(p) => Polyline::new(p.points().to_vec()),
            Self::Rect(r) => Polyline::new(Polygon::from_rect(r).points().to_vec()),
            Self::Circle(c) => c.shape(),
            Self::Ellipse(e) => e.shape(),
            Self::Arc(a) => a.shape(),
            Self::Bezier(b) => b.shape(),
            Self::BSpline(s) => s.shape(),
        }
    }

    /// Returns `true` if the shape bounds a region.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Polygon(_) | Self::Rect(_) | Self::Circle(_) => true,
            Self::Line(_) | Self::Arc(_) => false,
            Self::Polyline(p) => p.len() > 2 && p.front() == p.back(),
            Self::Ellipse(e) => e.is_closed(),
            Self::Bezier(b) => b.is_closed(),
            Self::BSpline(s) => s.is_closed(),
        }
    }

    /// Returns `true` for degenerate shapes that no query can hit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Line(l) => l.is_empty(),
            Self::Polyline(p) => p.is_empty(),
            Self::Polygon(p) => p.is_empty(),
            Self::Rect(r) => r.is_degenerate(),
            Self::Circle(_) | Self::Ellipse(_) | Self::Arc(_) | Self::Bezier(_) | Self::BSpline(_) => false,
        }
    }

    /// Start point of open shapes.
    #[must_use]
    pub fn front(&self) -> Option<Point2> {
        match self {
            Self::Line(l) => Some(l.front),
            Self::Polyline(p) => p.front().copied(),
            Self::Arc(a) => Some(a.front()),
            Self::Ellipse(e) if e.is_arc() => Some(e.front()),
            Self::Bezier(b) => Some(b.front()),
            Self::BSpline(s) => Some(s.front()),
            _ => None,
        }
    }

    /// End point of open shapes.
    #[must_use]
    pub fn back(&self) -> Option<Point2> {
        match self {
            Self::Line(l) => Some(l.back),
            Self::Polyline(p) => p.back().copied(),
            Self::Arc(a) => Some(a.back()),
            Self::Ellipse(e) if e.is_arc() => Some(e.back()),
            Self::Bezier(b) => Some(b.back()),
            Self::BSpline(s) => Some(s.back()),
            _ => None,
        }
    }

    /// Borrows the shape as a parametric curve where it is one.
    #[must_use]
    pub fn as_curve(&self) -> Option<&dyn Curve> {
        match self {
            Self::Line(l) => Some(l),
            Self::Circle(c) => Some(c),
            Self::Ellipse(e) => Some(e),
            Self::Arc(a) => Some(a),
            Self::Bezier(b) => Some(b),
            Self::BSpline(s) => Some(s),
            Self::Polyline(_) | Self::Polygon(_) | Self::Rect(_) => None,
        }
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_shape!(Line, Polyline, Polygon, Circle, Ellipse, Arc, Bezier, BSpline);

impl From<AabbRect> for Shape {
    fn from(value: AabbRect) -> Self {
        Self::Rect(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_bounds_dispatch() {
        let s: Shape = Circle::new(Point2::new(1.0, 1.0), 1.0).unwrap().into();
        assert_eq!(s.kind(), ShapeKind::Circle);
        assert_eq!(s.bounding_rect(), AabbRect::new(0.0, 2.0, 2.0, 0.0));
        assert!(s.is_closed());
        assert!(s.front().is_none());
    }

    #[test]
    fn rect_shape_is_closed_ring() {
        let s = Shape::Rect(AabbRect::new(0.0, 1.0, 2.0, 0.0));
        let p = s.shape();
        assert_eq!(p.len(), 5);
        assert_eq!(p.front(), p.back());
    }

    #[test]
    fn open_shape_endpoints() {
        let s: Shape = Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).into();
        assert_eq!(s.front(), Some(Point2::new(0.0, 0.0)));
        assert_eq!(s.back(), Some(Point2::new(1.0, 0.0)));
        assert!(s.as_curve().is_some());
    }
}
