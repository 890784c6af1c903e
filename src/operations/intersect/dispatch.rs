//! Pairwise routing of shape intersections.
//!
//! | pair                                   | routine                        |
//! |----------------------------------------|--------------------------------|
//! | polyline, polygon or rect with any     | per edge, as a segment         |
//! | segment × segment                      | [`segment_segment`]            |
//! | segment × circle / arc / ellipse       | [`segment_circle`], [`segment_arc`], [`segment_ellipse`] |
//! | segment × Bézier / B-spline            | [`segment_curve_points`]       |
//! | circle × circle, circle × arc, arc × arc | [`circle_circle`], [`circle_arc`], [`arc_arc`] |
//! | ellipse × circle / arc / ellipse       | [`conic_conic`]                |
//! | Bézier / B-spline × any curve          | [`curve_curve_points`]         |
//!
//! Pairs are symmetric: the routine is called with the arguments in the
//! order its signature expects.

use tracing::trace;

use crate::geometry::{AabbRect, Curve, Line, Polygon, Shape};
use crate::math::{Point2, EPSILON};
use crate::operations::query::contain::is_inside_rect;

use super::conic::{arc_arc, circle_arc, circle_circle, conic_conic};
use super::curve::{curve_curve_points, segment_curve_points};
use super::dedup_points;
use super::segment::{segment_arc, segment_circle, segment_ellipse, segment_segment};

/// Intersection points of the boundaries or curves of two shapes.
#[must_use]
pub fn find_intersections(a: &Shape, b: &Shape) -> Vec<Point2> {
    Router::CULLED.find(a, b)
}

/// Returns `true` if the boundaries or curves of two shapes meet.
#[must_use]
pub fn is_intersected(a: &Shape, b: &Shape) -> bool {
    !Router::CULLED.find(a, b).is_empty()
}

/// Crossing selection: `shape` lies inside `rect` or its curve crosses the
/// rectangle's boundary.
#[must_use]
pub fn is_selected_by_rect(shape: &Shape, rect: &AabbRect) -> bool {
    Router::CULLED.selected_by_rect(shape, rect)
}

/// Intersection router. With `cull` set, shape and edge pairs whose
/// bounding rects are disjoint are skipped before any exact test.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Router {
    cull: bool,
}

impl Router {
    pub(crate) const CULLED: Self = Self { cull: true };
    pub(crate) const UNCULLED: Self = Self { cull: false };

    fn overlaps(self, a: &AabbRect, b: &AabbRect) -> bool {
        !self.cull || a.inflated(EPSILON).is_intersected(b)
    }

    pub(crate) fn find(self, a: &Shape, b: &Shape) -> Vec<Point2> {
        if a.is_empty() || b.is_empty() || !self.overlaps(&a.bounding_rect(), &b.bounding_rect()) {
            return Vec::new();
        }
        let points = if let Some(edges) = chain_edges(a) {
            let rect = b.bounding_rect();
            edges
                .iter()
                .filter(|e| self.overlaps(&e.bounding_rect(), &rect))
                .flat_map(|e| self.segment_with(e, b))
                .collect()
        } else if chain_edges(b).is_some() {
            return self.find(b, a);
        } else {
            self.route(a, b)
        };
        let points = dedup_points(points);
        trace!(a = ?a.kind(), b = ?b.kind(), count = points.len(), "intersections");
        points
    }

    fn route(self, a: &Shape, b: &Shape) -> Vec<Point2> {
        match (a, b) {
            (Shape::Line(l), other) | (other, Shape::Line(l)) => self.segment_with(l, other),
            (Shape::Circle(c0), Shape::Circle(c1)) => circle_circle(c0, c1),
            (Shape::Circle(c), Shape::Arc(arc)) | (Shape::Arc(arc), Shape::Circle(c)) => circle_arc(c, arc),
            (Shape::Arc(a0), Shape::Arc(a1)) => arc_arc(a0, a1),
            (
                Shape::Ellipse(_),
                Shape::Circle(_) | Shape::Arc(_) | Shape::Ellipse(_),
            )
            | (Shape::Circle(_) | Shape::Arc(_), Shape::Ellipse(_)) => conic_conic(a, b),
            _ => match (a.as_curve(), b.as_curve()) {
                (Some(ca), Some(cb)) => curve_curve_points(ca, cb),
                _ => Vec::new(),
            },
        }
    }

    fn segment_with(self, seg: &Line, other: &Shape) -> Vec<Point2> {
        if seg.is_empty() {
            return Vec::new();
        }
        match other {
            Shape::Line(l) if l.is_empty() => Vec::new(),
            Shape::Line(l) => segment_segment(seg, l, false).into_iter().collect(),
            Shape::Circle(c) => segment_circle(seg, c, false),
            Shape::Arc(a) => segment_arc(seg, a, false),
            Shape::Ellipse(e) => segment_ellipse(seg, e, false),
            Shape::Bezier(b) => segment_curve_points(seg, b, false),
            Shape::BSpline(s) => segment_curve_points(seg, s, false),
            Shape::Polyline(_) | Shape::Polygon(_) | Shape::Rect(_) => {
                let seg_rect = seg.bounding_rect();
                chain_edges(other)
                    .unwrap_or_default()
                    .iter()
                    .filter(|e| self.overlaps(&e.bounding_rect(), &seg_rect))
                    .filter_map(|e| segment_segment(seg, e, false))
                    .collect()
            }
        }
    }

    pub(crate) fn selected_by_rect(self, shape: &Shape, rect: &AabbRect) -> bool {
        if shape.is_empty() || rect.is_empty() {
            return false;
        }
        is_inside_rect(shape, rect) || !self.find(shape, &Shape::Rect(*rect)).is_empty()
    }
}

/// Non-degenerate edges of the piecewise-linear shapes.
fn chain_edges(shape: &Shape) -> Option<Vec<Line>> {
    let edges: Vec<Line> = match shape {
        Shape::Polyline(p) => p.edges().collect(),
        Shape::Polygon(p) => p.edges().collect(),
        Shape::Rect(r) => Polygon::from_rect(r).edges().collect(),
        _ => return None,
    };
    Some(edges.into_iter().filter(|e| !e.is_empty()).collect())
}
