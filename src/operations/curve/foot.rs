//! Foot points: orthogonal projections of a point onto a shape.

use crate::geometry::{Arc, Circle, Curve, Line, Shape};
use crate::math::{angle_of, Point2, EPSILON};
use crate::operations::query::ClosestPointResult;

use super::{solve_angle_condition, AngleCondition};

/// Every parameter of `curve` where the vector to `point` is normal to the
/// curve.
#[must_use]
pub fn foot_points_on_curve<C: Curve + ?Sized>(curve: &C, point: &Point2) -> Vec<ClosestPointResult> {
    solve_angle_condition(curve, point, AngleCondition::Perpendicular)
}

/// Foot points of `point` on `shape`.
///
/// Segments and the edges of piecewise-linear shapes report the projection
/// when it falls inside the segment. A circle reports both radial points
/// (none for its center); an arc keeps those in its range.
#[must_use]
pub fn foot_points(point: &Point2, shape: &Shape) -> Vec<Point2> {
    let mut out: Vec<Point2> = match shape {
        Shape::Line(l) => line_foot(point, l).into_iter().collect(),
        Shape::Polyline(p) => p.edges().filter_map(|e| line_foot(point, &e)).collect(),
        Shape::Polygon(p) => p.edges().filter_map(|e| line_foot(point, &e)).collect(),
        Shape::Rect(r) => crate::geometry::Polygon::from_rect(r)
            .edges()
            .filter_map(|e| line_foot(point, &e))
            .collect(),
        Shape::Circle(c) => circle_feet(point, c),
        Shape::Arc(a) => arc_feet(point, a),
        Shape::Ellipse(e) => foot_points_on_curve(e, point).into_iter().map(|r| r.point).collect(),
        Shape::Bezier(b) => foot_points_on_curve(b, point).into_iter().map(|r| r.point).collect(),
        Shape::BSpline(s) => foot_points_on_curve(s, point).into_iter().map(|r| r.point).collect(),
    };
    out.dedup_by(|a, b| (*a - *b).norm() < EPSILON);
    out
}

fn line_foot(point: &Point2, line: &Line) -> Option<Point2> {
    if line.is_empty() {
        return None;
    }
    let d = line.vector();
    let t = (point - line.front).dot(&d) / d.norm_squared();
    (0.0..=1.0).contains(&t).then(|| line.point_at(t))
}

fn circle_feet(point: &Point2, circle: &Circle) -> Vec<Point2> {
    radial_points(point, circle.center(), circle.radius())
}

fn arc_feet(point: &Point2, arc: &Arc) -> Vec<Point2> {
    let center = arc.center();
    radial_points(point, center, arc.radius())
        .into_iter()
        .filter(|q| arc.contains_angle(angle_of(&(q - center))))
        .collect()
}

fn radial_points(point: &Point2, center: &Point2, radius: f64) -> Vec<Point2> {
    let v = point - center;
    let len = v.norm();
    if len < EPSILON {
        return Vec::new();
    }
    let u = v / len;
    vec![center + u * radius, center - u * radius]
}
