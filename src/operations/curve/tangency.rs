//! Tangency points: where a line through a given point touches a shape.

use crate::geometry::{Arc, Curve, Ellipse, Shape};
use crate::math::{angle_of, Point2, Vector2, EPSILON};
use crate::operations::query::ClosestPointResult;

use super::{solve_angle_condition, AngleCondition};

/// Every parameter of `curve` whose tangent line passes through `point`.
#[must_use]
pub fn tangency_points_on_curve<C: Curve + ?Sized>(curve: &C, point: &Point2) -> Vec<ClosestPointResult> {
    solve_angle_condition(curve, point, AngleCondition::Parallel)
        .into_iter()
        .filter(|r| r.distance >= EPSILON)
        .collect()
}

/// Tangency points of lines through `point` on `shape`.
///
/// A point on a circle is its own single tangency point; a point inside has
/// none. Ellipses are handled in their unit-circle frame, where tangency is
/// preserved. Piecewise-linear shapes have no tangency points.
#[must_use]
pub fn tangency_points(point: &Point2, shape: &Shape) -> Vec<Point2> {
    match shape {
        Shape::Circle(c) => circle_tangents(point, c.center(), c.radius()),
        Shape::Arc(a) => arc_tangents(point, a),
        Shape::Ellipse(e) => ellipse_tangents(point, e),
        Shape::Bezier(b) => tangency_points_on_curve(b, point).into_iter().map(|r| r.point).collect(),
        Shape::BSpline(s) => tangency_points_on_curve(s, point).into_iter().map(|r| r.point).collect(),
        Shape::Line(_) | Shape::Polyline(_) | Shape::Polygon(_) | Shape::Rect(_) => Vec::new(),
    }
}

fn circle_tangents(point: &Point2, center: &Point2, radius: f64) -> Vec<Point2> {
    let v = point - center;
    let d = v.norm();
    if (d - radius).abs() <= EPSILON {
        return vec![*point];
    }
    if d < radius {
        return Vec::new();
    }
    let base = angle_of(&v);
    let alpha = (radius / d).acos();
    [base + alpha, base - alpha]
        .into_iter()
        .map(|a| center + Vector2::new(a.cos(), a.sin()) * radius)
        .collect()
}

fn arc_tangents(point: &Point2, arc: &Arc) -> Vec<Point2> {
    let center = arc.center();
    circle_tangents(point, center, arc.radius())
        .into_iter()
        .filter(|q| arc.contains_angle(angle_of(&(q - center))))
        .collect()
}

fn ellipse_tangents(point: &Point2, ellipse: &Ellipse) -> Vec<Point2> {
    let (rx, ry) = (ellipse.rx(), ellipse.ry());
    let local = ellipse.to_local(point);
    let unit = Point2::new(local.x / rx, local.y / ry);
    circle_tangents(&unit, &Point2::origin(), 1.0)
        .into_iter()
        .map(|q| ellipse.from_local(&Point2::new(q.x * rx, q.y * ry)))
        .filter(|q| ellipse.contains_param(ellipse.param_of_point(q)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Bezier, Circle};
    use crate::math::cross;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn circle_tangents_from_outside() {
        let c: Shape = Circle::new(p(0.0, 0.0), 1.0).unwrap().into();
        let q = p(2.0, 0.0);
        let t = tangency_points(&q, &c);
        assert_eq!(t.len(), 2);
        for s in &t {
            // Radius is perpendicular to the tangent line.
            assert_abs_diff_eq!(s.coords.dot(&(q - s)), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(s.x, 0.5, epsilon = 1e-12);
        }
        assert!(tangency_points(&p(0.5, 0.0), &c).is_empty());
        assert_eq!(tangency_points(&p(1.0, 0.0), &c), vec![p(1.0, 0.0)]);
    }

    #[test]
    fn arc_keeps_upper_tangent() {
        let a: Shape = Arc::from_center(p(0.0, 0.0), 1.0, 0.0, PI, true).unwrap().into();
        let t = tangency_points(&p(2.0, 0.0), &a);
        assert_eq!(t.len(), 1);
        assert!(t[0].y > 0.0);
    }

    #[test]
    fn rotated_ellipse_tangents() {
        let e = Ellipse::new(p(1.0, -1.0), 3.0, 1.0, 0.5).unwrap();
        let q = p(6.0, 4.0);
        let t = tangency_points(&q, &Shape::Ellipse(e));
        assert_eq!(t.len(), 2);
        for s in &t {
            let param = e.param_of_point(s);
            let tangent = e.derivative(param);
            assert_abs_diff_eq!(cross(&tangent.normalize(), &(q - s).normalize()), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubic_tangents_from_above() {
        let b = Bezier::new(3, vec![p(0.0, 0.0), p(1.0, 3.0), p(3.0, 3.0), p(4.0, 0.0)]).unwrap();
        // Every tangent line passes above the curve.
        let q = p(2.0, 5.0);
        let t = tangency_points_on_curve(&b, &q);
        assert_eq!(t.len(), 2);
        for r in &t {
            let tangent = b.derivative(r.parameter).normalize();
            assert_abs_diff_eq!(cross(&tangent, &(r.point - q).normalize()), 0.0, epsilon = 1e-6);
        }
    }
}
