//! Closest point on a shape.

use crate::geometry::{Arc, Circle, Curve, Line, Polygon, Shape};
use crate::math::distance_2d::closest_on_segment;
use crate::math::{angle_of, normalize_angle, Point2, EPSILON};
use crate::operations::query::{closest_on_ellipse, ClosestPointResult};

use super::foot::foot_points_on_curve;

/// Closest point of a bounded curve: the nearest of its endpoints and foot
/// points.
#[must_use]
pub fn closest_point_on_curve<C: Curve + ?Sized>(curve: &C, point: &Point2) -> ClosestPointResult {
    let domain = curve.domain();
    let ends = [domain.t_min, domain.t_max].map(|t| {
        let q = curve.evaluate(t);
        ClosestPointResult {
            point: q,
            parameter: t,
            distance: (q - point).norm(),
        }
    });
    foot_points_on_curve(curve, point)
        .into_iter()
        .chain(ends)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .unwrap_or(ends[0])
}

/// Closest point of `shape` to `point`.
///
/// The parameter follows the shape's own parametrization; for polylines,
/// polygons and rectangles it is the edge index plus the position along the
/// edge. Returns `None` for shapes without points.
#[must_use]
pub fn closest_point(point: &Point2, shape: &Shape) -> Option<ClosestPointResult> {
    match shape {
        Shape::Line(l) => Some(on_segment(point, l, 0.0)),
        Shape::Polyline(p) => closest_on_chain(point, &p.points),
        Shape::Polygon(p) => closest_on_chain(point, p.points()),
        Shape::Rect(r) => closest_on_chain(point, Polygon::from_rect(r).points()),
        Shape::Circle(c) => Some(on_circle(point, c)),
        Shape::Arc(a) => Some(on_arc(point, a)),
        Shape::Ellipse(e) => Some(closest_on_ellipse(e, point)),
        Shape::Bezier(b) => Some(closest_point_on_curve(b, point)),
        Shape::BSpline(s) => Some(closest_point_on_curve(s, point)),
    }
}

fn on_segment(point: &Point2, line: &Line, offset: f64) -> ClosestPointResult {
    let (q, t) = closest_on_segment(point, &line.front, &line.back);
    ClosestPointResult {
        point: q,
        parameter: offset + t,
        distance: (point - q).norm(),
    }
}

fn closest_on_chain(point: &Point2, points: &[Point2]) -> Option<ClosestPointResult> {
    match points {
        [] => None,
        [only] => Some(ClosestPointResult {
            point: *only,
            parameter: 0.0,
            distance: (point - only).norm(),
        }),
        _ => points
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                #[allow(clippy::cast_precision_loss)]
                let offset = i as f64;
                on_segment(point, &Line::new(w[0], w[1]), offset)
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance)),
    }
}

fn on_circle(point: &Point2, circle: &Circle) -> ClosestPointResult {
    let v = point - circle.center();
    // Every point is closest to the centre; pick angle zero.
    let angle = if v.norm() < EPSILON { 0.0 } else { angle_of(&v) };
    let q = circle.point_at_angle(angle);
    ClosestPointResult {
        point: q,
        parameter: normalize_angle(angle),
        distance: (point - q).norm(),
    }
}

fn on_arc(point: &Point2, arc: &Arc) -> ClosestPointResult {
    let v = point - arc.center();
    if v.norm() >= EPSILON {
        if let Some(t) = arc.param_of_angle(angle_of(&v)) {
            let q = arc.evaluate(t);
            return ClosestPointResult {
                point: q,
                parameter: t,
                distance: (point - q).norm(),
            };
        }
    }
    let (front, back) = (arc.front(), arc.back());
    let (df, db) = ((point - front).norm(), (point - back).norm());
    if df <= db {
        ClosestPointResult {
            point: front,
            parameter: 0.0,
            distance: df,
        }
    } else {
        ClosestPointResult {
            point: back,
            parameter: 1.0,
            distance: db,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{BSpline, Bezier, Ellipse, SplineKind};
    use crate::operations::query::distance;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn chain_parameter_counts_edges() {
        let s: Shape = crate::geometry::Polyline::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)]).into();
        let r = closest_point(&p(5.0, 1.0), &s).unwrap();
        assert_eq!(r.point, p(4.0, 1.0));
        assert_abs_diff_eq!(r.parameter, 1.25);
        assert_abs_diff_eq!(r.distance, 1.0);
    }

    #[test]
    fn arc_falls_back_to_nearest_end() {
        let a: Shape = Arc::from_center(p(0.0, 0.0), 1.0, 0.0, PI / 2.0, true).unwrap().into();
        let r = closest_point(&p(2.0, -1.0), &a).unwrap();
        assert_abs_diff_eq!(r.point.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.parameter, 0.0);
        let r = closest_point(&p(1.0, 1.0), &a).unwrap();
        assert_abs_diff_eq!(r.parameter, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn circle_closest_is_radial() {
        let c: Shape = Circle::new(p(1.0, 1.0), 2.0).unwrap().into();
        let r = closest_point(&p(1.0, 5.0), &c).unwrap();
        assert_abs_diff_eq!(r.point.y, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.parameter, PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn curve_closest_agrees_with_distance() {
        let shapes: Vec<Shape> = vec![
            Bezier::new(3, vec![p(0.0, 0.0), p(1.0, 3.0), p(3.0, -2.0), p(4.0, 1.0)]).unwrap().into(),
            BSpline::with_uniform_knots(
                SplineKind::Cubic,
                vec![p(0.0, 0.0), p(1.0, 2.0), p(2.0, -1.0), p(4.0, 2.0), p(5.0, 0.0)],
            )
            .unwrap()
            .into(),
            Ellipse::new(p(0.0, 0.0), 3.0, 1.0, 0.4).unwrap().into(),
        ];
        for s in &shapes {
            for q in [p(2.0, 3.0), p(-1.0, -1.0), p(2.5, 0.2)] {
                let r = closest_point(&q, s).unwrap();
                assert_abs_diff_eq!(r.distance, distance(&q, s), epsilon = 1e-6);
                assert_abs_diff_eq!((r.point - q).norm(), r.distance, epsilon = 1e-12);
            }
        }
    }
}
