//! Splitting curves at a parameter or at a point on them.
//!
//! Every split returns two shapes of the same kind whose union traces the
//! original and which share the split point. Splitting at an end, or at a
//! point off the shape, yields `None`.

use tracing::trace;

use crate::geometry::curve::de_casteljau;
use crate::geometry::{Arc, BSpline, Bezier, Curve, Ellipse, Line, Polyline, Shape};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{angle_of, Point2, EPSILON};
use crate::operations::query::{distance, nearest_on_curve};

/// Largest distance from a curve at which a split point is accepted.
const ON_CURVE_TOLERANCE: f64 = 1e-6;

/// Splits a Bézier chain at global parameter `u` in `(0, piece_count)`.
///
/// Splitting at a piece boundary cuts the control points there; otherwise
/// the piece containing `u` is subdivided.
#[must_use]
pub fn split_bezier(bezier: &Bezier, u: f64) -> Option<(Bezier, Bezier)> {
    if !bezier.domain().is_interior(u) {
        return None;
    }
    let split = bezier.evaluate(u);
    if split == bezier.front() || split == bezier.back() {
        return None;
    }
    let order = bezier.order();
    let pts = bezier.control_points();
    let (i, s) = bezier.locate(u);
    let (left, right) = if s == 0.0 {
        (pts[..=i * order].to_vec(), pts[i * order..].to_vec())
    } else {
        let (l, r) = de_casteljau(bezier.piece(i), s);
        let mut left = pts[..i * order].to_vec();
        left.extend(l);
        let mut right = r;
        right.extend_from_slice(&pts[(i + 1) * order + 1..]);
        (left, right)
    };
    trace!(u, piece = i, "split bezier");
    Some((Bezier::new(order, left).ok()?, Bezier::new(order, right).ok()?))
}

/// Splits a Bézier chain at the parameter nearest to `point`.
#[must_use]
pub fn split_bezier_at_point(bezier: &Bezier, point: &Point2) -> Option<(Bezier, Bezier)> {
    let nearest = nearest_on_curve(bezier, point);
    if nearest.distance > ON_CURVE_TOLERANCE {
        return None;
    }
    split_bezier(bezier, nearest.parameter)
}

/// Splits a B-spline at `t` in `(0, 1)`.
///
/// The knot is inserted until its multiplicity equals the degree, at which
/// point the spline interpolates a control point there and the control
/// polygon falls apart into two clamped splines. Stored path points are
/// distributed to the half they lie on and the split point is added to both.
#[must_use]
pub fn split_bspline(spline: &BSpline, t: f64) -> Option<(BSpline, BSpline)> {
    if !spline.domain().is_interior(t) {
        return None;
    }
    let p = spline.degree();
    // Snap to an existing knot so repeated insertion stays exact.
    let t = spline
        .knots()
        .iter()
        .copied()
        .find(|k| (k - t).abs() < 1e-14)
        .unwrap_or(t);
    let mut refined = spline.clone();
    while refined.multiplicity(t) < p {
        refined = refined.insert_knot(t);
    }
    let knots = refined.knots();
    let k = knots.iter().rposition(|&x| x == t)?;
    if k < p {
        return None;
    }
    let ctrl = refined.control_points();

    let left_ctrl = ctrl[..=k - p].to_vec();
    let mut left_knots = knots[..=k].to_vec();
    left_knots.push(t);

    let right_ctrl = ctrl[k - p..].to_vec();
    let mut right_knots = vec![t];
    right_knots.extend_from_slice(&knots[k - p + 1..]);

    let mut left = BSpline::new(spline.kind(), left_ctrl, left_knots).ok()?;
    let mut right = BSpline::new(spline.kind(), right_ctrl, right_knots).ok()?;

    if !spline.path_points().is_empty() {
        let split = spline.evaluate(t);
        let mut before = Vec::new();
        let mut after = vec![split];
        for pp in spline.path_points() {
            if (pp - split).norm() < EPSILON {
                continue;
            }
            if nearest_on_curve(spline, pp).parameter < t {
                before.push(*pp);
            } else {
                after.push(*pp);
            }
        }
        before.push(split);
        left.set_path_points(before);
        right.set_path_points(after);
    }
    trace!(t, "split bspline");
    Some((left, right))
}

/// Splits a polyline at a point on one of its edges.
#[must_use]
pub fn split_polyline(polyline: &Polyline, point: &Point2) -> Option<(Polyline, Polyline)> {
    let pts = &polyline.points;
    if polyline.front().is_none_or(|f| (f - point).norm() < EPSILON)
        || polyline.back().is_none_or(|b| (b - point).norm() < EPSILON)
    {
        return None;
    }
    let i = pts
        .windows(2)
        .position(|w| point_to_segment_dist(point, &w[0], &w[1]) < EPSILON)?;
    let (left, right) = if (pts[i + 1] - point).norm() < EPSILON {
        (pts[..=i + 1].to_vec(), pts[i + 1..].to_vec())
    } else {
        let mut left = pts[..=i].to_vec();
        left.push(*point);
        let mut right = vec![*point];
        right.extend_from_slice(&pts[i + 1..]);
        (left, right)
    };
    Some((Polyline::new(left), Polyline::new(right)))
}

/// Splits an open shape at `point`, preserving its kind.
///
/// Closed shapes (circles, full ellipses, polygons and rectangles) have no
/// ends to split between and yield `None`.
#[must_use]
pub fn split_shape(shape: &Shape, point: &Point2) -> Option<(Shape, Shape)> {
    let halves = match shape {
        Shape::Line(l) => split_line(l, point).map(|(a, b)| (a.into(), b.into())),
        Shape::Polyline(p) => split_polyline(p, point).map(|(a, b)| (a.into(), b.into())),
        Shape::Arc(a) => split_arc(a, point).map(|(a, b)| (a.into(), b.into())),
        Shape::Ellipse(e) if e.is_arc() => split_elliptical_arc(e, point).map(|(a, b)| (a.into(), b.into())),
        Shape::Bezier(b) => split_bezier_at_point(b, point).map(|(a, b)| (a.into(), b.into())),
        Shape::BSpline(s) => {
            let nearest = nearest_on_curve(s, point);
            if nearest.distance > ON_CURVE_TOLERANCE {
                return None;
            }
            split_bspline(s, nearest.parameter).map(|(a, b)| (a.into(), b.into()))
        }
        Shape::Circle(_) | Shape::Ellipse(_) | Shape::Polygon(_) | Shape::Rect(_) => None,
    };
    trace!(kind = ?shape.kind(), split = halves.is_some(), "split shape");
    halves
}

fn split_line(line: &Line, point: &Point2) -> Option<(Line, Line)> {
    if point_to_segment_dist(point, &line.front, &line.back) >= EPSILON
        || (point - line.front).norm() < EPSILON
        || (point - line.back).norm() < EPSILON
    {
        return None;
    }
    Some((Line::new(line.front, *point), Line::new(*point, line.back)))
}

fn split_arc(arc: &Arc, point: &Point2) -> Option<(Arc, Arc)> {
    if distance(point, &Shape::Arc(*arc)) > ON_CURVE_TOLERANCE {
        return None;
    }
    let angle = angle_of(&(point - arc.center()));
    let t = arc.param_of_angle(angle)?;
    if t * arc.sweep().abs() * arc.radius() < EPSILON || (1.0 - t) * arc.sweep().abs() * arc.radius() < EPSILON {
        return None;
    }
    let ccw = !arc.is_cw();
    let (start, end) = (arc.start_angle(), arc.end_angle());
    let left = Arc::from_center(*arc.center(), arc.radius(), start, angle, ccw).ok()?;
    let right = Arc::from_center(*arc.center(), arc.radius(), angle, end, ccw).ok()?;
    Some((left, right))
}

fn split_elliptical_arc(ellipse: &Ellipse, point: &Point2) -> Option<(Ellipse, Ellipse)> {
    let (start, sweep) = ellipse.arc_range()?;
    if distance(point, &Shape::Ellipse(*ellipse)) > ON_CURVE_TOLERANCE {
        return None;
    }
    let t = ellipse.domain_param(ellipse.param_of_point(point))?;
    if t - start < EPSILON || start + sweep - t < EPSILON {
        return None;
    }
    let full = ellipse.full();
    Some((full.with_arc(start, t).ok()?, full.with_arc(t, start + sweep).ok()?))
}
