//! Point-to-shape distance.
//!
//! Lines, circles, arcs and ellipses use closed forms (the ellipse through a
//! robust bisection on the closest-point equation). Bézier and B-spline
//! curves seed a parameter from their down-sampled tessellation and refine it
//! with [`minimize`].

use tracing::trace;

use crate::geometry::{AabbRect, Arc, Circle, Curve, Ellipse, Line, Polygon, Polyline, Shape};
use crate::math::distance_2d::{closest_on_segment, point_to_line_dist, point_to_segment_dist};
use crate::math::refine::minimize;
use crate::math::{Point2, EPSILON};
use crate::tessellation::TessellationParams;

use super::ClosestPointResult;

/// Number of nearest tessellation segments refined on the true curve.
const SEED_CANDIDATES: usize = 2;
const ELLIPSE_BISECTIONS: usize = 160;

/// Distance from `point` to the curve or boundary of `shape`.
///
/// Region shapes (polygons, rectangles, circles, full ellipses) measure to
/// their boundary, so a point inside still has a positive distance.
#[must_use]
pub fn distance(point: &Point2, shape: &Shape) -> f64 {
    match shape {
        Shape::Line(l) => distance_to_line(point, l, false),
        Shape::Polyline(p) => distance_to_polyline(point, p),
        Shape::Polygon(p) => distance_to_polygon(point, p),
        Shape::Rect(r) => distance_to_rect(point, r),
        Shape::Circle(c) => distance_to_circle(point, c),
        Shape::Ellipse(e) => distance_to_ellipse(point, e),
        Shape::Arc(a) => distance_to_arc(point, a),
        Shape::Bezier(b) => nearest_on_curve(b, point).distance,
        Shape::BSpline(s) => nearest_on_curve(s, point).distance,
    }
}

/// Distance to a segment, or to its supporting line when `infinite` is set.
#[must_use]
pub fn distance_to_line(point: &Point2, line: &Line, infinite: bool) -> f64 {
    if infinite {
        point_to_line_dist(point, &line.front, &line.back)
    } else {
        point_to_segment_dist(point, &line.front, &line.back)
    }
}

#[must_use]
pub fn distance_to_polyline(point: &Point2, polyline: &Polyline) -> f64 {
    match polyline.points.as_slice() {
        [] => f64::INFINITY,
        [only] => (point - only).norm(),
        pts => pts
            .windows(2)
            .map(|w| point_to_segment_dist(point, &w[0], &w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Distance to the polygon boundary.
#[must_use]
pub fn distance_to_polygon(point: &Point2, polygon: &Polygon) -> f64 {
    polygon
        .edges()
        .map(|e| point_to_segment_dist(point, &e.front, &e.back))
        .fold(f64::INFINITY, f64::min)
}

/// Distance to the rectangle boundary.
#[must_use]
pub fn distance_to_rect(point: &Point2, rect: &AabbRect) -> f64 {
    if rect.is_empty() {
        return f64::INFINITY;
    }
    distance_to_polygon(point, &Polygon::from_rect(rect))
}

#[must_use]
pub fn distance_to_circle(point: &Point2, circle: &Circle) -> f64 {
    ((point - circle.center()).norm() - circle.radius()).abs()
}

#[must_use]
pub fn distance_to_arc(point: &Point2, arc: &Arc) -> f64 {
    crate::math::distance_2d::point_to_arc_dist(point, arc.center(), arc.radius(), arc.start_angle(), arc.sweep())
}

#[must_use]
pub fn distance_to_ellipse(point: &Point2, ellipse: &Ellipse) -> f64 {
    closest_on_ellipse(ellipse, point).distance
}

/// Closest point on an ellipse or elliptical arc.
#[must_use]
pub fn closest_on_ellipse(ellipse: &Ellipse, point: &Point2) -> ClosestPointResult {
    let local = ellipse.to_local(point);
    let foot = closest_on_axis_aligned_ellipse(ellipse.rx(), ellipse.ry(), local.x, local.y);
    let global = ellipse.from_local(&foot);
    let t = ellipse.param_of_point(&global);
    if let Some(parameter) = ellipse.domain_param(t) {
        return ClosestPointResult {
            point: global,
            parameter,
            distance: (point - global).norm(),
        };
    }
    // The global foot lies outside the arc; search the arc itself.
    nearest_on_curve(ellipse, point)
}

/// Closest point of the ellipse `x²/a² + y²/b² = 1` to `(x, y)`.
///
/// Works in the first quadrant, where the closest point is the root of a
/// monotone function of the Lagrange multiplier, then reflects back.
fn closest_on_axis_aligned_ellipse(a: f64, b: f64, x: f64, y: f64) -> Point2 {
    let swap = a < b;
    let (e0, e1, y0, y1) = if swap {
        (b, a, y.abs(), x.abs())
    } else {
        (a, b, x.abs(), y.abs())
    };

    let (x0, x1) = if y1 > 0.0 {
        if y0 > 0.0 {
            let z0 = y0 / e0;
            let z1 = y1 / e1;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                (y0, y1)
            } else {
                let r0 = (e0 / e1) * (e0 / e1);
                let s = ellipse_root(r0, z0, z1, g);
                (r0 * y0 / (s + r0), y1 / (s + 1.0))
            }
        } else {
            (0.0, e1)
        }
    } else {
        let numer = e0 * y0;
        let denom = e0 * e0 - e1 * e1;
        if numer < denom {
            let xde = numer / denom;
            (e0 * xde, e1 * (1.0 - xde * xde).max(0.0).sqrt())
        } else {
            (e0, 0.0)
        }
    };

    let (lx, ly) = if swap { (x1, x0) } else { (x0, x1) };
    Point2::new(lx.copysign(x), ly.copysign(y))
}

fn ellipse_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z1) - 1.0 };
    let mut s = 0.0;
    for _ in 0..ELLIPSE_BISECTIONS {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

/// Numerical closest point on a bounded curve.
///
/// The down-sampled tessellation picks the nearest segments; each seeds a
/// bracket spanning its neighbours that [`minimize`] refines on the true
/// curve. Curve endpoints are always candidates.
pub fn nearest_on_curve<C: Curve + ?Sized>(curve: &C, point: &Point2) -> ClosestPointResult {
    let domain = curve.domain();
    let sampled = curve.sampled();
    let coarse = sampled.down_sampled(TessellationParams::default().tolerance);

    let mut best = [domain.t_min, domain.t_max]
        .into_iter()
        .map(|t| {
            let q = curve.evaluate(t);
            ClosestPointResult {
                point: q,
                parameter: t,
                distance: (point - q).norm(),
            }
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .unwrap_or(ClosestPointResult {
            point: curve.front(),
            parameter: domain.t_min,
            distance: f64::INFINITY,
        });

    let mut ranked: Vec<(usize, f64, f64)> = coarse
        .points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let (q, s) = closest_on_segment(point, &w[0], &w[1]);
            (i, (point - q).norm(), s)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let last = coarse.params.len().saturating_sub(1);
    for &(i, _, s) in ranked.iter().take(SEED_CANDIDATES) {
        let (ta, tb) = (coarse.params[i], coarse.params[i + 1]);
        let lo = coarse.params[i.saturating_sub(1)];
        let hi = coarse.params[(i + 2).min(last)];
        let seed = ta + s * (tb - ta);
        let r = minimize(|t| (curve.evaluate(t) - point).norm(), lo, hi, seed, 0.5 * (tb - ta));
        if r.value < best.distance {
            best = ClosestPointResult {
                point: curve.evaluate(r.t),
                parameter: r.t,
                distance: r.value,
            };
        }
    }
    trace!(t = best.parameter, distance = best.distance, "nearest point on curve");
    best
}

/// Returns `true` if `point` is within `EPSILON` of the shape.
#[must_use]
pub fn is_on_shape(point: &Point2, shape: &Shape) -> bool {
    distance(point, shape) < EPSILON
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{BSpline, Bezier, SplineKind};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn circle_distance_inside_and_outside() {
        let c = Circle::new(p(0.0, 0.0), 5.0).unwrap();
        assert_abs_diff_eq!(distance_to_circle(&p(1.0, 0.0), &c), 4.0);
        assert_abs_diff_eq!(distance_to_circle(&p(0.0, 8.0), &c), 3.0);
    }

    #[test]
    fn polygon_distance_to_boundary() {
        let sq = Polygon::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)]);
        assert_abs_diff_eq!(distance(&p(5.0, 4.0), &Shape::Polygon(sq.clone())), 4.0);
        assert_abs_diff_eq!(distance(&p(13.0, 14.0), &Shape::Polygon(sq)), 5.0);
    }

    #[test]
    fn ellipse_distance_on_axes() {
        let e = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, 0.0).unwrap();
        assert_abs_diff_eq!(distance_to_ellipse(&p(7.0, 0.0), &e), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance_to_ellipse(&p(0.0, 5.0), &e), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance_to_ellipse(&p(0.0, 0.0), &e), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn ellipse_distance_off_axis_is_normal() {
        let e = Ellipse::new(p(1.0, -2.0), 5.0, 3.0, 0.7).unwrap();
        let q = p(6.0, 4.0);
        let r = closest_on_ellipse(&e, &q);
        // The residual must be normal to the curve.
        let tangent = e.derivative(r.parameter);
        assert_abs_diff_eq!((q - r.point).dot(&tangent), 0.0, epsilon = 1e-8);
        let sampled_min = (0..20_000)
            .map(|i| (e.point_at_param(f64::from(i) * 2.0 * PI / 20_000.0) - q).norm())
            .fold(f64::INFINITY, f64::min);
        assert!(r.distance <= sampled_min + 1e-9);
    }

    #[test]
    fn elliptical_arc_falls_back_to_endpoint() {
        let e = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, 0.0).unwrap().with_arc(0.0, PI).unwrap();
        // Below the arc: the nearest arc points are its ends.
        let d = distance_to_ellipse(&p(4.0, -3.0), &e);
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn arc_distance() {
        let a = Arc::from_center(p(0.0, 0.0), 1.0, 0.0, PI, true).unwrap();
        assert_abs_diff_eq!(distance_to_arc(&p(0.0, 3.0), &a), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance_to_arc(&p(2.0, -1.0), &a), 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn collinear_cubic_matches_segment_distance() {
        let b = Bezier::new(3, vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)]).unwrap();
        let seg = Line::new(p(0.0, 0.0), p(3.0, 3.0));
        for q in [p(2.0, 0.0), p(-1.0, 0.5), p(4.0, 2.5), p(1.2, 1.9)] {
            let d = distance(&q, &Shape::Bezier(b.clone()));
            assert_abs_diff_eq!(d, distance_to_line(&q, &seg, false), epsilon = 1e-4);
        }
    }

    #[test]
    fn bspline_distance_to_sample() {
        let s = BSpline::with_uniform_knots(
            SplineKind::Cubic,
            vec![p(0.0, 0.0), p(1.0, 3.0), p(3.0, 3.0), p(4.0, 0.0), p(6.0, 2.0)],
        )
        .unwrap();
        let on = s.evaluate(0.37);
        assert!(distance(&on, &Shape::BSpline(s.clone())) < 1e-7);
        let r = nearest_on_curve(&s, &on);
        assert_abs_diff_eq!(r.parameter, 0.37, epsilon = 1e-6);
    }
}
