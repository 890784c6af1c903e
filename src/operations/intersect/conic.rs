//! Conic against conic: circles, arcs, ellipses and elliptical arcs.
//!
//! Circle pairs have a closed form. Pairs involving an ellipse are
//! estimated on the tessellations, pruned to at most four well separated
//! candidates and refined on the implicit conic equations.

use tracing::{debug, trace};

use crate::geometry::{Arc, Circle, Curve, Ellipse, Shape};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::newton::{solve_ellipse_ellipse_intersection, Conic};
use crate::math::{angle_of, Point2, Vector2, EPSILON};

use super::{dedup_points, push_unique};

/// Two distinct conics meet in at most this many points.
const MAX_CONIC_CROSSINGS: usize = 4;

/// Circle-circle intersection. Concentric circles report nothing.
#[must_use]
pub fn circle_circle(a: &Circle, b: &Circle) -> Vec<Point2> {
    circle_points(a.center(), a.radius(), b.center(), b.radius())
}

/// Circle-arc intersection: the circle-circle points on the arc.
#[must_use]
pub fn circle_arc(circle: &Circle, arc: &Arc) -> Vec<Point2> {
    circle_points(circle.center(), circle.radius(), arc.center(), arc.radius())
        .into_iter()
        .filter(|p| on_arc(arc, p))
        .collect()
}

/// Arc-arc intersection.
#[must_use]
pub fn arc_arc(a: &Arc, b: &Arc) -> Vec<Point2> {
    circle_points(a.center(), a.radius(), b.center(), b.radius())
        .into_iter()
        .filter(|p| on_arc(a, p) && on_arc(b, p))
        .collect()
}

fn on_arc(arc: &Arc, p: &Point2) -> bool {
    arc.contains_angle(angle_of(&(p - arc.center())))
}

fn circle_points(c0: &Point2, r0: f64, c1: &Point2, r1: f64) -> Vec<Point2> {
    let v: Vector2 = c1 - c0;
    let d = v.norm();
    if d < EPSILON {
        return Vec::new();
    }
    let outer = d - (r0 + r1);
    let inner = (r0 - r1).abs() - d;
    if outer > EPSILON || inner > EPSILON {
        return Vec::new();
    }
    let u = v / d;
    let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let base = c0 + u * a;
    if outer.abs() <= EPSILON || inner.abs() <= EPSILON {
        return vec![base];
    }
    let h = (r0 * r0 - a * a).max(0.0).sqrt();
    let n = Vector2::new(-u.y, u.x);
    vec![base + n * h, base - n * h]
}

/// Intersection of two conic shapes, at least one of them an ellipse.
///
/// Returns an empty list if either shape is not a circle, arc or ellipse.
#[must_use]
pub fn conic_conic(a: &Shape, b: &Shape) -> Vec<Point2> {
    let (Some(ca), Some(cb)) = (implicit_conic(a), implicit_conic(b)) else {
        return Vec::new();
    };
    let (Some(curve_a), Some(curve_b)) = (a.as_curve(), b.as_curve()) else {
        return Vec::new();
    };

    let candidates = farthest_subset(tessellated_crossings(curve_a, curve_b), MAX_CONIC_CROSSINGS);
    trace!(candidates = candidates.len(), "conic candidates");

    let mut out = Vec::new();
    for seed in candidates {
        let p = if let Some(p) = solve_ellipse_ellipse_intersection(&ca, &cb, &seed) {
            p
        } else {
            debug!(x = seed.x, y = seed.y, "conic refinement did not converge; keeping estimate");
            seed
        };
        if in_range(a, &p) && in_range(b, &p) {
            push_unique(&mut out, p);
        }
    }
    out
}

/// Ellipse-ellipse intersection.
#[must_use]
pub fn ellipse_ellipse(a: &Ellipse, b: &Ellipse) -> Vec<Point2> {
    conic_conic(&Shape::Ellipse(*a), &Shape::Ellipse(*b))
}

fn implicit_conic(shape: &Shape) -> Option<Conic> {
    match shape {
        Shape::Circle(c) => Some(Conic::circle(c.center(), c.radius())),
        Shape::Arc(a) => Some(Conic::circle(a.center(), a.radius())),
        Shape::Ellipse(e) => Some(Conic::ellipse(e.center(), e.rx(), e.ry(), e.angle())),
        _ => None,
    }
}

/// Returns `true` if a point of the underlying full conic lies on the
/// shape's arc range.
fn in_range(shape: &Shape, p: &Point2) -> bool {
    match shape {
        Shape::Arc(a) => on_arc(a, p),
        Shape::Ellipse(e) => e.contains_param(e.param_of_point(p)),
        _ => true,
    }
}

/// Pairwise crossings of two tessellations, deduplicated.
pub(crate) fn tessellated_crossings(a: &dyn Curve, b: &dyn Curve) -> Vec<Point2> {
    let (sa, sb) = (a.sampled(), b.sampled());
    let mut out = Vec::new();
    for w0 in sa.points.windows(2) {
        for w1 in sb.points.windows(2) {
            if w0[0] == w0[1] || w1[0] == w1[1] {
                continue;
            }
            if let Some((p, _, _)) = segment_segment_intersect_2d(&w0[0], &w0[1], &w1[0], &w1[1]) {
                push_unique(&mut out, p);
            }
        }
    }
    out
}

/// Keeps at most `count` points, greedily maximizing their separation:
/// the farthest pair first, then the point farthest from those chosen.
pub(crate) fn farthest_subset(points: Vec<Point2>, count: usize) -> Vec<Point2> {
    let points = dedup_points(points);
    if points.len() <= count {
        return points;
    }
    let mut pair = (0, 1, -1.0);
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let d = (points[i] - points[j]).norm();
            if d > pair.2 {
                pair = (i, j, d);
            }
        }
    }
    let mut chosen = vec![pair.0, pair.1];
    while chosen.len() < count {
        let next = (0..points.len())
            .filter(|i| !chosen.contains(i))
            .map(|i| {
                let gap = chosen
                    .iter()
                    .map(|&c| (points[i] - points[c]).norm())
                    .fold(f64::INFINITY, f64::min);
                (i, gap)
            })
            .max_by(|l, r| l.1.total_cmp(&r.1));
        match next {
            Some((i, _)) => chosen.push(i),
            None => break,
        }
    }
    chosen.into_iter().map(|i| points[i]).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn two_circles_cross_twice() {
        let a = Circle::new(p(0.0, 0.0), 5.0).unwrap();
        let b = Circle::new(p(8.0, 0.0), 5.0).unwrap();
        let r = circle_circle(&a, &b);
        assert_eq!(r.len(), 2);
        for q in &r {
            assert_abs_diff_eq!(q.x, 4.0, epsilon = 1e-12);
            assert_abs_diff_eq!(q.y.abs(), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn tangent_and_nested_circles() {
        let a = Circle::new(p(0.0, 0.0), 1.0).unwrap();
        assert_eq!(circle_circle(&a, &Circle::new(p(2.0, 0.0), 1.0).unwrap()), vec![p(1.0, 0.0)]);
        assert!(circle_circle(&a, &Circle::new(p(0.1, 0.0), 0.2).unwrap()).is_empty());
        assert!(circle_circle(&a, &Circle::new(p(0.0, 0.0), 2.0).unwrap()).is_empty());
    }

    #[test]
    fn arcs_filter_crossings() {
        let upper = Arc::from_center(p(0.0, 0.0), 5.0, 0.0, PI, true).unwrap();
        let c = Circle::new(p(8.0, 0.0), 5.0).unwrap();
        let r = circle_arc(&c, &upper);
        assert_eq!(r.len(), 1);
        assert_abs_diff_eq!(r[0].y, 3.0, epsilon = 1e-12);

        let lower = Arc::from_center(p(8.0, 0.0), 5.0, PI, 2.0 * PI, true).unwrap();
        assert!(arc_arc(&upper, &lower).is_empty());
    }

    #[test]
    fn ellipses_cross_four_times() {
        let a = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, 0.0).unwrap();
        let b = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, PI / 2.0).unwrap();
        let r = ellipse_ellipse(&a, &b);
        assert_eq!(r.len(), 4);
        let s = (16.0_f64 * 4.0 / 20.0).sqrt();
        for q in &r {
            assert_abs_diff_eq!(q.x.abs(), s, epsilon = 1e-8);
            assert_abs_diff_eq!(q.y.abs(), s, epsilon = 1e-8);
        }
    }

    #[test]
    fn circle_against_ellipse() {
        let c: Shape = Circle::new(p(0.0, 0.0), 3.0).unwrap().into();
        let e: Shape = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, 0.3).unwrap().into();
        let r = conic_conic(&c, &e);
        assert_eq!(r.len(), 4);
        for q in &r {
            assert_abs_diff_eq!(q.coords.norm(), 3.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn elliptical_arc_keeps_its_range() {
        let a: Shape = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, 0.0).unwrap().with_arc(0.0, PI).unwrap().into();
        let b: Shape = Ellipse::new(p(0.0, 0.0), 4.0, 2.0, PI / 2.0).unwrap().into();
        let r = conic_conic(&a, &b);
        assert_eq!(r.len(), 2);
        assert!(r.iter().all(|q| q.y > 0.0));
    }

    #[test]
    fn farthest_subset_prunes_duplicates() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1e-4), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(5.0, 5.0)];
        let kept = farthest_subset(pts, 4);
        assert_eq!(kept.len(), 4);
        assert!(kept.contains(&p(10.0, 10.0)));
        assert!(!kept.contains(&p(5.0, 5.0)));
    }
}
