//! Bézier and B-spline intersections.
//!
//! Curves are tessellated, crossings are located on the polyline and then
//! refined on the true curve. Curve endpoints are always tested directly so
//! that tangential touches at the ends are never lost to the tessellation.

use tracing::{debug, trace};

use crate::geometry::{Curve, Line};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::newton::solve_curve_intersection;
use crate::math::refine::minimize;
use crate::math::{cross, Point2, EPSILON};
use crate::tessellation::TessellationParams;

use super::{IntersectionResult, MERGE_TOLERANCE};

/// Largest residual distance accepted for a refined crossing.
const HIT_TOLERANCE: f64 = 1e-8;

/// Segment-curve intersection.
///
/// `t1` is the parameter along the segment in `[0, 1]` (unbounded when
/// `infinite`), `t2` the curve parameter.
#[must_use]
pub fn segment_curve<C: Curve + ?Sized>(seg: &Line, curve: &C, infinite: bool) -> Vec<IntersectionResult> {
    debug_assert!(!seg.is_empty(), "degenerate segment");
    let d = seg.vector();
    let len = d.norm();
    let len_sq = len * len;
    let seg_param = |p: &Point2| (p - seg.front).dot(&d) / len_sq;
    let signed = |t: f64| cross(&d, &(curve.evaluate(t) - seg.front)) / len;
    let on_segment = |s: f64| infinite || (-EPSILON / len..=1.0 + EPSILON / len).contains(&s);

    let mut out: Vec<IntersectionResult> = Vec::new();
    let domain = curve.domain();
    for t in [domain.t_min, domain.t_max] {
        let p = curve.evaluate(t);
        if signed(t).abs() < EPSILON && on_segment(seg_param(&p)) {
            push_result(&mut out, IntersectionResult { point: p, t1: seg_param(&p), t2: t });
        }
    }

    // Only pieces whose hull meets the segment are scanned.
    let seg_rect = seg.bounding_rect().inflated(EPSILON);
    let pieces: Vec<(f64, f64)> = curve
        .pieces()
        .into_iter()
        .filter(|(_, _, hull)| infinite || hull.is_intersected(&seg_rect))
        .map(|(t0, t1, _)| (t0, t1))
        .collect();
    if pieces.is_empty() {
        return out;
    }
    let scanned = |t0: f64, t1: f64| pieces.iter().any(|&(lo, hi)| t0 < hi && t1 > lo);

    let sampled = curve.sampled();
    let values: Vec<f64> = sampled.points.iter().map(|p| cross(&d, &(p - seg.front)) / len).collect();
    let tolerance = TessellationParams::default().tolerance;
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        if !scanned(sampled.params[i], sampled.params[i + 1]) {
            continue;
        }
        let (v0, v1) = (values[i], values[i + 1]);
        let crossing = v0 != 0.0 && v1 != 0.0 && v0.signum() != v1.signum();
        // A sample close to the line that is a local minimum of the distance
        // may hide a tangential touch.
        let dip = v0.abs() < tolerance
            && (i == 0 || v0.abs() <= values[i - 1].abs())
            && v0.abs() <= v1.abs();
        if !crossing && !dip && v1 != 0.0 {
            continue;
        }
        let (t0, t1) = (sampled.params[i], sampled.params[i + 1]);
        let (lo, hi, seed) = if crossing {
            (t0, t1, t0 + (t1 - t0) * v0 / (v0 - v1))
        } else if v1 == 0.0 {
            (t1, t1, t1)
        } else {
            (sampled.params[i.saturating_sub(1)], t1, t0)
        };
        let r = minimize(|t| signed(t).abs(), lo, hi, seed, 0.5 * (hi - lo));
        if r.value >= HIT_TOLERANCE {
            continue;
        }
        let p = curve.evaluate(r.t);
        let s = seg_param(&p);
        if on_segment(s) {
            push_result(&mut out, IntersectionResult { point: p, t1: s, t2: r.t });
        }
    }
    trace!(count = out.len(), "segment-curve intersections");
    out
}

/// Curve-curve intersection.
///
/// Crossings of the two tessellations seed a joint Newton solve on both
/// parameters. Shared endpoints are always reported.
#[must_use]
pub fn curve_curve<A, B>(a: &A, b: &B) -> Vec<IntersectionResult>
where
    A: Curve + ?Sized,
    B: Curve + ?Sized,
{
    let mut out = Vec::new();
    let (da, db) = (a.domain(), b.domain());
    for ta in [da.t_min, da.t_max] {
        for tb in [db.t_min, db.t_max] {
            let (pa, pb) = (a.evaluate(ta), b.evaluate(tb));
            if pa == pb {
                push_result(&mut out, IntersectionResult { point: pa, t1: ta, t2: tb });
            }
        }
    }

    if !a.bounding_rect().inflated(EPSILON).is_intersected(&b.bounding_rect()) {
        return out;
    }

    let (sa, sb) = (a.sampled(), b.sampled());
    for (p0, p1, ta0, ta1) in sa.segments() {
        if p0 == p1 {
            continue;
        }
        for (q0, q1, tb0, tb1) in sb.segments() {
            if q0 == q1 {
                continue;
            }
            let Some((approx, s, u)) = segment_segment_intersect_2d(&p0, &p1, &q0, &q1) else {
                continue;
            };
            let seed = (ta0 + s * (ta1 - ta0), tb0 + u * (tb1 - tb0));
            let solved = solve_curve_intersection(
                |t| (a.evaluate(t), a.derivative(t)),
                (da.t_min, da.t_max),
                |t| (b.evaluate(t), b.derivative(t)),
                (db.t_min, db.t_max),
                seed,
            );
            let result = if let Some((t1, t2)) = solved {
                IntersectionResult { point: a.evaluate(t1), t1, t2 }
            } else {
                debug!(x = approx.x, y = approx.y, "curve newton did not converge; keeping estimate");
                IntersectionResult { point: approx, t1: seed.0, t2: seed.1 }
            };
            push_result(&mut out, result);
        }
    }
    trace!(count = out.len(), "curve-curve intersections");
    out
}

fn push_result(out: &mut Vec<IntersectionResult>, r: IntersectionResult) {
    if !out.iter().any(|q| (q.point - r.point).norm() < MERGE_TOLERANCE) {
        out.push(r);
    }
}

/// Points of [`segment_curve`] without parameters.
#[must_use]
pub fn segment_curve_points<C: Curve + ?Sized>(seg: &Line, curve: &C, infinite: bool) -> Vec<Point2> {
    segment_curve(seg, curve, infinite).into_iter().map(|r| r.point).collect()
}

/// Points of [`curve_curve`] without parameters.
#[must_use]
pub fn curve_curve_points<A, B>(a: &A, b: &B) -> Vec<Point2>
where
    A: Curve + ?Sized,
    B: Curve + ?Sized,
{
    curve_curve(a, b).into_iter().map(|r| r.point).collect()
}
