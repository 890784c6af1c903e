//! Curve numerical toolkit: closest, foot and tangency points, splitting.
//!
//! Closest, foot and tangency points share one search. A signed test
//! function of the curve parameter (the cosine or sine of the angle between
//! the tangent and the vector to the query point) is scanned for sign
//! changes, each bracket is bisected, and the root is kept only if the angle
//! condition actually holds there. Circles and arcs use closed forms.

pub mod closest;
pub mod foot;
pub mod split;
pub mod tangency;

pub use closest::{closest_point, closest_point_on_curve};
pub use foot::{foot_points, foot_points_on_curve};
pub use split::{split_bezier, split_bezier_at_point, split_bspline, split_polyline, split_shape};
pub use tangency::{tangency_points, tangency_points_on_curve};

use crate::geometry::Curve;
use crate::math::refine::{bisect_root, sign_change_brackets, ROOT_VERIFY_TOLERANCE};
use crate::math::{cross, Point2, Vector2, EPSILON};

use super::query::ClosestPointResult;

const MIN_SCAN_SAMPLES: usize = 64;
const SCAN_DENSITY: usize = 4;

/// Which angle condition a parameter search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AngleCondition {
    /// Tangent perpendicular to the vector to the query point.
    Perpendicular,
    /// Tangent parallel to the vector to the query point.
    Parallel,
}

impl AngleCondition {
    /// Signed test value: cosine for perpendicularity, sine for parallelism.
    fn value(self, tangent: &Vector2, to_point: &Vector2) -> f64 {
        let scale = tangent.norm() * to_point.norm();
        if scale < f64::MIN_POSITIVE {
            return 0.0;
        }
        match self {
            Self::Perpendicular => tangent.dot(to_point) / scale,
            Self::Parallel => cross(tangent, to_point) / scale,
        }
    }
}

/// Parameters of `curve` where `condition` holds with respect to `point`.
pub(crate) fn solve_angle_condition<C>(curve: &C, point: &Point2, condition: AngleCondition) -> Vec<ClosestPointResult>
where
    C: Curve + ?Sized,
{
    let test = |t: f64| condition.value(&curve.derivative(t), &(curve.evaluate(t) - point));
    let domain = curve.domain();
    let samples = (curve.sampled().len() * SCAN_DENSITY).max(MIN_SCAN_SAMPLES);

    let mut out: Vec<ClosestPointResult> = Vec::new();
    for (a, b) in sign_change_brackets(test, domain.t_min, domain.t_max, samples) {
        let t = if a == b { a } else { bisect_root(test, a, b) };
        let q = curve.evaluate(t);
        let distance = (q - point).norm();
        // Brackets straddling a jump of the test function are rejected here.
        let holds = distance < EPSILON || test(t).abs() < ROOT_VERIFY_TOLERANCE;
        if holds && !out.iter().any(|r| (r.point - q).norm() < EPSILON) {
            out.push(ClosestPointResult {
                point: q,
                parameter: t,
                distance,
            });
        }
    }
    out
}
