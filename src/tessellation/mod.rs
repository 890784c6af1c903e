//! Piecewise-linear approximation of curves.
//!
//! Every curve exposes a tessellated [`Sampled`] form that coarse intersection,
//! distance and containment queries start from before refining on the exact
//! curve.

use crate::geometry::Curve;
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::simplify::down_sampling;
use crate::math::Point2;

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum number of segments for curves.
    pub max_segments: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 8,
            max_segments: 512,
        }
    }
}

impl TessellationParams {
    /// Number of segments needed to keep the sagitta of a circular sweep of
    /// `radius` within tolerance.
    #[must_use]
    pub fn segments_for_sweep(&self, radius: f64, sweep: f64) -> usize {
        let sweep = sweep.abs();
        if radius <= self.tolerance || sweep == 0.0 {
            return self.min_segments.max(1);
        }
        let step = 2.0 * (1.0 - self.tolerance / radius).clamp(-1.0, 1.0).acos();
        let count = if step > 0.0 { (sweep / step).ceil() } else { f64::INFINITY };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count.min(1e9) as usize;
        count.clamp(self.min_segments.max(1), self.max_segments.max(1))
    }
}

/// Sample points of a curve together with the parameter of each point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sampled {
    pub points: Vec<Point2>,
    pub params: Vec<f64>,
}

impl Sampled {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over consecutive sample pairs as
    /// `(start point, end point, start param, end param)`.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2, f64, f64)> + '_ {
        self.points
            .windows(2)
            .zip(self.params.windows(2))
            .map(|(p, t)| (p[0], p[1], t[0], t[1]))
    }

    /// Douglas–Peucker reduced copy keeping the matching parameters.
    #[must_use]
    pub fn down_sampled(&self, tolerance: f64) -> Self {
        let keep = down_sampling(&self.points, tolerance);
        Self {
            points: keep.iter().map(|&i| self.points[i]).collect(),
            params: keep.iter().map(|&i| self.params[i]).collect(),
        }
    }

    /// Parameter of the sample nearest to `p`, with its index.
    #[must_use]
    pub fn nearest_sample(&self, p: &Point2) -> Option<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, q)| (i, (q - p).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| (i, self.params[i]))
    }
}

/// Evenly spaced samples of `curve` over the parameter range `[t0, t1]`.
pub fn sample_uniform<C: Curve + ?Sized>(curve: &C, t0: f64, t1: f64, segments: usize) -> Sampled {
    let segments = segments.max(1);
    let mut out = Sampled::default();
    for i in 0..=segments {
        #[allow(clippy::cast_precision_loss)]
        let t = t0 + (t1 - t0) * i as f64 / segments as f64;
        out.points.push(curve.evaluate(t));
        out.params.push(t);
    }
    out
}

/// Adaptive samples of `curve` over `[t0, t1]`, appended to `out`.
///
/// The range starts as `min_segments` even spans. A span is halved while its
/// midpoint or quarter points stray more than `tolerance` from its chord,
/// until `max_segments` spans exist. The start point is only pushed when
/// `out` is empty.
pub fn sample_adaptive_into<C: Curve + ?Sized>(
    curve: &C,
    t0: f64,
    t1: f64,
    params: &TessellationParams,
    out: &mut Sampled,
) {
    let initial = params.min_segments.max(1);
    let mut budget = params.max_segments.max(initial).saturating_sub(initial);
    if out.is_empty() {
        out.points.push(curve.evaluate(t0));
        out.params.push(t0);
    }
    for i in 0..initial {
        #[allow(clippy::cast_precision_loss)]
        let a = t0 + (t1 - t0) * i as f64 / initial as f64;
        #[allow(clippy::cast_precision_loss)]
        let b = t0 + (t1 - t0) * (i + 1) as f64 / initial as f64;
        // Depth-first so points come out in parameter order.
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            let pa = curve.evaluate(a);
            let pb = curve.evaluate(b);
            let flat = [0.25, 0.5, 0.75].iter().all(|&f| {
                let q = curve.evaluate(a + (b - a) * f);
                point_to_segment_dist(&q, &pa, &pb) <= params.tolerance
            });
            if flat || budget == 0 {
                out.points.push(pb);
                out.params.push(b);
            } else {
                budget -= 1;
                let m = 0.5 * (a + b);
                stack.push((m, b));
                stack.push((a, m));
            }
        }
    }
}

/// Adaptive samples of `curve` over its whole domain.
pub fn sample_adaptive<C: Curve + ?Sized>(curve: &C, params: &TessellationParams) -> Sampled {
    let domain = curve.domain();
    let mut out = Sampled::default();
    sample_adaptive_into(curve, domain.t_min, domain.t_max, params, &mut out);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Circle;

    #[test]
    fn sweep_segments_respect_bounds() {
        let params = TessellationParams::default();
        let n = params.segments_for_sweep(5.0, std::f64::consts::TAU);
        assert!(n >= params.min_segments && n <= params.max_segments);
        assert_eq!(params.segments_for_sweep(1e-6, 1.0), params.min_segments);
    }

    #[test]
    fn adaptive_samples_stay_within_tolerance() {
        let circle = Circle::new(Point2::new(0.0, 0.0), 10.0).unwrap();
        let params = TessellationParams::default();
        let s = sample_adaptive(&circle, &params);
        assert!(s.len() > params.min_segments);
        for (a, b, ta, tb) in s.segments() {
            let mid = circle.evaluate(0.5 * (ta + tb));
            assert!(point_to_segment_dist(&mid, &a, &b) <= params.tolerance + 1e-12);
        }
        assert!(s.params.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn nearest_sample_picks_closest() {
        let circle = Circle::new(Point2::new(0.0, 0.0), 1.0).unwrap();
        let s = sample_uniform(&circle, 0.0, std::f64::consts::TAU, 4);
        let (i, _) = s.nearest_sample(&Point2::new(0.0, 2.0)).unwrap_or((99, 0.0));
        assert_eq!(i, 1);
    }
}
