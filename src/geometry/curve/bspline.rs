use std::borrow::Cow;
use std::cell::OnceCell;

use nalgebra::{DMatrix, DVector};

use crate::error::{GeometryError, Result};
use crate::geometry::AabbRect;
use crate::math::refine::{bisect_root, sign_change_brackets};
use crate::math::{lerp, Point2, Vector2, EPSILON};
use crate::tessellation::{sample_adaptive_into, Sampled, TessellationParams};

use super::{Curve, CurveDomain};

const EXTREMA_SAMPLES_PER_SPAN: usize = 16;

/// Degree of a [`BSpline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplineKind {
    Quadratic,
    Cubic,
}

impl SplineKind {
    #[must_use]
    pub fn degree(self) -> usize {
        match self {
            Self::Quadratic => 2,
            Self::Cubic => 3,
        }
    }
}

/// A clamped B-spline of fixed degree.
///
/// The knot vector is clamped (the first and last `degree + 1` knots are
/// equal) and normalized so the domain is `[0, 1]`. `path_points` are the
/// user-authored waypoints the spline was interpolated through, if any.
#[derive(Debug, Clone)]
pub struct BSpline {
    kind: SplineKind,
    control_points: Vec<Point2>,
    knots: Vec<f64>,
    path_points: Vec<Point2>,
    cache: OnceCell<Sampled>,
}

impl PartialEq for BSpline {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.control_points == other.control_points && self.knots == other.knots
    }
}

impl BSpline {
    /// Creates a spline from control points and a clamped knot vector. The
    /// knots are rescaled to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few control points, the knot count
    /// is not `control_points + degree + 1`, or the knots are decreasing,
    /// unclamped or span an empty range.
    pub fn new(kind: SplineKind, control_points: Vec<Point2>, knots: Vec<f64>) -> Result<Self> {
        let p = kind.degree();
        let n = control_points.len();
        if n < p + 1 {
            return Err(GeometryError::ControlPointCount {
                expected: format!("at least {}", p + 1),
                actual: n,
            }
            .into());
        }
        if knots.len() != n + p + 1 {
            return Err(GeometryError::InvalidKnots(format!(
                "expected {} knots, got {}",
                n + p + 1,
                knots.len()
            ))
            .into());
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(GeometryError::InvalidKnots("knots must be non-decreasing".into()).into());
        }
        let (lo, hi) = (knots[p], knots[n]);
        let clamped = knots[..=p].iter().all(|&k| k == lo) && knots[n..].iter().all(|&k| k == hi);
        if !clamped {
            return Err(GeometryError::InvalidKnots("knot vector must be clamped".into()).into());
        }
        if hi - lo < EPSILON {
            return Err(GeometryError::InvalidKnots("knot vector spans an empty range".into()).into());
        }
        let knots = knots.iter().map(|k| (k - lo) / (hi - lo)).collect();
        Ok(Self {
            kind,
            control_points,
            knots,
            path_points: Vec::new(),
            cache: OnceCell::new(),
        })
    }

    /// Creates a spline with a clamped uniform knot vector.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few control points.
    pub fn with_uniform_knots(kind: SplineKind, control_points: Vec<Point2>) -> Result<Self> {
        let p = kind.degree();
        let n = control_points.len();
        if n < p + 1 {
            return Err(GeometryError::ControlPointCount {
                expected: format!("at least {}", p + 1),
                actual: n,
            }
            .into());
        }
        let interior = n - p - 1;
        let mut knots = vec![0.0; p + 1];
        #[allow(clippy::cast_precision_loss)]
        knots.extend((1..=interior).map(|i| i as f64 / (interior + 1) as f64));
        knots.extend(std::iter::repeat_n(1.0, p + 1));
        Self::new(kind, control_points, knots)
    }

    /// Global interpolation through `path_points` with chord-length
    /// parameters and averaged knots. The points are kept as the spline's
    /// path points.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than `degree + 1` points or the
    /// interpolation system is singular (repeated consecutive points).
    pub fn interpolate(kind: SplineKind, path_points: Vec<Point2>) -> Result<Self> {
        let p = kind.degree();
        let count = path_points.len();
        if count < p + 1 {
            return Err(GeometryError::ControlPointCount {
                expected: format!("at least {} path points", p + 1),
                actual: count,
            }
            .into());
        }
        let n = count - 1;
        let chords: Vec<f64> = path_points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let total: f64 = chords.iter().sum();
        if total < EPSILON {
            return Err(GeometryError::Degenerate("path points coincide".into()).into());
        }
        let mut params = Vec::with_capacity(count);
        params.push(0.0);
        let mut acc = 0.0;
        for c in &chords {
            acc += c / total;
            params.push(acc);
        }
        params[n] = 1.0;

        let mut knots = vec![0.0; p + 1];
        for j in 1..=n - p {
            #[allow(clippy::cast_precision_loss)]
            let avg = params[j..j + p].iter().sum::<f64>() / p as f64;
            knots.push(avg);
        }
        knots.extend(std::iter::repeat_n(1.0, p + 1));

        let mut system = DMatrix::<f64>::zeros(count, count);
        for (k, &u) in params.iter().enumerate() {
            let span = find_span(n, p, u, &knots);
            let basis = basis_functions(span, u, p, &knots);
            for (j, b) in basis.iter().enumerate() {
                system[(k, span - p + j)] = *b;
            }
        }
        let lu = system.lu();
        let bx = DVector::from_iterator(count, path_points.iter().map(|q| q.x));
        let by = DVector::from_iterator(count, path_points.iter().map(|q| q.y));
        let (Some(xs), Some(ys)) = (lu.solve(&bx), lu.solve(&by)) else {
            return Err(GeometryError::Degenerate("interpolation system is singular".into()).into());
        };
        let control_points = xs.iter().zip(ys.iter()).map(|(&x, &y)| Point2::new(x, y)).collect();
        let mut spline = Self::new(kind, control_points, knots)?;
        spline.path_points = path_points;
        Ok(spline)
    }

    #[must_use]
    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.kind.degree()
    }

    #[must_use]
    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    /// Normalized knot vector.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// User-authored waypoints, empty if the spline was built from control
    /// points directly.
    #[must_use]
    pub fn path_points(&self) -> &[Point2] {
        &self.path_points
    }

    /// Replaces the stored waypoints.
    pub fn set_path_points(&mut self, path_points: Vec<Point2>) {
        self.path_points = path_points;
    }

    /// Number of non-empty knot spans.
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.knots.windows(2).filter(|w| w[1] > w[0]).count()
    }

    /// Number of times `t` occurs in the knot vector.
    #[must_use]
    pub fn multiplicity(&self, t: f64) -> usize {
        self.knots.iter().filter(|&&k| (k - t).abs() < 1e-14).count()
    }

    /// Inserts the knot `t` once (Boehm's algorithm) without changing the
    /// curve.
    #[must_use]
    pub fn insert_knot(&self, t: f64) -> Self {
        let p = self.degree();
        let n = self.control_points.len() - 1;
        let k = find_span(n, p, t, &self.knots);
        let ctrl = &self.control_points;
        let mut inserted = Vec::with_capacity(ctrl.len() + 1);
        for i in 0..=n + 1 {
            let q = if i + p <= k {
                ctrl[i]
            } else if i > k {
                ctrl[i - 1]
            } else {
                let denom = self.knots[i + p] - self.knots[i];
                let a = if denom.abs() < f64::MIN_POSITIVE {
                    0.0
                } else {
                    (t - self.knots[i]) / denom
                };
                lerp(&ctrl[i - 1], &ctrl[i], a)
            };
            inserted.push(q);
        }
        let mut knots = self.knots.clone();
        knots.insert(k + 1, t);
        Self {
            kind: self.kind,
            control_points: inserted,
            knots,
            path_points: self.path_points.clone(),
            cache: OnceCell::new(),
        }
    }

    /// The spline traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut control_points = self.control_points.clone();
        control_points.reverse();
        let knots = self.knots.iter().rev().map(|k| 1.0 - k).collect();
        let mut path_points = self.path_points.clone();
        path_points.reverse();
        Self {
            kind: self.kind,
            control_points,
            knots,
            path_points,
            cache: OnceCell::new(),
        }
    }

    /// Approximate length from the tessellation.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.sampled().points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    fn derivative_control_points(&self) -> Vec<Point2> {
        let p = self.degree();
        #[allow(clippy::cast_precision_loss)]
        let pf = p as f64;
        self.control_points
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let denom = self.knots[i + p + 1] - self.knots[i + 1];
                if denom.abs() < f64::MIN_POSITIVE {
                    Point2::origin()
                } else {
                    Point2::from((w[1] - w[0]) * (pf / denom))
                }
            })
            .collect()
    }
}

/// Knot span index `k` with `knots[k] <= t < knots[k + 1]`, clamped to the
/// valid range `[p, n]`.
#[must_use]
pub fn find_span(n: usize, p: usize, t: f64, knots: &[f64]) -> usize {
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[p] {
        return p;
    }
    let (mut low, mut high) = (p, n + 1);
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Non-vanishing basis functions `N[span - p ..= span]` at `t`.
#[must_use]
pub fn basis_functions(span: usize, t: f64, p: usize, knots: &[f64]) -> Vec<f64> {
    let mut values = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    values[0] = 1.0;
    for j in 1..=p {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom.abs() < f64::MIN_POSITIVE { 0.0 } else { values[r] / denom };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }
    values
}

/// De Boor evaluation of a spline of degree `p`.
#[must_use]
pub fn de_boor(p: usize, knots: &[f64], ctrl: &[Point2], t: f64) -> Point2 {
    let n = ctrl.len() - 1;
    let k = find_span(n, p, t, knots);
    let mut d: Vec<Point2> = (0..=p).map(|j| ctrl[j + k - p]).collect();
    for r in 1..=p {
        for j in (r..=p).rev() {
            let i = j + k - p;
            let denom = knots[i + p + 1 - r] - knots[i];
            let alpha = if denom.abs() < f64::MIN_POSITIVE {
                0.0
            } else {
                (t - knots[i]) / denom
            };
            d[j] = lerp(&d[j - 1], &d[j], alpha);
        }
    }
    d[p]
}

impl Curve for BSpline {
    fn evaluate(&self, t: f64) -> Point2 {
        de_boor(self.degree(), &self.knots, &self.control_points, t.clamp(0.0, 1.0))
    }

    fn derivative(&self, t: f64) -> Vector2 {
        let ctrl = self.derivative_control_points();
        let knots = &self.knots[1..self.knots.len() - 1];
        de_boor(self.degree() - 1, knots, &ctrl, t.clamp(0.0, 1.0)).coords
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        self.control_points.first() == self.control_points.last()
    }

    fn bounding_rect(&self) -> AabbRect {
        let mut rect = AabbRect::from_corners(&self.front(), &self.back());
        let samples = EXTREMA_SAMPLES_PER_SPAN * self.span_count().max(1);
        let dx = |t: f64| self.derivative(t).x;
        let dy = |t: f64| self.derivative(t).y;
        for (a, b) in sign_change_brackets(dx, 0.0, 1.0, samples) {
            rect = rect.expanded(&self.evaluate(bisect_root(dx, a, b)));
        }
        for (a, b) in sign_change_brackets(dy, 0.0, 1.0, samples) {
            rect = rect.expanded(&self.evaluate(bisect_root(dy, a, b)));
        }
        rect
    }

    /// Knot spans with the hull of the `degree + 1` control points acting
    /// on each.
    fn pieces(&self) -> Vec<(f64, f64, AabbRect)> {
        let p = self.degree();
        (p..self.control_points.len())
            .filter(|&j| self.knots[j + 1] > self.knots[j])
            .map(|j| {
                let hull = AabbRect::from_points(&self.control_points[j - p..=j]);
                (self.knots[j], self.knots[j + 1], hull)
            })
            .collect()
    }

    fn sampled(&self) -> Cow<'_, Sampled> {
        Cow::Borrowed(self.cache.get_or_init(|| {
            let base = TessellationParams::default();
            let params = TessellationParams {
                min_segments: base.min_segments * self.span_count().max(1),
                max_segments: base.max_segments * self.span_count().max(1),
                ..base
            };
            let mut out = Sampled::default();
            sample_adaptive_into(self, 0.0, 1.0, &params, &mut out);
            out
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::bezier::eval_piece;
    use approx::assert_abs_diff_eq;

    fn ctrl() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
            Point2::new(6.0, 1.0),
        ]
    }

    #[test]
    fn single_span_matches_bezier() {
        let pts = ctrl()[..4].to_vec();
        let s = BSpline::new(SplineKind::Cubic, pts.clone(), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        for t in [0.0, 0.2, 0.5, 0.9, 1.0] {
            let d = s.evaluate(t) - eval_piece(&pts, t);
            assert!(d.norm() < 1e-12, "t={t}");
        }
    }

    #[test]
    fn knots_are_normalized() {
        let s = BSpline::new(
            SplineKind::Quadratic,
            ctrl()[..4].to_vec(),
            vec![2.0, 2.0, 2.0, 3.0, 4.0, 4.0, 4.0],
        )
        .unwrap();
        assert_eq!(s.knots(), &[0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_bad_knots() {
        let r = BSpline::new(SplineKind::Cubic, ctrl(), vec![0.0; 5]);
        assert!(r.is_err());
        let r = BSpline::new(SplineKind::Quadratic, ctrl()[..3].to_vec(), vec![0.0, 0.0, 0.5, 1.0, 1.0, 1.0]);
        assert!(r.is_err());
    }

    #[test]
    fn clamped_ends_interpolate() {
        let s = BSpline::with_uniform_knots(SplineKind::Cubic, ctrl()).unwrap();
        assert_eq!(s.evaluate(0.0), Point2::new(0.0, 0.0));
        assert!((s.evaluate(1.0) - Point2::new(6.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn knot_insertion_preserves_shape() {
        let s = BSpline::with_uniform_knots(SplineKind::Cubic, ctrl()).unwrap();
        let r = s.insert_knot(0.3);
        assert_eq!(r.control_points().len(), s.control_points().len() + 1);
        for t in [0.1, 0.3, 0.45, 0.8] {
            assert!((s.evaluate(t) - r.evaluate(t)).norm() < 1e-12, "t={t}");
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let s = BSpline::with_uniform_knots(SplineKind::Quadratic, ctrl()).unwrap();
        let h = 1e-6;
        let fd = (s.evaluate(0.6 + h) - s.evaluate(0.6 - h)) / (2.0 * h);
        let d = s.derivative(0.6);
        assert_abs_diff_eq!(d.x, fd.x, epsilon = 1e-5);
        assert_abs_diff_eq!(d.y, fd.y, epsilon = 1e-5);
    }

    #[test]
    fn interpolation_passes_through_points() {
        let pts = ctrl();
        let s = BSpline::interpolate(SplineKind::Cubic, pts.clone()).unwrap();
        assert_eq!(s.path_points().len(), pts.len());
        let chords: Vec<f64> = pts.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let total: f64 = chords.iter().sum();
        let mut u = 0.0;
        for (i, q) in pts.iter().enumerate() {
            if i > 0 {
                u += chords[i - 1] / total;
            }
            assert!((s.evaluate(u) - q).norm() < 1e-9, "i={i}");
        }
    }

    #[test]
    fn interpolation_rejects_coincident_points() {
        let pts = vec![Point2::new(1.0, 1.0); 4];
        assert!(BSpline::interpolate(SplineKind::Cubic, pts).is_err());
    }
}
