use std::borrow::Cow;
use std::cell::OnceCell;

use crate::error::{GeometryError, Result};
use crate::geometry::AabbRect;
use crate::math::refine::{bisect_root, sign_change_brackets};
use crate::math::{lerp, Point2, Vector2};
use crate::tessellation::{sample_adaptive_into, Sampled, TessellationParams};

use super::{Curve, CurveDomain};

const EXTREMA_SAMPLES: usize = 32;

/// A chain of Bézier pieces of a common order.
///
/// Control points are stored flat; piece `i` uses
/// `points[i * order ..= i * order + order]`, so consecutive pieces share an
/// endpoint. The global parameter `u` runs over `[0, piece_count]`; its
/// integer part selects the piece and the fraction is the local parameter.
#[derive(Debug, Clone)]
pub struct Bezier {
    order: usize,
    points: Vec<Point2>,
    cache: OnceCell<Sampled>,
}

impl PartialEq for Bezier {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.points == other.points
    }
}

impl Bezier {
    /// Creates a Bézier chain of the given order (degree).
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is zero or the number of control points
    /// is not `order * pieces + 1` for some `pieces >= 1`.
    pub fn new(order: usize, points: Vec<Point2>) -> Result<Self> {
        if order == 0 {
            return Err(GeometryError::Degenerate("bezier order must be at least 1".into()).into());
        }
        let n = points.len();
        if n < order + 1 || (n - 1) % order != 0 {
            return Err(GeometryError::ControlPointCount {
                expected: format!("{order} * k + 1"),
                actual: n,
            }
            .into());
        }
        Ok(Self {
            order,
            points,
            cache: OnceCell::new(),
        })
    }

    /// Degree of every piece.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    #[must_use]
    pub fn control_points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        (self.points.len() - 1) / self.order
    }

    /// Control points of piece `i`.
    #[must_use]
    pub fn piece(&self, i: usize) -> &[Point2] {
        let start = i.min(self.piece_count() - 1) * self.order;
        &self.points[start..=start + self.order]
    }

    /// Splits a global parameter into `(piece index, local parameter)`.
    #[must_use]
    pub fn locate(&self, u: f64) -> (usize, f64) {
        let count = self.piece_count();
        #[allow(clippy::cast_precision_loss)]
        let u = u.clamp(0.0, count as f64);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let piece = (u.floor() as usize).min(count - 1);
        #[allow(clippy::cast_precision_loss)]
        (piece, u - piece as f64)
    }

    /// The chain traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            order: self.order,
            points,
            cache: OnceCell::new(),
        }
    }

    /// Approximate length from the tessellation.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.sampled().points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// Evaluates a single Bézier piece with de Casteljau's algorithm.
#[must_use]
pub fn eval_piece(ctrl: &[Point2], t: f64) -> Point2 {
    let mut tmp = ctrl.to_vec();
    let n = tmp.len();
    for round in 1..n {
        for i in 0..n - round {
            tmp[i] = lerp(&tmp[i], &tmp[i + 1], t);
        }
    }
    tmp.first().copied().unwrap_or_else(Point2::origin)
}

/// Derivative of a single Bézier piece from its hodograph.
#[must_use]
pub fn derivative_piece(ctrl: &[Point2], t: f64) -> Vector2 {
    let degree = ctrl.len().saturating_sub(1);
    if degree == 0 {
        return Vector2::zeros();
    }
    let mut tmp: Vec<Vector2> = ctrl.windows(2).map(|w| w[1] - w[0]).collect();
    let n = tmp.len();
    for round in 1..n {
        for i in 0..n - round {
            tmp[i] = tmp[i] * (1.0 - t) + tmp[i + 1] * t;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let scale = degree as f64;
    tmp[0] * scale
}

/// Splits one Bézier piece at `t`, returning the left and right control
/// polygons. Both share the split point.
#[must_use]
pub fn de_casteljau(ctrl: &[Point2], t: f64) -> (Vec<Point2>, Vec<Point2>) {
    let n = ctrl.len();
    let mut tmp = ctrl.to_vec();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    if let Some(first) = tmp.first() {
        left.push(*first);
    }
    if let Some(last) = tmp.last() {
        right.push(*last);
    }
    for round in 1..n {
        for i in 0..n - round {
            tmp[i] = lerp(&tmp[i], &tmp[i + 1], t);
        }
        left.push(tmp[0]);
        right.push(tmp[n - round - 1]);
    }
    right.reverse();
    (left, right)
}

impl Curve for Bezier {
    fn evaluate(&self, t: f64) -> Point2 {
        let (piece, local) = self.locate(t);
        eval_piece(self.piece(piece), local)
    }

    fn derivative(&self, t: f64) -> Vector2 {
        let (piece, local) = self.locate(t);
        derivative_piece(self.piece(piece), local)
    }

    fn domain(&self) -> CurveDomain {
        #[allow(clippy::cast_precision_loss)]
        CurveDomain::new(0.0, self.piece_count() as f64)
    }

    fn is_closed(&self) -> bool {
        self.points.first() == self.points.last()
    }

    fn bounding_rect(&self) -> AabbRect {
        let mut rect = AabbRect::from_corners(&self.front(), &self.back());
        for i in 0..self.piece_count() {
            let ctrl = self.piece(i);
            rect = rect.expanded(&ctrl[0]).expanded(&ctrl[self.order]);
            let dx = |t: f64| derivative_piece(ctrl, t).x;
            let dy = |t: f64| derivative_piece(ctrl, t).y;
            for (a, b) in sign_change_brackets(dx, 0.0, 1.0, EXTREMA_SAMPLES) {
                rect = rect.expanded(&eval_piece(ctrl, bisect_root(dx, a, b)));
            }
            for (a, b) in sign_change_brackets(dy, 0.0, 1.0, EXTREMA_SAMPLES) {
                rect = rect.expanded(&eval_piece(ctrl, bisect_root(dy, a, b)));
            }
        }
        rect
    }

    /// Control hull of each piece `[i, i + 1]`.
    fn pieces(&self) -> Vec<(f64, f64, AabbRect)> {
        (0..self.piece_count())
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t0 = i as f64;
                (t0, t0 + 1.0, AabbRect::from_points(self.piece(i)))
            })
            .collect()
    }

    fn sampled(&self) -> Cow<'_, Sampled> {
        Cow::Borrowed(self.cache.get_or_init(|| {
            let params = TessellationParams::default();
            let mut out = Sampled::default();
            for i in 0..self.piece_count() {
                #[allow(clippy::cast_precision_loss)]
                let t0 = i as f64;
                sample_adaptive_into(self, t0, t0 + 1.0, &params, &mut out);
            }
            out
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cubic() -> Bezier {
        Bezier::new(
            3,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 1.0),
                Point2::new(1.0, 1.0),
                Point2::new(1.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn evaluate_endpoints_and_middle() {
        let b = cubic();
        assert_eq!(b.evaluate(0.0), Point2::new(0.0, 0.0));
        assert_eq!(b.evaluate(1.0), Point2::new(1.0, 0.0));
        let m = b.evaluate(0.5);
        assert_abs_diff_eq!(m.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m.y, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn chain_shares_endpoints() {
        let b = Bezier::new(
            2,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(2.0, 0.0),
                Point2::new(3.0, -1.0),
                Point2::new(4.0, 0.0),
            ],
        )
        .unwrap();
        assert_eq!(b.piece_count(), 2);
        assert_eq!(b.evaluate(1.0), Point2::new(2.0, 0.0));
        assert_eq!(b.locate(1.25), (1, 0.25));
        assert_eq!(b.locate(2.0), (1, 1.0));
    }

    #[test]
    fn invalid_control_count() {
        assert!(Bezier::new(3, vec![Point2::origin(); 5]).is_err());
        assert!(Bezier::new(0, vec![Point2::origin(); 2]).is_err());
    }

    #[test]
    fn de_casteljau_halves_meet() {
        let b = cubic();
        let (l, r) = de_casteljau(b.piece(0), 0.3);
        let p = b.evaluate(0.3);
        assert_abs_diff_eq!((l[3] - p).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!((r[0] - p).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!((eval_piece(&r, 0.5) - b.evaluate(0.65)).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let b = cubic();
        let h = 1e-6;
        let fd = (b.evaluate(0.4 + h) - b.evaluate(0.4 - h)) / (2.0 * h);
        let d = b.derivative(0.4);
        assert_abs_diff_eq!(d.x, fd.x, epsilon = 1e-6);
        assert_abs_diff_eq!(d.y, fd.y, epsilon = 1e-6);
    }

    #[test]
    fn tight_bounding_rect() {
        let r = cubic().bounding_rect();
        assert_abs_diff_eq!(r.top, 0.75, epsilon = 1e-10);
        assert_abs_diff_eq!(r.left, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.right, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cached_samples_cover_domain() {
        let b = cubic();
        let s = b.sampled();
        assert_eq!(s.params.first().copied(), Some(0.0));
        assert_eq!(s.params.last().copied(), Some(1.0));
    }
}
