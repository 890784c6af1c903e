//! Newton solvers for two-equation systems.

use tracing::trace;

use super::{Matrix2, Point2, Vector2};

const MAX_NEWTON_ITERATIONS: usize = 64;
const STEP_TOLERANCE: f64 = 1e-15;
const CONIC_RESIDUAL_TOLERANCE: f64 = 1e-8;
const CURVE_RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Implicit conic `a x² + b xy + c y² + d x + e y + f = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Conic {
    /// Conic of a circle.
    #[must_use]
    pub fn circle(center: &Point2, radius: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: -2.0 * center.x,
            e: -2.0 * center.y,
            f: center.x * center.x + center.y * center.y - radius * radius,
        }
        .normalized()
    }

    /// Conic of an ellipse with semi-axes `rx`, `ry` whose major axis is
    /// rotated by `angle`.
    #[must_use]
    pub fn ellipse(center: &Point2, rx: f64, ry: f64, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let (ia, ib) = (1.0 / (rx * rx), 1.0 / (ry * ry));
        let a = c * c * ia + s * s * ib;
        let b = 2.0 * c * s * (ia - ib);
        let cc = s * s * ia + c * c * ib;
        let (cx, cy) = (center.x, center.y);
        Self {
            a,
            b,
            c: cc,
            d: -2.0 * a * cx - b * cy,
            e: -b * cx - 2.0 * cc * cy,
            f: a * cx * cx + b * cx * cy + cc * cy * cy - 1.0,
        }
        .normalized()
    }

    /// Scales the coefficients so the largest quadratic term is 1.
    #[must_use]
    pub fn normalized(self) -> Self {
        let s = self.a.abs().max(self.b.abs()).max(self.c.abs());
        if s == 0.0 {
            return self;
        }
        Self {
            a: self.a / s,
            b: self.b / s,
            c: self.c / s,
            d: self.d / s,
            e: self.e / s,
            f: self.f / s,
        }
    }

    /// Evaluates the conic polynomial.
    #[must_use]
    pub fn eval(&self, p: &Point2) -> f64 {
        let (x, y) = (p.x, p.y);
        self.a * x * x + self.b * x * y + self.c * y * y + self.d * x + self.e * y + self.f
    }

    /// Gradient of the conic polynomial.
    #[must_use]
    pub fn gradient(&self, p: &Point2) -> Vector2 {
        let (x, y) = (p.x, p.y);
        Vector2::new(
            2.0 * self.a * x + self.b * y + self.d,
            self.b * x + 2.0 * self.c * y + self.e,
        )
    }
}

/// Refines an approximate common point of two conics.
///
/// Returns `None` if the iteration does not settle onto both curves.
#[must_use]
pub fn solve_ellipse_ellipse_intersection(c0: &Conic, c1: &Conic, seed: &Point2) -> Option<Point2> {
    let mut p = *seed;
    let scale = 1.0 + seed.coords.norm();
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let residual = Vector2::new(c0.eval(&p), c1.eval(&p));
        let (g0, g1) = (c0.gradient(&p), c1.gradient(&p));
        let jacobian = Matrix2::new(g0.x, g0.y, g1.x, g1.y);
        let Some(inverse) = jacobian.try_inverse() else {
            trace!(x = p.x, y = p.y, "conic newton hit a singular jacobian");
            break;
        };
        let delta = inverse * residual;
        p -= delta;
        if delta.norm() < STEP_TOLERANCE * scale {
            break;
        }
    }
    let tolerance = CONIC_RESIDUAL_TOLERANCE * scale;
    (c0.eval(&p).abs() < tolerance && c1.eval(&p).abs() < tolerance).then_some(p)
}

/// Jointly refines the parameters of two parametric curves at a crossing.
///
/// `eval0`/`eval1` return `(point, derivative)` at a parameter. Parameters
/// are clamped to `domain0` and `domain1`. Returns `None` if the residual
/// does not vanish.
#[must_use]
pub fn solve_curve_intersection<F0, F1>(
    eval0: F0,
    domain0: (f64, f64),
    eval1: F1,
    domain1: (f64, f64),
    seed: (f64, f64),
) -> Option<(f64, f64)>
where
    F0: Fn(f64) -> (Point2, Vector2),
    F1: Fn(f64) -> (Point2, Vector2),
{
    let (mut t0, mut t1) = seed;
    let mut scale = 1.0;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let (p0, d0) = eval0(t0);
        let (p1, d1) = eval1(t1);
        scale = 1.0 + p0.coords.norm();
        let residual = p0 - p1;
        let jacobian = Matrix2::new(d0.x, -d1.x, d0.y, -d1.y);
        let Some(inverse) = jacobian.try_inverse() else {
            trace!(t0, t1, "curve newton hit a singular jacobian");
            break;
        };
        let delta = inverse * residual;
        let n0 = (t0 - delta.x).clamp(domain0.0, domain0.1);
        let n1 = (t1 - delta.y).clamp(domain1.0, domain1.1);
        let moved = (n0 - t0).abs() + (n1 - t1).abs();
        t0 = n0;
        t1 = n1;
        if moved < STEP_TOLERANCE {
            break;
        }
    }
    let (p0, _) = eval0(t0);
    let (p1, _) = eval1(t1);
    ((p0 - p1).norm() < CURVE_RESIDUAL_TOLERANCE * scale).then_some((t0, t1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn circle_conic_contains_its_points() {
        let c = Conic::circle(&Point2::new(1.0, 2.0), 3.0);
        assert_abs_diff_eq!(c.eval(&Point2::new(4.0, 2.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotated_ellipse_conic() {
        let angle = 0.6_f64;
        let center = Point2::new(-1.0, 0.5);
        let c = Conic::ellipse(&center, 4.0, 2.0, angle);
        let (s, co) = angle.sin_cos();
        let on_minor = center + Vector2::new(-s, co) * 2.0;
        let on_major = center + Vector2::new(co, s) * 4.0;
        assert_abs_diff_eq!(c.eval(&on_minor), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.eval(&on_major), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn two_circles_refine_to_exact_point() {
        let a = Conic::circle(&Point2::new(0.0, 0.0), 5.0);
        let b = Conic::circle(&Point2::new(8.0, 0.0), 5.0);
        let p = solve_ellipse_ellipse_intersection(&a, &b, &Point2::new(3.9, 3.1)).unwrap();
        assert_abs_diff_eq!(p.x, 4.0, epsilon = 1e-10);
        assert_abs_diff_eq!(p.y, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn disjoint_circles_reject() {
        let a = Conic::circle(&Point2::new(0.0, 0.0), 1.0);
        let b = Conic::circle(&Point2::new(5.0, 0.0), 1.0);
        assert!(solve_ellipse_ellipse_intersection(&a, &b, &Point2::new(2.5, 0.1)).is_none());
    }

    #[test]
    fn lines_as_curves() {
        let l0 = |t: f64| (Point2::new(t, 0.0), Vector2::new(1.0, 0.0));
        let l1 = |t: f64| (Point2::new(0.5, t - 0.5), Vector2::new(0.0, 1.0));
        let (t0, t1) = solve_curve_intersection(l0, (0.0, 1.0), l1, (0.0, 1.0), (0.2, 0.9)).unwrap();
        assert_abs_diff_eq!(t0, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(t1, 0.5, epsilon = 1e-12);
    }
}
