//! Scalar parameter refinement shared by every curve routine.
//!
//! Two engines live here:
//!
//! - [`minimize`] finds the parameter minimizing a distance functional. A
//!   coarse halving walk locates the right basin, then a fine bracket search
//!   on scaled values narrows it down. The fine pass stops on a plateau of
//!   equal values and widens the bracket when its midpoints fall into a
//!   two-cycle.
//! - [`sign_change_brackets`] plus [`bisect_root`] locate zeros of a signed
//!   test function (tangent angle, perpendicularity).

use tracing::trace;

/// Convergence threshold of the coarse phase, in parameter and value.
pub const COARSE_TOLERANCE: f64 = 1e-4;

/// Values are multiplied by this factor during the fine phase so that ties
/// are compared at a resolution well above the rounding noise.
pub const FINE_SCALE: f64 = 1e9;

/// Smallest step the coarse phase takes.
pub const PARAM_STEP_MIN: f64 = 1e-12;

/// Bracket width at which the fine phase stops.
pub const BRACKET_MIN: f64 = 1e-15;

/// Bracket width at which root bisection stops.
pub const ROOT_BRACKET_MIN: f64 = 1e-14;

/// Angle tolerance used to verify a bisected root.
pub const ROOT_VERIFY_TOLERANCE: f64 = 1e-4;

/// Number of consecutive equal midpoint values that ends the fine phase.
pub const PLATEAU_LIMIT: usize = 10;

const HISTORY_LEN: usize = 4;
const MAX_EXPANSIONS: usize = 8;
const MAX_ITERATIONS: usize = 4096;
const MAX_BISECTIONS: usize = 256;

/// Result of [`minimize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    /// Parameter of the best value found.
    pub t: f64,
    /// Unscaled functional value at `t`.
    pub value: f64,
}

/// Minimizes `f` over `[lo, hi]` starting from `start` with an initial
/// coarse step of `step`.
///
/// Always terminates and returns its best estimate.
pub fn minimize<F>(f: F, lo: f64, hi: f64, start: f64, step: f64) -> Refinement
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut t = start.clamp(lo, hi);
    let mut best = f(t);
    let mut step = step.abs().min(hi - lo).max(PARAM_STEP_MIN);
    let mut iterations = 0;

    // Coarse phase.
    let mut min_dis = [best, f64::INFINITY];
    while iterations < MAX_ITERATIONS && step > PARAM_STEP_MIN {
        iterations += 1;
        let tl = (t - step).max(lo);
        let tr = (t + step).min(hi);
        let (dl, dr) = (f(tl), f(tr));
        if dl < best && dl <= dr {
            t = tl;
            best = dl;
        } else if dr < best {
            t = tr;
            best = dr;
        } else {
            step *= 0.5;
        }
        min_dis = [best, min_dis[0]];
        if step < COARSE_TOLERANCE && (min_dis[1] - min_dis[0]).abs() < COARSE_TOLERANCE {
            break;
        }
    }

    // Fine phase.
    let g = |x: f64| f(x) * FINE_SCALE;
    let mut left = (t - 2.0 * step).max(lo);
    let mut right = (t + 2.0 * step).min(hi);
    let mut best_t = t;
    let mut best_scaled = best * FINE_SCALE;
    let mut history = [f64::NAN; HISTORY_LEN];
    let mut previous = f64::NAN;
    let mut equal_count = 0;
    let mut expansions = 0;
    while iterations < MAX_ITERATIONS && right - left > BRACKET_MIN {
        iterations += 1;
        let mid = 0.5 * (left + right);
        let q1 = 0.5 * (left + mid);
        let q3 = 0.5 * (mid + right);
        let (v1, vm, v3) = (g(q1), g(mid), g(q3));
        for (x, v) in [(q1, v1), (mid, vm), (q3, v3)] {
            if v < best_scaled {
                best_scaled = v;
                best_t = x;
            }
        }

        if v1 < vm && v1 <= v3 {
            right = mid;
        } else if v3 < vm && v3 < v1 {
            left = mid;
        } else {
            // Midpoint is lowest or the samples tie: shrink symmetrically.
            left = q1;
            right = q3;
        }

        if vm == previous {
            equal_count += 1;
            if equal_count >= PLATEAU_LIMIT {
                trace!(t = best_t, "refinement stopped on plateau");
                break;
            }
        } else {
            equal_count = 0;
        }
        previous = vm;

        history.rotate_left(1);
        history[HISTORY_LEN - 1] = mid;
        if history[0] == history[2] && history[1] == history[3] && history[0] != history[1] {
            if expansions >= MAX_EXPANSIONS {
                break;
            }
            let width = right - left;
            left = (left - width).max(lo);
            right = (right + width).min(hi);
            expansions += 1;
            history = [f64::NAN; HISTORY_LEN];
        }
    }

    Refinement {
        t: best_t,
        value: f(best_t),
    }
}

/// Samples `f` at `samples + 1` evenly spaced parameters and returns every
/// interval whose endpoint values differ in sign. Exact zeros are returned
/// as degenerate `(t, t)` brackets.
pub fn sign_change_brackets<F>(f: F, lo: f64, hi: f64, samples: usize) -> Vec<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let samples = samples.max(1);
    #[allow(clippy::cast_precision_loss)]
    let param = |i: usize| lo + (hi - lo) * i as f64 / samples as f64;
    let mut brackets = Vec::new();
    let mut t0 = param(0);
    let mut v0 = f(t0);
    if v0 == 0.0 {
        brackets.push((t0, t0));
    }
    for i in 1..=samples {
        let t1 = param(i);
        let v1 = f(t1);
        if v1 == 0.0 {
            brackets.push((t1, t1));
        } else if v0 != 0.0 && v0.signum() != v1.signum() {
            brackets.push((t0, t1));
        }
        t0 = t1;
        v0 = v1;
    }
    brackets
}

/// Bisects a sign-change bracket of `f` until it is narrower than
/// [`ROOT_BRACKET_MIN`] or an exact zero is hit.
pub fn bisect_root<F>(f: F, a: f64, b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = if a <= b { (a, b) } else { (b, a) };
    let mut fa = f(a);
    if fa == 0.0 {
        return a;
    }
    if f(b) == 0.0 {
        return b;
    }
    for _ in 0..MAX_BISECTIONS {
        if b - a < ROOT_BRACKET_MIN {
            break;
        }
        let m = 0.5 * (a + b);
        let fm = f(m);
        if fm == 0.0 {
            return m;
        }
        if fa.signum() == fm.signum() {
            a = m;
            fa = fm;
        } else {
            b = m;
        }
    }
    0.5 * (a + b)
}
