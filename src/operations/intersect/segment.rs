//! Segment against segment, circle, arc and ellipse.
//!
//! Every routine takes an `infinite` flag that treats the segment as the
//! whole supporting line. Results are ordered along the segment.

use crate::geometry::{Arc, Circle, Ellipse, Line};
use crate::math::distance_2d::point_to_line_dist;
use crate::math::{angle_of, Point2, Vector2, EPSILON, SEGMENT_TOLERANCE};

use super::push_unique;

/// Segment-segment intersection.
///
/// Crossings are solved from the implicit line coefficients. Parallel
/// segments report the middle of their overlap when they are collinear and
/// overlapping. Bounded segments accept a point within
/// [`SEGMENT_TOLERANCE`] of both segments' boxes.
#[must_use]
pub fn segment_segment(a: &Line, b: &Line, infinite: bool) -> Option<Point2> {
    debug_assert!(!a.is_empty() && !b.is_empty(), "degenerate segment");
    let (a0, a1, b0, b1) = (a.front, a.back, b.front, b.back);

    let (ka, kb) = (a1.y - a0.y, a0.x - a1.x);
    let kc = ka * a0.x + kb * a0.y;
    let (la, lb) = (b1.y - b0.y, b0.x - b1.x);
    let lc = la * b0.x + lb * b0.y;
    let det = ka * lb - la * kb;

    if det.abs() <= EPSILON * a.length() * b.length() {
        return collinear_overlap(a, b, infinite);
    }

    let p = Point2::new((lb * kc - kb * lc) / det, (ka * lc - la * kc) / det);
    if infinite || (within_box(&p, &a0, &a1) && within_box(&p, &b0, &b1)) {
        Some(p)
    } else {
        None
    }
}

/// Overlap of parallel segments, detected without division: the segments
/// overlap when the longest span between their endpoints does not exceed
/// the sum of their lengths. The reported point is the mean of the two
/// inner endpoints.
fn collinear_overlap(a: &Line, b: &Line, infinite: bool) -> Option<Point2> {
    if point_to_line_dist(&b.front, &a.front, &a.back) >= EPSILON
        || point_to_line_dist(&b.back, &a.front, &a.back) >= EPSILON
    {
        return None;
    }
    let pts = [a.front, a.back, b.front, b.back];
    let mut span = (0.0, 0, 1);
    for i in 0..4 {
        for j in i + 1..4 {
            let d = (pts[i] - pts[j]).norm();
            if d > span.0 {
                span = (d, i, j);
            }
        }
    }
    if !infinite && span.0 > a.length() + b.length() + SEGMENT_TOLERANCE {
        return None;
    }
    let mut inner = (0..4).filter(|&k| k != span.1 && k != span.2).map(|k| pts[k]);
    let (p, q) = (inner.next()?, inner.next()?);
    Some(Point2::from((p.coords + q.coords) * 0.5))
}

fn within_box(p: &Point2, a: &Point2, b: &Point2) -> bool {
    p.x >= a.x.min(b.x) - SEGMENT_TOLERANCE
        && p.x <= a.x.max(b.x) + SEGMENT_TOLERANCE
        && p.y >= a.y.min(b.y) - SEGMENT_TOLERANCE
        && p.y <= a.y.max(b.y) + SEGMENT_TOLERANCE
}

/// Segment-circle intersection: zero, one (tangent) or two points.
#[must_use]
pub fn segment_circle(seg: &Line, circle: &Circle, infinite: bool) -> Vec<Point2> {
    line_circle(seg, circle.center(), circle.radius(), infinite)
}

/// Segment-arc intersection: the circle points that fall on the arc.
#[must_use]
pub fn segment_arc(seg: &Line, arc: &Arc, infinite: bool) -> Vec<Point2> {
    let center = arc.center();
    line_circle(seg, center, arc.radius(), infinite)
        .into_iter()
        .filter(|p| arc.contains_angle(angle_of(&(p - center))))
        .collect()
}

/// Foot of the perpendicular plus the Pythagorean offset along the segment.
pub(crate) fn line_circle(seg: &Line, center: &Point2, radius: f64, infinite: bool) -> Vec<Point2> {
    debug_assert!(!seg.is_empty(), "degenerate segment");
    let d = seg.vector();
    let len = d.norm();
    let u = d / len;
    let foot = seg.front + u * (center - seg.front).dot(&u);
    let h = (center - foot).norm();
    let candidates = if (h - radius).abs() <= EPSILON {
        vec![foot]
    } else if h > radius {
        Vec::new()
    } else {
        let off = (radius * radius - h * h).sqrt();
        vec![foot - u * off, foot + u * off]
    };
    bound_to_segment(seg, candidates, infinite)
}

/// Segment-ellipse intersection solved in the ellipse's local frame.
///
/// Elliptical arcs keep only the points inside their parameter range.
#[must_use]
pub fn segment_ellipse(seg: &Line, ellipse: &Ellipse, infinite: bool) -> Vec<Point2> {
    debug_assert!(!seg.is_empty(), "degenerate segment");
    let (rx, ry) = (ellipse.rx(), ellipse.ry());
    // Scale the local frame so the ellipse becomes the unit circle.
    let to_unit = |p: &Point2| {
        let l = ellipse.to_local(p);
        Point2::new(l.x / rx, l.y / ry)
    };
    let from_unit = |p: &Point2| ellipse.from_local(&Point2::new(p.x * rx, p.y * ry));

    let (p0, p1) = (to_unit(&seg.front), to_unit(&seg.back));
    let d: Vector2 = p1 - p0;
    let len = d.norm();
    let u = d / len;
    let foot = p0 + u * (-p0.coords).dot(&u);
    let h = foot.coords.norm();
    let tolerance = EPSILON / rx.min(ry);
    let local = if (h - 1.0).abs() <= tolerance {
        vec![foot]
    } else if h > 1.0 {
        Vec::new()
    } else {
        let off = (1.0 - h * h).sqrt();
        vec![foot - u * off, foot + u * off]
    };

    let candidates = local.iter().map(from_unit).collect();
    bound_to_segment(seg, candidates, infinite)
        .into_iter()
        .filter(|p| !ellipse.is_arc() || ellipse.contains_param(ellipse.param_of_point(p)))
        .collect()
}

/// Snaps candidates within `EPSILON` of a segment end onto it, then drops
/// those outside the bounded segment.
fn bound_to_segment(seg: &Line, candidates: Vec<Point2>, infinite: bool) -> Vec<Point2> {
    let d = seg.vector();
    let len_sq = d.norm_squared();
    let mut out = Vec::with_capacity(candidates.len());
    for p in candidates {
        let p = if (p - seg.front).norm() < EPSILON {
            seg.front
        } else if (p - seg.back).norm() < EPSILON {
            seg.back
        } else {
            p
        };
        let s = (p - seg.front).dot(&d) / len_sq;
        if infinite || p == seg.front || p == seg.back || (0.0..=1.0).contains(&s) {
            push_unique(&mut out, p);
        }
    }
    out
}

/// Segment against every edge of an open or closed point chain. Zero-length
/// edges are skipped.
#[must_use]
pub fn segment_chain(seg: &Line, points: &[Point2], infinite: bool) -> Vec<Point2> {
    let mut out = Vec::new();
    for w in points.windows(2) {
        if w[0] == w[1] {
            continue;
        }
        if let Some(p) = segment_segment(seg, &Line::new(w[0], w[1]), infinite) {
            push_unique(&mut out, p);
        }
    }
    out
}
