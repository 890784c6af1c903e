//! Intersections between every pair of shape kinds.
//!
//! Specialised routines live in [`segment`], [`conic`] and [`curve`];
//! [`dispatch`] routes a pair of [`Shape`](crate::geometry::Shape)s to the
//! right one. [`noaabb`] exposes the same entry points without the
//! bounding-rect pre-filter for callers that have already culled.

pub mod conic;
pub mod curve;
pub mod dispatch;
pub mod noaabb;
pub mod segment;

pub use dispatch::{find_intersections, is_intersected, is_selected_by_rect};

use crate::math::Point2;

/// Result of a curve intersection with the parameters on both inputs.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionResult {
    /// The intersection point.
    pub point: Point2,
    /// Parameter on the first curve.
    pub t1: f64,
    /// Parameter on the second curve.
    pub t2: f64,
}

/// Tolerance under which two reported points are the same crossing.
pub(crate) const MERGE_TOLERANCE: f64 = 1e-8;

/// Appends `p` unless an equal point is already present.
pub(crate) fn push_unique(points: &mut Vec<Point2>, p: Point2) {
    if !points.iter().any(|q| (q - p).norm() < MERGE_TOLERANCE) {
        points.push(p);
    }
}

/// Removes near-duplicate points, keeping the first occurrence.
pub(crate) fn dedup_points(points: Vec<Point2>) -> Vec<Point2> {
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        push_unique(&mut out, p);
    }
    out
}
