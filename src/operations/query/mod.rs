//! Distance and containment queries.

pub mod contain;
pub mod distance;

pub use contain::{is_inside, is_inside_polygon, is_inside_rect, point_in_polygon};
pub use distance::{closest_on_ellipse, distance, is_on_shape, nearest_on_curve};

use crate::math::Point2;

/// Result of a closest-point query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPointResult {
    /// The closest point on the curve.
    pub point: Point2,
    /// The parameter value at the closest point.
    pub parameter: f64,
    /// The distance from the query point to the closest point.
    pub distance: f64,
}
