//! Entry points without the bounding-rect pre-filter.
//!
//! For callers that have already culled their candidates. Results match the
//! filtered versions exactly.

use crate::geometry::{AabbRect, Shape};
use crate::math::Point2;
use crate::operations::query::contain::is_inside_unculled;

use super::dispatch::Router;

/// [`find_intersections`](super::find_intersections) without culling.
#[must_use]
pub fn find_intersections(a: &Shape, b: &Shape) -> Vec<Point2> {
    Router::UNCULLED.find(a, b)
}

/// [`is_intersected`](super::is_intersected) without culling.
#[must_use]
pub fn is_intersected(a: &Shape, b: &Shape) -> bool {
    !Router::UNCULLED.find(a, b).is_empty()
}

/// [`is_selected_by_rect`](super::is_selected_by_rect) without culling.
#[must_use]
pub fn is_selected_by_rect(shape: &Shape, rect: &AabbRect) -> bool {
    Router::UNCULLED.selected_by_rect(shape, rect)
}

/// [`is_inside`](crate::operations::query::is_inside) without culling.
#[must_use]
pub fn is_inside(point: &Point2, shape: &Shape, coincide: bool) -> bool {
    !shape.is_empty() && is_inside_unculled(point, shape, coincide)
}
