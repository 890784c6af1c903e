use crate::math::polygon_2d::{close_ring, open_ring, rotate_to_canonical_start, signed_area_2d};
use crate::math::Point2;

use super::{AabbRect, Line};

/// A simple polygon.
///
/// Points are stored closed: the last point repeats the first. Vertex
/// indices used by [`Polygon::vertex`], [`Polygon::next_point`] and
/// [`Polygon::last_point`] wrap around the open ring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Point2>,
}

impl From<Vec<Point2>> for Polygon {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

impl Polygon {
    /// Creates a polygon from a ring given open or closed.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points: close_ring(&points),
        }
    }

    /// Rectangle as a counter-clockwise polygon.
    #[must_use]
    pub fn from_rect(rect: &AabbRect) -> Self {
        Self::new(rect.corners().to_vec())
    }

    /// Closed point sequence (`front == back`).
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Vertices without the closing duplicate.
    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        let n = self.points.len();
        if n > 1 {
            &self.points[..n - 1]
        } else {
            &self.points
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Returns `true` if the polygon has fewer than three vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() < 3
    }

    /// Vertex `i`, wrapping around.
    ///
    /// # Panics
    ///
    /// Panics if the polygon has no points.
    #[must_use]
    pub fn vertex(&self, i: usize) -> Point2 {
        let v = self.vertices();
        v[i % v.len()]
    }

    /// Vertex after `i`, wrapping around.
    #[must_use]
    pub fn next_point(&self, i: usize) -> Point2 {
        self.vertex(i + 1)
    }

    /// Vertex before `i`, wrapping around.
    #[must_use]
    pub fn last_point(&self, i: usize) -> Point2 {
        let n = self.vertex_count();
        self.vertex(i % n + n - 1)
    }

    /// Edges in ring order, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// Positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(self.vertices())
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn is_cw(&self) -> bool {
        self.signed_area() < 0.0
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    #[must_use]
    pub fn bounding_rect(&self) -> AabbRect {
        AabbRect::from_points(&self.points)
    }

    /// Reverses the ring in place if needed so that it winds clockwise when
    /// `cw` is set and counter-clockwise otherwise.
    pub fn reorder_points(&mut self, cw: bool) {
        if self.is_cw() != cw && !self.is_empty() {
            self.points.reverse();
        }
    }

    /// Copy with the requested orientation.
    #[must_use]
    pub fn oriented(&self, cw: bool) -> Self {
        let mut p = self.clone();
        p.reorder_points(cw);
        p
    }

    /// Copy starting at the leftmost-bottommost vertex.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self::new(rotate_to_canonical_start(&open_ring(&self.points)))
    }
}
