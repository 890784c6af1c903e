use std::collections::HashMap;

use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{Point2, EPSILON};
use crate::operations::query::contain::winding_number;

use super::split::MarkedPoint;

/// Classification of a ring fragment relative to the other ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FragmentClass {
    Inside,
    Outside,
    /// Runs along the other ring in the same direction.
    SameBoundary,
    /// Runs along the other ring in the opposite direction.
    OppositeBoundary,
}

/// Classifies the fragment `a -> b` against the open ring `other`.
///
/// Fragments never cross the other ring away from their ends, so the
/// midpoint decides. A midpoint on the other ring means the fragment
/// overlaps one of its edges.
pub(crate) fn classify_fragment(a: &Point2, b: &Point2, other: &[Point2]) -> FragmentClass {
    let mid = Point2::from((a.coords + b.coords) * 0.5);
    match winding_number(&mid, other) {
        Some(0) => FragmentClass::Outside,
        Some(_) => FragmentClass::Inside,
        None => {
            let n = other.len();
            let along = (0..n)
                .map(|i| (other[i], other[(i + 1) % n]))
                .find(|(e0, e1)| point_to_segment_dist(&mid, e0, e1) < EPSILON)
                .map_or(0.0, |(e0, e1)| (b - a).dot(&(e1 - e0)));
            if along > 0.0 {
                FragmentClass::SameBoundary
            } else {
                FragmentClass::OppositeBoundary
            }
        }
    }
}

/// Classes of every fragment of `ring` against `other`; fragment `k` runs
/// from point `k` to point `k + 1`, wrapping around.
pub(crate) fn classify_ring(ring: &[MarkedPoint], other: &[Point2]) -> Vec<FragmentClass> {
    let n = ring.len();
    (0..n)
        .map(|k| classify_fragment(&ring[k].point, &ring[(k + 1) % n].point, other))
        .collect()
}

/// Stores the winding delta at every point: `+1` where the ring enters the
/// other polygon, `-1` where it leaves, `0` where it stays on one side or
/// only touches.
pub(crate) fn assign_deltas(ring: &mut [MarkedPoint], classes: &[FragmentClass]) {
    let n = ring.len();
    let inside = |c: FragmentClass| i32::from(c == FragmentClass::Inside);
    for k in 0..n {
        ring[k].value = inside(classes[k]) - inside(classes[(k + n - 1) % n]);
    }
}

/// Clears contacts where the rings only touch.
///
/// A contact is a touch when the winding deltas of its points sum to zero on
/// each ring and no fragment around it runs along the other boundary. Touch
/// points inserted on an edge are removed; input vertices stay as plain
/// vertices. Fragments on both sides of a touch share one class, so merging
/// them keeps the `active` flag of the first. Returns the number of contacts
/// cleared.
pub(crate) fn collapse_touches(
    rings: [&mut Vec<MarkedPoint>; 2],
    classes: [&[FragmentClass]; 2],
) -> usize {
    let is_boundary = |c: FragmentClass| matches!(c, FragmentClass::SameBoundary | FragmentClass::OppositeBoundary);

    // node -> (delta sum per ring, any boundary fragment around it)
    let mut clusters: HashMap<usize, ([i32; 2], bool)> = HashMap::new();
    for (r, (ring, classes)) in rings.iter().zip(classes).enumerate() {
        let n = ring.len();
        for (k, m) in ring.iter().enumerate() {
            let Some(node) = m.node else { continue };
            let cluster = clusters.entry(node).or_default();
            cluster.0[r] += m.value;
            cluster.1 |= is_boundary(classes[k]) || is_boundary(classes[(k + n - 1) % n]);
        }
    }
    let touches: Vec<usize> = clusters
        .into_iter()
        .filter(|(_, (sums, boundary))| *sums == [0, 0] && !boundary)
        .map(|(node, _)| node)
        .collect();

    for ring in rings {
        ring.retain_mut(|m| match m.node {
            Some(node) if touches.contains(&node) => {
                m.node = None;
                m.original
            }
            _ => true,
        });
    }
    touches.len()
}
