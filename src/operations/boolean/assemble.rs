use std::collections::HashMap;
use std::f64::consts::TAU;

use tracing::debug;

use crate::math::{angle_of, Point2, Vector2, EPSILON};

use super::split::MarkedPoint;

/// `(ring, index)` of a marked point; fragment `(r, k)` starts there.
type Position = (usize, usize);

/// Chains the active fragments of both rings into closed output rings.
///
/// Walks start at a contact of the first ring whose winding delta is
/// `start_delta`, then at any remaining active fragment. A walk follows its ring until it reaches a contact, where it may switch
/// to the other ring. Where several active fragments leave a contact, the
/// one turning most clockwise from the incoming edge is taken, so outputs
/// touching themselves at a point come apart into separate rings. Every
/// fragment is walked at most once; a walk that runs into a dead end is
/// dropped.
pub(crate) fn walk(rings: &mut [Vec<MarkedPoint>; 2], start_delta: i32) -> Vec<Vec<Point2>> {
    let mut starts: HashMap<usize, Vec<Position>> = HashMap::new();
    for (r, ring) in rings.iter().enumerate() {
        for (k, m) in ring.iter().enumerate() {
            if let Some(node) = m.node {
                starts.entry(node).or_default().push((r, k));
            }
        }
    }

    let budget = rings[0].len() + rings[1].len() + 1;
    let mut out = Vec::new();
    while let Some(start) = first_start(rings, start_delta) {
        let origin = rings[start.0][start.1];
        let mut ring = vec![origin.point];
        let mut current = start;
        let mut closed = false;
        for _ in 0..budget {
            rings[current.0][current.1].active = false;
            let end = successor(rings, current);
            let here = rings[end.0][end.1];
            if end == start || (here.node.is_some() && here.node == origin.node) {
                closed = true;
                break;
            }
            ring.push(here.point);
            let incoming = here.point - rings[current.0][current.1].point;
            match next_fragment(rings, &starts, end, &incoming) {
                Some(next) => current = next,
                None => break,
            }
        }
        if closed {
            out.push(ring);
        } else {
            debug!(points = ring.len(), "boolean walk dropped an open chain");
        }
    }
    out
}

fn successor(rings: &[Vec<MarkedPoint>; 2], (r, k): Position) -> Position {
    (r, (k + 1) % rings[r].len())
}

fn first_start(rings: &[Vec<MarkedPoint>; 2], start_delta: i32) -> Option<Position> {
    rings[0]
        .iter()
        .position(|m| m.active && m.node.is_some() && m.value == start_delta)
        .map(|k| (0, k))
        .or_else(|| {
            rings
                .iter()
                .enumerate()
                .find_map(|(r, ring)| ring.iter().position(|m| m.active).map(|k| (r, k)))
        })
}

fn next_fragment(
    rings: &[Vec<MarkedPoint>; 2],
    starts: &HashMap<usize, Vec<Position>>,
    at: Position,
    incoming: &Vector2,
) -> Option<Position> {
    let here = rings[at.0][at.1];
    let Some(node) = here.node else {
        return here.active.then_some(at);
    };
    let back = angle_of(&(-incoming));
    starts
        .get(&node)?
        .iter()
        .copied()
        .filter(|&(r, k)| rings[r][k].active)
        .map(|pos| {
            let (r, k) = successor(rings, pos);
            let turn = (back - angle_of(&(rings[r][k].point - here.point))).rem_euclid(TAU);
            // Doubling back along the incoming edge is the last resort.
            (pos, if turn < EPSILON { TAU } else { turn })
        })
        .min_by(|l, r| l.1.total_cmp(&r.1))
        .map(|(pos, _)| pos)
}
