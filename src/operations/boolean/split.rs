use crate::geometry::AabbRect;
use crate::math::distance_2d::closest_on_segment;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::Point2;

/// Contacts closer than this are one point.
pub(crate) const CONTACT_TOLERANCE: f64 = 1e-9;

/// A ring point in the boolean sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MarkedPoint {
    pub point: Point2,
    /// Winding delta against the other ring.
    pub value: i32,
    /// Input vertex rather than an inserted contact.
    pub original: bool,
    /// The fragment starting here is kept and not yet walked.
    pub active: bool,
    /// Contact shared with the other ring.
    pub node: Option<usize>,
}

impl MarkedPoint {
    pub(crate) fn vertex(point: Point2) -> Self {
        Self {
            point,
            value: 0,
            original: true,
            active: false,
            node: None,
        }
    }

    fn contact(point: Point2, node: usize) -> Self {
        Self {
            original: false,
            node: Some(node),
            ..Self::vertex(point)
        }
    }
}

/// Both rings with their mutual contacts inserted.
#[derive(Debug, Clone)]
pub(crate) struct MarkedRings {
    pub p: Vec<MarkedPoint>,
    pub q: Vec<MarkedPoint>,
    /// Number of distinct contact points.
    pub contacts: usize,
}

/// Splits two open rings at every point where they touch or cross.
///
/// Each contact is inserted into the edges of both rings it lies on, sorted
/// along the edge. Contacts on an input vertex mark that vertex instead.
/// Coincident contacts found from different edge pairs share one node.
pub(crate) fn split_rings(p: &[Point2], q: &[Point2]) -> MarkedRings {
    let mut nodes: Vec<Point2> = Vec::new();
    let mut p_hits: Vec<Vec<(f64, usize)>> = vec![Vec::new(); p.len()];
    let mut q_hits: Vec<Vec<(f64, usize)>> = vec![Vec::new(); q.len()];

    for i in 0..p.len() {
        let (a0, a1) = (p[i], p[(i + 1) % p.len()]);
        let rect = AabbRect::from_corners(&a0, &a1).inflated(CONTACT_TOLERANCE);
        for j in 0..q.len() {
            let (b0, b1) = (q[j], q[(j + 1) % q.len()]);
            if !rect.is_intersected(&AabbRect::from_corners(&b0, &b1)) {
                continue;
            }
            for (point, t, u) in segment_contacts(&a0, &a1, &b0, &b1) {
                let id = node_id(&mut nodes, point);
                p_hits[i].push((t, id));
                q_hits[j].push((u, id));
            }
        }
    }

    MarkedRings {
        p: mark(p, &p_hits, &nodes),
        q: mark(q, &q_hits, &nodes),
        contacts: nodes.len(),
    }
}

fn node_id(nodes: &mut Vec<Point2>, point: Point2) -> usize {
    if let Some(i) = nodes.iter().position(|n| (n - point).norm() < CONTACT_TOLERANCE) {
        return i;
    }
    nodes.push(point);
    nodes.len() - 1
}

/// Contacts of two segments as `(point, t, u)`. Endpoints lying on the other
/// segment come first so that they keep their exact coordinates; a proper
/// crossing follows. Overlapping collinear segments meet at the endpoints of
/// their overlap.
fn segment_contacts(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Vec<(Point2, f64, f64)> {
    let mut out: Vec<(Point2, f64, f64)> = Vec::new();
    let mut push = |point: Point2, t: f64, u: f64| {
        if !out.iter().any(|(q, _, _)| (q - point).norm() < CONTACT_TOLERANCE) {
            out.push((point, t, u));
        }
    };
    for (end, t) in [(a0, 0.0), (a1, 1.0)] {
        let (foot, u) = closest_on_segment(end, b0, b1);
        if (foot - end).norm() < CONTACT_TOLERANCE {
            push(*end, t, u);
        }
    }
    for (end, u) in [(b0, 0.0), (b1, 1.0)] {
        let (foot, t) = closest_on_segment(end, a0, a1);
        if (foot - end).norm() < CONTACT_TOLERANCE {
            push(*end, t, u);
        }
    }
    if let Some((point, t, u)) = segment_segment_intersect_2d(a0, a1, b0, b1) {
        push(point, t, u);
    }
    out
}

fn mark(ring: &[Point2], hits: &[Vec<(f64, usize)>], nodes: &[Point2]) -> Vec<MarkedPoint> {
    let n = ring.len();
    let near = |a: &Point2, b: &Point2| (a - b).norm() < CONTACT_TOLERANCE;
    let mut out = Vec::with_capacity(n + hits.iter().map(Vec::len).sum::<usize>());
    for (i, v) in ring.iter().enumerate() {
        out.push(MarkedPoint {
            node: nodes.iter().position(|c| near(c, v)),
            ..MarkedPoint::vertex(*v)
        });
        let next = ring[(i + 1) % n];
        let mut inner: Vec<(f64, usize)> = hits[i]
            .iter()
            .copied()
            .filter(|&(_, id)| !near(&nodes[id], v) && !near(&nodes[id], &next))
            .collect();
        inner.sort_by(|l, r| l.0.total_cmp(&r.0));
        inner.dedup_by_key(|h| h.1);
        out.extend(inner.into_iter().map(|(_, id)| MarkedPoint::contact(nodes[id], id)));
    }
    out
}
