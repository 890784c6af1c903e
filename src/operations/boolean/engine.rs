use tracing::{debug, trace};

use crate::geometry::{AabbRect, Polygon};
use crate::math::polygon_2d::{
    dedup_points, open_ring, remove_collinear, rotate_to_canonical_start, signed_area_2d,
};
use crate::math::{Point2, EPSILON};

use super::assemble::walk;
use super::classify::{assign_deltas, classify_ring, collapse_touches, FragmentClass};
use super::select::{BooleanOp, SweepPolicy};
use super::split::split_rings;

/// Executes a boolean operation on two simple polygons.
///
/// Returns `None` when the operation is not applicable: a degenerate
/// operand, an empty result, or a union or intersection of polygons that do
/// not overlap (touching at isolated points counts as not overlapping).
pub(crate) fn boolean_execute(p: &Polygon, q: &Polygon, op: BooleanOp) -> Option<Vec<Polygon>> {
    let Some(policy) = SweepPolicy::of(op) else {
        let mut out = sweep(p, q, SweepPolicy::DIFFERENCE).unwrap_or_default();
        out.extend(sweep(q, p, SweepPolicy::DIFFERENCE).unwrap_or_default());
        return (!out.is_empty()).then_some(out);
    };
    sweep(p, q, policy)
}

fn sweep(p: &Polygon, q: &Polygon, policy: SweepPolicy) -> Option<Vec<Polygon>> {
    // Step 1: Normalize orientation, Q clockwise for a difference
    let p_ring = normalized(p.points(), false)?;
    let q_ring = normalized(q.points(), policy.reverse_q)?;

    // Step 2: AABB early-out. Only a difference survives disjoint operands
    let p_rect = AabbRect::from_points(&p_ring);
    if !p_rect.inflated(EPSILON).is_intersected(&AabbRect::from_points(&q_ring)) {
        return if policy.reverse_q { finish(vec![p_ring]) } else { None };
    }

    // Step 3: Split both rings at their contacts
    let marked = split_rings(&p_ring, &q_ring);
    let (mut mp, mut mq) = (marked.p, marked.q);

    // Step 4: Classify fragments and derive winding deltas
    let p_classes = classify_ring(&mp, &q_ring);
    let q_classes = classify_ring(&mq, &p_ring);
    assign_deltas(&mut mp, &p_classes);
    assign_deltas(&mut mq, &q_classes);

    let overlapping =
        p_classes.iter().any(|&c| c != FragmentClass::Outside) || q_classes.contains(&FragmentClass::Inside);
    if !overlapping && !policy.reverse_q {
        trace!(contacts = marked.contacts, "operands do not overlap");
        return None;
    }

    // Step 5: Select the fragments bounding the result
    for (m, &c) in mp.iter_mut().zip(&p_classes) {
        m.active = policy.keeps_p(c);
    }
    for (m, &c) in mq.iter_mut().zip(&q_classes) {
        m.active = policy.keeps_q(c);
    }

    // Step 6: Drop contacts where the rings only touch
    let touches = collapse_touches([&mut mp, &mut mq], [p_classes.as_slice(), q_classes.as_slice()]);
    debug!(
        contacts = marked.contacts,
        touches,
        crossings = mp.iter().filter(|m| m.value != 0).count(),
        "boolean sweep"
    );

    // Step 7: Walk the kept fragments into rings
    finish(walk(&mut [mp, mq], policy.start_delta()))
}

/// Open, deduplicated ring without collinear vertices, wound clockwise when
/// `cw` is set. `None` for rings without area.
fn normalized(points: &[Point2], cw: bool) -> Option<Vec<Point2>> {
    let mut ring = remove_collinear(&open_ring(&dedup_points(points)));
    let area = signed_area_2d(&ring);
    if ring.len() < 3 || area.abs() < EPSILON {
        return None;
    }
    if (area < 0.0) != cw {
        ring.reverse();
    }
    Some(ring)
}

/// Cleans the walked rings and drops those without area.
fn finish(rings: Vec<Vec<Point2>>) -> Option<Vec<Polygon>> {
    let out: Vec<Polygon> = rings
        .into_iter()
        .filter_map(|ring| {
            let ring = remove_collinear(&open_ring(&dedup_points(&ring)));
            (ring.len() >= 3 && signed_area_2d(&ring).abs() >= EPSILON)
                .then(|| Polygon::new(rotate_to_canonical_start(&ring)))
        })
        .collect();
    (!out.is_empty()).then_some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(vec![p(x, y), p(x + size, y), p(x + size, y + size), p(x, y + size)])
    }

    fn total_area(polygons: &[Polygon]) -> f64 {
        polygons.iter().map(Polygon::signed_area).sum()
    }

    #[test]
    fn degenerate_operand_is_rejected() {
        let flat = Polygon::new(vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0)]);
        assert!(boolean_execute(&flat, &square(0.0, 0.0, 10.0), BooleanOp::Union).is_none());
        assert!(boolean_execute(&square(0.0, 0.0, 10.0), &flat, BooleanOp::Difference).is_none());
    }

    #[test]
    fn orientation_of_inputs_does_not_matter() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0).oriented(true);
        let r = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(r.len(), 1);
        assert_abs_diff_eq!(r[0].area(), 175.0, epsilon = 1e-9);
        assert!(!r[0].is_cw());
    }

    #[test]
    fn touching_at_a_corner_is_disjoint() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 10.0, 10.0);
        assert!(boolean_execute(&a, &b, BooleanOp::Union).is_none());
        assert!(boolean_execute(&a, &b, BooleanOp::Intersection).is_none());
        let d = boolean_execute(&a, &b, BooleanOp::Difference).unwrap();
        assert_eq!(d, vec![a]);
    }

    #[test]
    fn identical_polygons() {
        let a = square(0.0, 0.0, 10.0);
        let u = boolean_execute(&a, &a, BooleanOp::Union).unwrap();
        assert_eq!(u, vec![a.clone()]);
        assert_eq!(boolean_execute(&a, &a, BooleanOp::Intersection).unwrap(), vec![a.clone()]);
        assert!(boolean_execute(&a, &a, BooleanOp::Difference).is_none());
        assert!(boolean_execute(&a, &a, BooleanOp::Xor).is_none());
    }

    #[test]
    fn xor_of_nested_squares_is_a_frame() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(3.0, 3.0, 4.0);
        let r = boolean_execute(&outer, &inner, BooleanOp::Xor).unwrap();
        assert_eq!(r.len(), 2);
        assert_abs_diff_eq!(total_area(&r), 84.0, epsilon = 1e-9);
    }

    #[test]
    fn touch_away_from_the_overlap_is_not_a_switch() {
        // Q overlaps the top right of P and rests on P's corner (10, 0).
        let a = square(0.0, 0.0, 10.0);
        let b = Polygon::new(vec![
            p(8.0, 8.0),
            p(12.0, 8.0),
            p(12.0, -3.0),
            p(6.0, -3.0),
            p(10.0, 0.0),
            p(11.0, 1.0),
            p(11.0, 7.0),
        ]);
        let overlap = 2.0 / 3.0;
        let inter = boolean_execute(&a, &b, BooleanOp::Intersection).unwrap();
        assert_abs_diff_eq!(total_area(&inter), overlap, epsilon = 1e-9);

        // The union pinches at the touch point and stays one ring.
        let union = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert_eq!(union[0].points().iter().filter(|&&q| q == p(10.0, 0.0)).count(), 2);
        assert_abs_diff_eq!(total_area(&union), a.area() + b.area() - overlap, epsilon = 1e-9);
    }
}
