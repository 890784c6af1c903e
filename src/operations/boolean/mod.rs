mod assemble;
mod classify;
mod engine;
mod select;
mod split;

pub use select::BooleanOp;

use crate::geometry::Polygon;

/// Applies `op` to two simple polygons.
#[must_use]
pub fn polygon_boolean(p: &Polygon, q: &Polygon, op: BooleanOp) -> Option<Vec<Polygon>> {
    engine::boolean_execute(p, q, op)
}

/// Union of two overlapping polygons. Disjoint polygons yield `None`.
#[must_use]
pub fn polygon_union(p: &Polygon, q: &Polygon) -> Option<Vec<Polygon>> {
    polygon_boolean(p, q, BooleanOp::Union)
}

/// Common area of two polygons, possibly several rings.
#[must_use]
pub fn polygon_intersection(p: &Polygon, q: &Polygon) -> Option<Vec<Polygon>> {
    polygon_boolean(p, q, BooleanOp::Intersection)
}

/// `p` minus `q`. When `q` lies strictly inside `p` the result is `p` plus a
/// clockwise hole ring.
#[must_use]
pub fn polygon_difference(p: &Polygon, q: &Polygon) -> Option<Vec<Polygon>> {
    polygon_boolean(p, q, BooleanOp::Difference)
}

/// Symmetric difference: `p - q` followed by `q - p`.
#[must_use]
pub fn polygon_xor(p: &Polygon, q: &Polygon) -> Option<Vec<Polygon>> {
    polygon_boolean(p, q, BooleanOp::Xor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(vec![p(x, y), p(x + size, y), p(x + size, y + size), p(x, y + size)])
    }

    fn area(result: Option<Vec<Polygon>>) -> f64 {
        result.map_or(0.0, |r| r.iter().map(Polygon::signed_area).sum())
    }

    fn pairs() -> Vec<(Polygon, Polygon)> {
        let triangle = Polygon::new(vec![p(2.0, -3.0), p(12.0, 4.0), p(-1.0, 8.0)]);
        let notch = Polygon::new(vec![p(-2.0, 2.0), p(12.0, 2.0), p(12.0, 8.0), p(5.0, 5.0), p(-2.0, 8.0)]);
        let diamond = Polygon::new(vec![p(5.0, -2.0), p(12.0, 5.0), p(5.0, 12.0), p(-2.0, 5.0)]);
        vec![
            (square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)),
            (square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)),
            (square(0.0, 0.0, 10.0), triangle),
            (square(0.0, 0.0, 10.0), notch),
            (square(0.0, 0.0, 10.0), diamond),
        ]
    }

    #[test]
    fn offset_squares_union_to_an_octagon() {
        let r = polygon_union(&square(0.0, 0.0, 10.0), &square(5.0, 5.0, 10.0)).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].vertex_count(), 8);
        assert_abs_diff_eq!(r[0].area(), 175.0, epsilon = 1e-9);
    }

    #[test]
    fn offset_squares_intersect_in_a_square() {
        let r = polygon_intersection(&square(0.0, 0.0, 10.0), &square(5.0, 5.0, 10.0)).unwrap();
        assert_eq!(r, vec![square(5.0, 5.0, 5.0)]);
    }

    #[test]
    fn inclusion_exclusion_holds() {
        for (a, b) in pairs() {
            let union = area(polygon_union(&a, &b));
            let inter = area(polygon_intersection(&a, &b));
            assert_abs_diff_eq!(union + inter, a.area() + b.area(), epsilon = 1e-8);
        }
    }

    #[test]
    fn xor_is_both_differences() {
        for (a, b) in pairs() {
            let xor = area(polygon_xor(&a, &b));
            let sum = area(polygon_difference(&a, &b)) + area(polygon_difference(&b, &a));
            assert_abs_diff_eq!(xor, sum, epsilon = 1e-8);
            let union = area(polygon_union(&a, &b));
            let inter = area(polygon_intersection(&a, &b));
            assert_abs_diff_eq!(xor, union - inter, epsilon = 1e-8);
        }
    }

    #[test]
    fn notch_cuts_a_triangle_from_a_strip() {
        // The notch dips into the strip from above.
        let strip = Polygon::new(vec![p(0.0, 4.0), p(10.0, 4.0), p(10.0, 6.0), p(0.0, 6.0)]);
        let v = Polygon::new(vec![p(-1.0, 0.0), p(11.0, 0.0), p(11.0, 10.0), p(5.0, 5.0), p(-1.0, 10.0)]);
        let r = polygon_difference(&strip, &v).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].vertex_count(), 3);
        assert_abs_diff_eq!(r[0].area(), 1.2, epsilon = 1e-9);
        let r = polygon_intersection(&strip, &v).unwrap();
        assert_eq!(r.len(), 1);
        assert_abs_diff_eq!(r[0].area(), 18.8, epsilon = 1e-9);
    }

    #[test]
    fn arch_cuts_a_strip_in_three() {
        let strip = Polygon::new(vec![p(0.0, 4.0), p(10.0, 4.0), p(10.0, 6.0), p(0.0, 6.0)]);
        let arch = Polygon::new(vec![
            p(2.0, 3.0),
            p(3.0, 3.0),
            p(3.0, 7.0),
            p(7.0, 7.0),
            p(7.0, 3.0),
            p(8.0, 3.0),
            p(8.0, 8.0),
            p(2.0, 8.0),
        ]);
        let r = polygon_difference(&strip, &arch).unwrap();
        assert_eq!(r.len(), 3);
        assert_abs_diff_eq!(r.iter().map(Polygon::area).sum::<f64>(), 16.0, epsilon = 1e-9);
        assert_eq!(polygon_intersection(&strip, &arch).unwrap().len(), 2);
    }

    #[test]
    fn contained_polygon() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(2.0, 2.0, 3.0);
        assert_eq!(polygon_union(&outer, &inner).unwrap(), vec![outer.clone()]);
        assert_eq!(polygon_intersection(&outer, &inner).unwrap(), vec![inner.clone()]);
        assert!(polygon_difference(&inner, &outer).is_none());
        let holed = polygon_difference(&outer, &inner).unwrap();
        assert_eq!(holed.len(), 2);
        assert!(!holed[0].is_cw());
        assert!(holed[1].is_cw());
        assert_abs_diff_eq!(area(Some(holed)), 91.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_polygons() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        assert!(polygon_union(&a, &b).is_none());
        assert!(polygon_intersection(&a, &b).is_none());
        assert_eq!(polygon_difference(&a, &b).unwrap(), vec![a.clone()]);
        assert_eq!(polygon_xor(&a, &b).unwrap().len(), 2);
    }

    #[test]
    fn edge_sharing_squares_merge() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        let u = polygon_union(&a, &b).unwrap();
        assert_eq!(u.len(), 1);
        assert_eq!(u[0].vertex_count(), 4);
        assert_abs_diff_eq!(u[0].area(), 200.0, epsilon = 1e-9);
        assert!(polygon_intersection(&a, &b).is_none());
        assert_eq!(polygon_difference(&a, &b).unwrap(), vec![a.clone()]);
    }

    #[test]
    fn crossing_through_a_shared_corner() {
        // The triangle enters the square through its corner (10, 10).
        let a = square(0.0, 0.0, 10.0);
        let b = Polygon::new(vec![p(10.0, 10.0), p(5.0, 8.0), p(14.0, 14.0)]);
        let union = polygon_union(&a, &b).unwrap();
        assert_eq!(union.len(), 1);
        assert_abs_diff_eq!(union[0].area(), 104.0, epsilon = 1e-9);
        let inter = polygon_intersection(&a, &b).unwrap();
        assert_eq!(inter.len(), 1);
        assert_abs_diff_eq!(inter[0].area(), 2.0, epsilon = 1e-9);

        let (u, i) = (area(Some(union)), area(Some(inter)));
        assert_abs_diff_eq!(u + i, a.area() + b.area(), epsilon = 1e-9);
        let xor = area(polygon_xor(&a, &b));
        assert_abs_diff_eq!(xor, 102.0, epsilon = 1e-9);
        assert_abs_diff_eq!(xor, u - i, epsilon = 1e-9);
    }
}
