use super::distance_2d::point_to_segment_dist;
use super::Point2;

/// Douglas–Peucker down-sampling of a polyline.
///
/// Returns the indices of the retained points in ascending order. The first
/// and last points are always kept. Points within `tolerance` of the chord
/// spanning their neighbours are dropped.
#[must_use]
pub fn down_sampling(points: &[Point2], tolerance: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut index = first;
        for i in first + 1..last {
            let d = point_to_segment_dist(&points[i], &points[first], &points[last]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > tolerance {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}
