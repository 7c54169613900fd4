//! Branch-and-bound k nearest neighbor search.

use crate::heap::BoundedNeighborHeap;
use crate::metric::Metric;
use crate::neighbor::Neighbor;
use crate::node::{Node, SplitRule};

/// Visits `node`, then its near subtree, then its far subtree unless the splitting hyperplane
/// is already further away than the worst retained candidate.
pub(crate) fn search<'a>(
    node: Option<&'a Node>,
    query: &[f64],
    metric: &Metric,
    heap: &mut BoundedNeighborHeap<'a>,
) {
    let Some(node) = node else {
        return;
    };

    heap.offer(Neighbor {
        dist: metric.dist(query, &node.data),
        index: node.index,
        point: &node.data,
    });

    let (near, far, bound) = match &node.rule {
        SplitRule::Axis => {
            let d = node.split_dim;
            let bound = metric.axis_bound(query, d, node.data[d]);
            if query[d] < node.data[d] {
                (node.left(), node.right(), bound)
            } else {
                (node.right(), node.left(), bound)
            }
        }
        SplitRule::Principal { axis, threshold } => match axis.project(query) {
            Some(key) => {
                let bound = metric.plane_bound(query, axis.direction(), key - threshold);
                if key < *threshold {
                    (node.left(), node.right(), bound)
                } else {
                    (node.right(), node.left(), bound)
                }
            }
            // The query lives in fewer components than the stored points, so there is no
            // hyperplane distance to prune with.
            None => (node.left(), node.right(), 0.),
        },
    };

    search(near, query, metric, heap);
    // Ties with the worst candidate are still visited: an equally distant point with a
    // smaller index can displace it.
    if bound <= heap.current_worst() {
        search(far, query, metric, heap);
    }
}

/// Unsorted k nearest neighbors of `query` below `root`.
pub(crate) fn find_knn<'a>(
    root: Option<&'a Node>,
    query: &[f64],
    k: usize,
    metric: &Metric,
) -> Vec<Neighbor<'a>> {
    let mut heap = BoundedNeighborHeap::new(k);
    search(root, query, metric, &mut heap);
    heap.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::leaf::rows_to_leaves;
    use crate::split::AxisSelector;
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn l1_dist_slice(a1: &[f64], a2: &[f64]) -> f64 {
        a1.iter()
            .zip(a2.iter())
            .fold(0., |acc, (x, y)| acc + (x - y).abs())
    }

    fn random_rows(rng: &mut ChaChaRng, rows: usize, dim: usize) -> Vec<Vec<f64>> {
        (0..rows)
            .map(|_| (0..dim).map(|_| rng.gen_range(0.0..1.0)).collect())
            .collect()
    }

    /// Brute force answer: indices ordered by (distance, index).
    fn generate_test_answer(data: &[Vec<f64>], point: &[f64], metric: &Metric) -> Vec<(usize, f64)> {
        let mut ans = data
            .iter()
            .enumerate()
            .map(|(i, row)| (i, metric.dist(point, row)))
            .collect::<Vec<_>>();
        ans.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ans
    }

    fn check_against_brute_force(selector: AxisSelector, metric: Metric, dim: usize, seed: u64) {
        let mut rng: ChaChaRng = SeedableRng::seed_from_u64(seed);
        let data = random_rows(&mut rng, 2_000, dim);
        let root = build(rows_to_leaves(data.clone()), 0, dim, selector);
        for k in [1usize, 7, 25] {
            for _ in 0..20 {
                let point = (0..dim).map(|_| rng.gen_range(-0.2..1.2)).collect::<Vec<_>>();
                let ans = generate_test_answer(&data, &point, &metric);

                let mut heap = BoundedNeighborHeap::new(k);
                search(root.as_deref(), &point, &metric, &mut heap);
                let output = heap.into_sorted_vec();

                let indices = output.iter().map(|nb| nb.index).collect::<Vec<_>>();
                let expected = ans[..k].iter().map(|(i, _)| *i).collect::<Vec<_>>();
                assert_eq!(indices, expected, "{selector:?} {metric:?} k={k}");
                for (nb, (i, d)) in output.iter().zip(ans.iter()) {
                    assert_abs_diff_eq!(nb.dist, *d, epsilon = 1e-12);
                    assert_eq!(nb.point, data[*i].as_slice());
                }
            }
        }
    }

    #[test]
    fn test_kd_sql2_matches_brute_force() {
        check_against_brute_force(AxisSelector::Cyclic, Metric::SquaredEuclidean, 3, 11);
    }

    #[test]
    fn test_kd_l1_linf_custom_match_brute_force() {
        check_against_brute_force(AxisSelector::Cyclic, Metric::Manhattan, 4, 12);
        check_against_brute_force(AxisSelector::Cyclic, Metric::Chebyshev, 4, 13);
        check_against_brute_force(AxisSelector::Cyclic, Metric::Custom(l1_dist_slice), 4, 14);
    }

    #[test]
    fn test_pca_matches_brute_force() {
        check_against_brute_force(AxisSelector::PrincipalComponent, Metric::SquaredEuclidean, 3, 21);
        check_against_brute_force(AxisSelector::PrincipalComponent, Metric::Euclidean, 5, 22);
        check_against_brute_force(AxisSelector::PrincipalComponent, Metric::Manhattan, 3, 23);
        check_against_brute_force(AxisSelector::PrincipalComponent, Metric::Chebyshev, 3, 24);
    }

    #[test]
    fn test_small_distances_are_not_pruned_away() {
        // All distances are below 1, where a raw coordinate gap exceeds its square.
        let data = vec![vec![0.0, 0.0], vec![0.3, 0.0], vec![0.1, 0.25], vec![0.5, 0.5]];
        let root = build(rows_to_leaves(data.clone()), 0, 2, AxisSelector::Cyclic);
        let point = [0.18, 0.1];
        let ans = generate_test_answer(&data, &point, &Metric::SquaredEuclidean);
        let out = find_knn(root.as_deref(), &point, 1, &Metric::SquaredEuclidean);
        assert_eq!(out[0].index, ans[0].0);
    }

    #[test]
    fn test_equal_distances_prefer_earlier_points() {
        let data = vec![
            vec![1., 0.],
            vec![-1., 0.],
            vec![0., 1.],
            vec![0., -1.],
            vec![5., 5.],
        ];
        let root = build(rows_to_leaves(data), 0, 2, AxisSelector::Cyclic);
        for k in 1..=4 {
            let mut out = find_knn(root.as_deref(), &[0., 0.], k, &Metric::SquaredEuclidean);
            out.sort();
            assert_eq!(
                out.iter().map(|nb| nb.index).collect::<Vec<_>>(),
                (0..k).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_empty_root() {
        assert!(find_knn(None, &[0., 0.], 3, &Metric::SquaredEuclidean).is_empty());
    }
}
