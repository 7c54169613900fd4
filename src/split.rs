use crate::leaf::OwnedLeaf;
use crate::pca::PrincipalAxis;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Deserialize;

/// How a subset is ordered and split at each level of the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSelector {
    /// kd-tree: order by coordinate `dim`, cycling through the axes.
    #[default]
    Cyclic,
    /// PCA-tree: order by the projection onto the subset's first principal component.
    PrincipalComponent,
}

/// Result of ordering a subset: the per-position keys (ascending) and, for principal splits,
/// the axis they were measured on.
pub(crate) struct Ordered {
    pub(crate) keys: Vec<f64>,
    pub(crate) axis: Option<PrincipalAxis>,
}

impl AxisSelector {
    /// Split dimension for the next level. Independent of the data.
    #[inline]
    pub fn next_dim(&self, dim: usize, max_dim: usize) -> usize {
        (dim + 1) % max_dim
    }

    /// Sorts `leaves` by this level's key. The sort is stable, so ties keep their incoming order.
    pub(crate) fn order(&self, leaves: &mut Vec<OwnedLeaf>, dim: usize) -> Ordered {
        match self {
            AxisSelector::Cyclic => {
                leaves.sort_by_key(|leaf| OrderedFloat(leaf.value_at(dim)));
                Ordered {
                    keys: leaves.iter().map(|leaf| leaf.value_at(dim)).collect(),
                    axis: None,
                }
            }
            AxisSelector::PrincipalComponent => {
                let rows = leaves.iter().map(|leaf| leaf.vec()).collect::<Vec<_>>();
                let Some(axis) = PrincipalAxis::fit(&rows) else {
                    return AxisSelector::Cyclic.order(leaves, dim);
                };
                let keys = rows
                    .iter()
                    .map(|row| axis.project(row).unwrap_or(f64::NAN))
                    .collect::<Vec<_>>();
                let (sorted, keys): (Vec<OwnedLeaf>, Vec<f64>) = std::mem::take(leaves)
                    .into_iter()
                    .zip(keys)
                    .sorted_by_key(|(_, key)| OrderedFloat(*key))
                    .unzip();
                *leaves = sorted;
                Ordered {
                    keys,
                    axis: Some(axis),
                }
            }
        }
    }

    /// Position of the boundary point among sorted `keys` (at least 3 of them). Everything
    /// before it goes left, everything after it goes right, and the boundary itself is removed,
    /// so both partitions are strictly smaller than the input.
    pub(crate) fn boundary(&self, keys: &[f64]) -> usize {
        let n = keys.len();
        let half = n >> 1;
        match self {
            AxisSelector::Cyclic => half,
            AxisSelector::PrincipalComponent => {
                let median = if n % 2 == 1 {
                    keys[half]
                } else {
                    keys[half - 1] + (keys[half] - keys[half - 1]) / 2.
                };
                // Leftmost key at or above the median, chosen by position rather than by
                // comparing floats for equality.
                keys.partition_point(|k| *k < median).min(half)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::rows_to_leaves;

    #[test]
    fn test_next_dim_cycles() {
        let s = AxisSelector::Cyclic;
        assert_eq!(s.next_dim(0, 3), 1);
        assert_eq!(s.next_dim(2, 3), 0);
        assert_eq!(AxisSelector::PrincipalComponent.next_dim(0, 1), 0);
    }

    #[test]
    fn test_cyclic_order_is_stable() {
        let mut leaves = rows_to_leaves(vec![
            vec![3., 0.],
            vec![1., 5.],
            vec![1., 2.],
            vec![0., 9.],
        ]);
        let ordered = AxisSelector::Cyclic.order(&mut leaves, 0);
        assert_eq!(ordered.keys, vec![0., 1., 1., 3.]);
        assert!(ordered.axis.is_none());
        assert_eq!(
            leaves.iter().map(|l| l.index).collect::<Vec<_>>(),
            vec![3, 1, 2, 0]
        );
    }

    #[test]
    fn test_cyclic_boundary_is_median_index() {
        assert_eq!(AxisSelector::Cyclic.boundary(&[1., 2., 3.]), 1);
        assert_eq!(AxisSelector::Cyclic.boundary(&[1., 2., 3., 4., 5., 6.]), 3);
    }

    #[test]
    fn test_principal_boundary_is_leftmost_at_or_above_median() {
        let s = AxisSelector::PrincipalComponent;
        assert_eq!(s.boundary(&[-3., -1., 2., 4.]), 2);
        assert_eq!(s.boundary(&[-3., -1., 2., 4., 5.]), 2);
        // Ties at the median: the first of them is the boundary.
        assert_eq!(s.boundary(&[-1., 0., 0., 0., 1.]), 1);
        assert_eq!(s.boundary(&[0., 0., 0., 0.]), 0);
    }

    #[test]
    fn test_principal_order_sorts_by_projection() {
        let mut leaves = rows_to_leaves(vec![
            vec![5., 4., 3.],
            vec![2., 3., 5.],
            vec![8., 1., 2.],
            vec![9., 6., 1.],
            vec![7., 2., 5.],
            vec![4., 7., 6.],
        ]);
        let ordered = AxisSelector::PrincipalComponent.order(&mut leaves, 0);
        assert!(ordered.axis.is_some());
        assert!(ordered.keys.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            leaves.iter().map(|l| l.index).collect::<Vec<_>>(),
            vec![3, 2, 4, 0, 5, 1]
        );
        assert_eq!(AxisSelector::PrincipalComponent.boundary(&ordered.keys), 3);
    }

    #[test]
    fn test_deserialize_selector() {
        let s: AxisSelector = serde_json::from_str("\"principal_component\"").unwrap();
        assert_eq!(s, AxisSelector::PrincipalComponent);
        let s: AxisSelector = serde_json::from_str("\"cyclic\"").unwrap();
        assert_eq!(s, AxisSelector::Cyclic);
    }
}
