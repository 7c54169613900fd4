//! Recursive median-split construction.

use crate::leaf::OwnedLeaf;
use crate::node::{Node, SplitRule};
use crate::split::AxisSelector;

/// Builds the subtree for `leaves`, splitting on `dim` at this level.
///
/// Every call places exactly one point in the returned node and recurses on the index ranges
/// strictly before and after it, so each recursion works on a strictly smaller set and every
/// input point ends up in exactly one node.
pub(crate) fn build(
    mut leaves: Vec<OwnedLeaf>,
    dim: usize,
    max_dim: usize,
    selector: AxisSelector,
) -> Option<Box<Node>> {
    let n = leaves.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        let leaf = leaves.pop()?;
        return Some(Box::new(Node::leaf(leaf.row_vec, leaf.index, dim)));
    }

    let next_dim = selector.next_dim(dim, max_dim);
    let ordered = selector.order(&mut leaves, dim);
    // Two points: the larger one is kept and the smaller one becomes a left-only child.
    let boundary = if n == 2 {
        1
    } else {
        selector.boundary(&ordered.keys)
    };

    let right = leaves.split_off(boundary + 1);
    let pivot = leaves.pop()?;
    let rule = match ordered.axis {
        Some(axis) => SplitRule::Principal {
            axis,
            threshold: ordered.keys[boundary],
        },
        None => SplitRule::Axis,
    };

    Some(Box::new(Node {
        data: pivot.row_vec,
        index: pivot.index,
        split_dim: dim,
        rule,
        left: build(leaves, next_dim, max_dim, selector),
        right: build(right, next_dim, max_dim, selector),
    }))
}
