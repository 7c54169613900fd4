//! Exact k nearest neighbor search over static point sets.
//!
//! Two tree variants share one builder and one search routine:
//!
//! - kd-tree ([`AxisSelector::Cyclic`]): each level splits at the median of one coordinate,
//!   cycling through the first `max_dim` axes.
//! - PCA-tree ([`AxisSelector::PrincipalComponent`]): each level splits at the median
//!   projection onto the first principal component of the points below it.
//!
//! ```
//! use pcakdt::SpatialTree;
//!
//! # fn main() -> pcakdt::TreeResult<()> {
//! let tree = SpatialTree::kdtree(vec![vec![5., 4.], vec![2., 3.], vec![8., 1.]], 2)?;
//! let nn = tree.get_nn(&[3., 4.5])?;
//! assert_eq!(nn.point, &[2., 3.]);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod heap;
mod leaf;
mod metric;
mod neighbor;
mod node;
mod pca;
mod search;
mod split;
mod tree;

pub use error::{TreeError, TreeResult};
pub use heap::BoundedNeighborHeap;
pub use leaf::{rows_to_leaves, slice_to_owned_leaves, OwnedLeaf};
pub use metric::Metric;
pub use neighbor::Neighbor;
pub use node::{InOrder, Node, SplitRule};
pub use pca::{principal_axis_projection, PrincipalAxis};
pub use split::AxisSelector;
pub use tree::{SpatialTree, TreeKwargs};
