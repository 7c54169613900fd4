use crate::builder::build;
use crate::error::{TreeError, TreeResult};
use crate::leaf::{rows_to_leaves, slice_to_owned_leaves, OwnedLeaf};
use crate::metric::Metric;
use crate::neighbor::Neighbor;
use crate::node::{InOrder, Node};
use crate::search::find_knn;
use crate::split::AxisSelector;
use ndarray::ArrayView2;
use rayon::prelude::*;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TreeKwargs {
    /// Number of leading coordinates the split dimension cycles through.
    pub max_dim: usize,
    #[serde(default)]
    pub axis: AxisSelector,
    #[serde(default)]
    pub metric: Metric,
}

impl TreeKwargs {
    pub fn new(max_dim: usize) -> Self {
        TreeKwargs {
            max_dim,
            axis: AxisSelector::default(),
            metric: Metric::default(),
        }
    }

    pub fn with_axis(mut self, axis: AxisSelector) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

/// Static kd-tree / PCA-tree for exact k nearest neighbor queries.
///
/// Built once from a point set and immutable afterwards, so queries may run from several
/// threads at once (see [`SpatialTree::get_knn_batch`]).
#[derive(Clone, Debug)]
pub struct SpatialTree {
    root: Option<Box<Node>>,
    dim: usize,
    max_dim: usize,
    len: usize,
    metric: Metric,
    selector: AxisSelector,
}

fn check_finite(row: &[f64], what: &str) -> TreeResult<()> {
    if row.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(TreeError::InvalidArgument(format!(
            "{what} contains a non-finite value"
        )))
    }
}

impl SpatialTree {
    /// kd-tree with squared Euclidean distance.
    pub fn kdtree(points: Vec<Vec<f64>>, max_dim: usize) -> TreeResult<Self> {
        Self::from_kwargs(points, TreeKwargs::new(max_dim))
    }

    /// PCA-tree with squared Euclidean distance.
    pub fn pcatree(points: Vec<Vec<f64>>, max_dim: usize) -> TreeResult<Self> {
        Self::from_kwargs(
            points,
            TreeKwargs::new(max_dim).with_axis(AxisSelector::PrincipalComponent),
        )
    }

    /// Builds a tree over `points`. Every point must have the same number of components, and
    /// at least `max_dim` of them. An empty input gives an empty tree.
    #[tracing::instrument(skip_all, fields(points = points.len(), max_dim = kwargs.max_dim))]
    pub fn from_kwargs(points: Vec<Vec<f64>>, kwargs: TreeKwargs) -> TreeResult<Self> {
        Self::from_leaves(rows_to_leaves(points), kwargs)
    }

    /// Builds a tree from the rows of a matrix.
    pub fn from_array(data: ArrayView2<f64>, kwargs: TreeKwargs) -> TreeResult<Self> {
        let points = data.rows().into_iter().map(|row| row.to_vec()).collect();
        Self::from_kwargs(points, kwargs)
    }

    /// Builds a tree from a row-major buffer of `row_len` components per point.
    pub fn from_slice(slice: &[f64], row_len: usize, kwargs: TreeKwargs) -> TreeResult<Self> {
        if row_len == 0 || slice.len() % row_len != 0 {
            return Err(TreeError::InvalidArgument(format!(
                "buffer of length {} does not split into rows of {}",
                slice.len(),
                row_len
            )));
        }
        Self::from_leaves(slice_to_owned_leaves(slice, row_len), kwargs)
    }

    fn from_leaves(leaves: Vec<OwnedLeaf>, kwargs: TreeKwargs) -> TreeResult<Self> {
        let max_dim = kwargs.max_dim;
        if max_dim == 0 {
            return Err(TreeError::InvalidArgument(
                "max_dim must be at least 1".into(),
            ));
        }
        let dim = leaves.first().map_or(max_dim, OwnedLeaf::dim);
        if dim < max_dim {
            return Err(TreeError::DimensionMismatch {
                expected: max_dim,
                found: dim,
            });
        }
        for leaf in leaves.iter() {
            if leaf.dim() != dim {
                return Err(TreeError::DimensionMismatch {
                    expected: dim,
                    found: leaf.dim(),
                });
            }
            check_finite(leaf.vec(), "point")?;
        }

        let len = leaves.len();
        let root = build(leaves, 0, max_dim, kwargs.axis);
        let tree = SpatialTree {
            root,
            dim,
            max_dim,
            len,
            metric: kwargs.metric,
            selector: kwargs.axis,
        };
        tracing::debug!(
            len,
            dim,
            depth = tree.depth(),
            axis = ?kwargs.axis,
            metric = ?kwargs.metric,
            "built spatial tree"
        );
        Ok(tree)
    }

    fn check_query(&self, point: &[f64]) -> TreeResult<()> {
        if point.len() < self.max_dim {
            return Err(TreeError::DimensionMismatch {
                expected: self.max_dim,
                found: point.len(),
            });
        }
        check_finite(point, "query")
    }

    /// The k nearest stored points to `point`, in no particular order. Returns every stored
    /// point when `k` exceeds the tree size. Equal distances are resolved in favour of the
    /// point that came first in the construction input.
    pub fn get_knn(&self, point: &[f64], k: usize) -> TreeResult<Vec<Neighbor<'_>>> {
        if k == 0 {
            return Err(TreeError::InvalidArgument("k must be at least 1".into()));
        }
        self.check_query(point)?;
        Ok(find_knn(self.root(), point, k, &self.metric))
    }

    /// Same as [`get_knn`](Self::get_knn), closest first.
    pub fn get_knn_sorted(&self, point: &[f64], k: usize) -> TreeResult<Vec<Neighbor<'_>>> {
        let mut out = self.get_knn(point, k)?;
        out.sort_unstable();
        Ok(out)
    }

    /// The nearest stored point to `point`.
    pub fn get_nn(&self, point: &[f64]) -> TreeResult<Neighbor<'_>> {
        self.get_knn(point, 1)?
            .into_iter()
            .next()
            .ok_or(TreeError::EmptyTree)
    }

    /// Runs [`get_knn`](Self::get_knn) for every query on the rayon thread pool. Fails with the
    /// first invalid query.
    pub fn get_knn_batch(
        &self,
        points: &[Vec<f64>],
        k: usize,
    ) -> TreeResult<Vec<Vec<Neighbor<'_>>>> {
        points.par_iter().map(|p| self.get_knn(p, k)).collect()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// In-order traversal of all nodes.
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self.root())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of components of every stored point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn max_dim(&self) -> usize {
        self.max_dim
    }

    pub fn depth(&self) -> usize {
        self.root().map_or(0, Node::depth)
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn selector(&self) -> AxisSelector {
        self.selector
    }
}
