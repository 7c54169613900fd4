//! Error types for tree construction and queries.

use thiserror::Error;

/// Errors raised while building or querying a [`SpatialTree`](crate::SpatialTree).
///
/// All of them are validation errors: they are deterministic and never transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// A point or query does not have the number of components the tree expects.
    #[error("dimension mismatch: expected {expected} components, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Nearest neighbor requested from a tree without points.
    #[error("tree is empty")]
    EmptyTree,

    /// Bad parameter, e.g. `k == 0` or a non-finite coordinate.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type TreeResult<T> = std::result::Result<T, TreeError>;
