//! First principal component of a point subset, used by the principal-component split.

use faer::{Mat, Side};
use itertools::Itertools;

/// Unit direction of greatest variance for a subset, with the centering folded into `offset`,
/// so that `project(p) = <p, direction> - offset = <p - mean, direction>`.
#[derive(Clone, Debug, PartialEq)]
pub struct PrincipalAxis {
    direction: Vec<f64>,
    offset: f64,
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).fold(0f64, |acc, (x, y)| acc + x * y)
}

impl PrincipalAxis {
    /// Fits the axis to `rows`. Returns None for an empty subset, zero-length rows, or rows
    /// that do not all have the same length.
    pub fn fit(rows: &[&[f64]]) -> Option<Self> {
        let n = rows.len();
        let dim = rows.first()?.len();
        if dim == 0 || rows.iter().any(|row| row.len() != dim) {
            return None;
        }

        let mut mean = vec![0f64; dim];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n as f64);

        // Sample covariance. The scale does not change the eigenvectors; it only keeps
        // magnitudes comparable with other tools.
        let denom = (n.max(2) - 1) as f64;
        let cov = Mat::<f64>::from_fn(dim, dim, |i, j| {
            rows.iter()
                .fold(0f64, |acc, row| acc + (row[i] - mean[i]) * (row[j] - mean[j]))
                / denom
        });

        let evd = cov.selfadjoint_eigendecomposition(Side::Lower);
        let eigenvalues = evd.s().column_vector();
        let top = (0..dim)
            .position_max_by(|&a, &b| eigenvalues.read(a).total_cmp(&eigenvalues.read(b)))?;
        let u = evd.u();
        let direction = (0..dim).map(|i| u.read(i, top)).collect::<Vec<_>>();

        let mut axis = PrincipalAxis {
            offset: dot(&mean, &direction),
            direction,
        };
        axis.fix_sign(rows);
        Some(axis)
    }

    /// The eigenvector sign is arbitrary. Pin it so that the projection with the largest
    /// magnitude (first one on ties) is positive. If every projection is zero, the
    /// largest-magnitude component of the direction is made positive instead.
    fn fix_sign(&mut self, rows: &[&[f64]]) {
        let by_magnitude = |a: &f64, b: &f64| a.abs().total_cmp(&b.abs()).then(std::cmp::Ordering::Greater);
        let pivot = rows
            .iter()
            .map(|row| dot(row, &self.direction) - self.offset)
            .filter(|p| *p != 0.)
            .max_by(by_magnitude);
        let flip = match pivot {
            Some(p) => p < 0.,
            None => {
                tracing::trace!(n = rows.len(), "subset has no spread, orienting by component");
                self.direction
                    .iter()
                    .copied()
                    .max_by(by_magnitude)
                    .is_some_and(|c| c < 0.)
            }
        };
        if flip {
            self.direction.iter_mut().for_each(|c| *c = -*c);
            self.offset = -self.offset;
        }
    }

    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    /// Signed coordinate of `point` along the axis, relative to the fitted mean. None when the
    /// point does not have one component per axis component.
    #[inline]
    pub fn project(&self, point: &[f64]) -> Option<f64> {
        if point.len() != self.direction.len() {
            None
        } else {
            Some(dot(point, &self.direction) - self.offset)
        }
    }
}

/// Projects every point onto the top eigenvector of the centered covariance of `points`.
/// Only the relative order of the projections is meaningful to the tree; the sign
/// convention is the one of [`PrincipalAxis::fit`].
///
/// The axis is fitted on the rows with as many components as the first row. Rows of any
/// other length project to NaN.
pub fn principal_axis_projection(points: &[Vec<f64>]) -> Vec<f64> {
    let Some(dim) = points.first().map(Vec::len) else {
        return Vec::new();
    };
    let rows = points
        .iter()
        .filter(|p| p.len() == dim)
        .map(|p| p.as_slice())
        .collect::<Vec<_>>();
    let axis = PrincipalAxis::fit(&rows);
    points
        .iter()
        .map(|p| match &axis {
            Some(axis) => axis.project(p).unwrap_or(f64::NAN),
            None if p.len() == dim => 0.,
            None => f64::NAN,
        })
        .collect()
}
