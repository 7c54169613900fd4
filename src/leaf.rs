/// A point handed to the builder, together with its position in the input.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedLeaf {
    pub index: usize,
    pub row_vec: Vec<f64>,
}

impl From<(usize, Vec<f64>)> for OwnedLeaf {
    fn from(value: (usize, Vec<f64>)) -> Self {
        OwnedLeaf {
            index: value.0,
            row_vec: value.1,
        }
    }
}

impl From<(usize, &[f64])> for OwnedLeaf {
    fn from(value: (usize, &[f64])) -> Self {
        OwnedLeaf {
            index: value.0,
            row_vec: value.1.to_vec(),
        }
    }
}

impl OwnedLeaf {
    pub fn dim(&self) -> usize {
        self.row_vec.len()
    }

    pub fn value_at(&self, idx: usize) -> f64 {
        self.row_vec[idx]
    }

    pub fn vec(&self) -> &[f64] {
        self.row_vec.as_slice()
    }
}

/// Tags every row with its position.
pub fn rows_to_leaves(rows: Vec<Vec<f64>>) -> Vec<OwnedLeaf> {
    rows.into_iter().enumerate().map(|pair| pair.into()).collect()
}

/// Splits a row-major buffer into leaves of `row_len` components each. Trailing
/// values that do not fill a whole row are ignored; callers check divisibility.
pub fn slice_to_owned_leaves(slice: &[f64], row_len: usize) -> Vec<OwnedLeaf> {
    slice
        .chunks_exact(row_len)
        .enumerate()
        .map(|pair| pair.into())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_to_owned_leaves() {
        let v = [1., 2., 3., 4., 5., 6.];
        let leaves = slice_to_owned_leaves(&v, 3);
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].index, 0);
        assert_eq!(leaves[1].index, 1);
        assert_eq!(leaves[1].vec(), &[4., 5., 6.]);
        assert_eq!(leaves[1].value_at(0), 4.);
        assert_eq!(leaves[0].dim(), 3);
    }

    #[test]
    fn test_rows_to_leaves_keeps_order() {
        let leaves = rows_to_leaves(vec![vec![9., 9.], vec![1., 1.]]);
        assert_eq!(
            leaves,
            vec![
                OwnedLeaf {
                    index: 0,
                    row_vec: vec![9., 9.]
                },
                OwnedLeaf {
                    index: 1,
                    row_vec: vec![1., 1.]
                },
            ]
        );
    }
}
