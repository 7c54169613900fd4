/// Neighbor, search result.
/// (Stored point, its input position, and distance to the query)
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug)]
pub struct Neighbor<'a> {
    pub dist: f64,
    pub index: usize,
    pub point: &'a [f64],
}

impl<'a> Neighbor<'a> {
    pub fn to_point(self) -> &'a [f64] {
        self.point
    }

    pub fn to_index(self) -> usize {
        self.index
    }

    pub fn to_dist(self) -> f64 {
        self.dist
    }

    pub fn to_pair(self) -> (f64, &'a [f64]) {
        (self.dist, self.point)
    }

    /// Is the neighbor almost equal to the query itself?
    pub fn identity(&self) -> bool {
        self.dist <= f64::EPSILON
    }
}

// Ordered by distance, then by input position, so that equal distances resolve
// the same way on every query.
impl PartialEq for Neighbor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor<'_> {}

impl PartialOrd for Neighbor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.dist)
            .cmp(&OrderedFloat(other.dist))
            .then(self.index.cmp(&other.index))
    }
}
